/// payout lifecycle - monthly interest, then an early break with clawback
use investment_settlement_rs::{
    add_months, Money, MemoryStore, PayoutController, PayoutView, ProductConfig, SafeTimeProvider,
    SettlementConfig, SettlementTrigger, TimeSource,
};
use investment_settlement_rs::store::{InvestmentRepository, PayoutRepository};
use chrono::{Duration, TimeZone, Utc};

fn main() -> Result<(), Box<dyn std::error::Error>> {
    env_logger::init();
    println!("=== payout lifecycle ===\n");

    let time = SafeTimeProvider::new(TimeSource::Test(
        Utc.with_ymd_and_hms(2024, 1, 1, 9, 0, 0).unwrap()
    ));
    let controller = time.test_control().unwrap();

    let mut store = MemoryStore::new();
    store.upsert_product(ProductConfig::monthly_fixed_deposit("FD-M12", "Monthly Fixed Deposit")?);
    let mut payouts = PayoutController::new(store, SettlementConfig::default());

    let investment = payouts.open_investment(
        "FD-M12",
        "TXN-2001",
        Money::from_major(100_000),
        time.now().date_naive(),
        &time,
    )?;
    println!("1. subscribed {} until {}", investment.amount, investment.maturity_date);

    // 2. monthly interest
    println!("\n2. monthly interest");
    for month in 1..=6 {
        let due = add_months(investment.start_date, month)?;
        let target = Utc.from_utc_datetime(&due.and_hms_opt(9, 0, 0).unwrap());
        controller.advance(target - time.now());

        let payout = payouts.initiate_payout(investment.id, SettlementTrigger::ScheduledMonthly, &time)?;
        payouts.approve_payout(payout.id, &time)?;
        payouts.settle_payout(payout.id, &format!("INT-{month:02}"), &time)?;
        println!("  {}: paid {}", due, payout.interest_amount);
    }
    println!("  interest paid so far: {}", payouts.store().paid_interest(investment.id));

    // 3. early break
    println!("\n3. early break");
    controller.advance(Duration::days(12));
    let preview = payouts.preview(investment.id, SettlementTrigger::EarlyBreak, &time)?;
    println!("  preview: {}", preview.notice);

    let payout = payouts.initiate_payout(investment.id, SettlementTrigger::EarlyBreak, &time)?;
    println!("  ✓ payout requested, status {:?}", payout.status);

    match payouts.initiate_payout(investment.id, SettlementTrigger::EarlyBreak, &time) {
        Ok(_) => println!("  error: second payout accepted!"),
        Err(e) => println!("  ✓ second request refused: {}", e),
    }

    let paid = payouts.settle_payout(payout.id, "BRK-0001", &time)?;
    println!("  ✓ settled: {}", PayoutView::from_payout(&paid).to_json_pretty()?);
    println!("  investment status: {:?}", payouts.store().get_investment(investment.id)?.status);

    match payouts.approve_payout(payout.id, &time) {
        Ok(_) => println!("  error: paid payout approved!"),
        Err(e) => println!("  ✓ cannot approve a paid payout: {}", e),
    }

    println!("\n4. audit trail");
    for event in payouts.take_events() {
        println!("  {:?}", event);
    }

    Ok(())
}
