/// renewal - matured money rolls into the product's current terms
use investment_settlement_rs::{
    Decimal, Money, MemoryStore, PayoutController, ProductConfig, SafeTimeProvider, SettlementConfig,
    SettlementTrigger, TimeSource,
};
use investment_settlement_rs::store::InvestmentRepository;
use chrono::{Duration, TimeZone, Utc};

fn main() -> Result<(), Box<dyn std::error::Error>> {
    env_logger::init();
    println!("=== renewal ===\n");

    let time = SafeTimeProvider::new(TimeSource::Test(
        Utc.with_ymd_and_hms(2024, 3, 1, 9, 0, 0).unwrap()
    ));
    let controller = time.test_control().unwrap();

    let mut store = MemoryStore::new();
    store.upsert_product(ProductConfig::maturity_fixed_deposit("FD-X12", "Maturity Fixed Deposit")?);
    let mut payouts = PayoutController::new(store, SettlementConfig::default());

    let investment = payouts.open_investment(
        "FD-X12",
        "TXN-3001",
        Money::from_major(250_000),
        time.now().date_naive(),
        &time,
    )?;
    println!("  subscribed at {}", investment.snapshot().interest_rate_maturity());

    // the bank raises the product rate mid-term
    let repriced = ProductConfig::maturity_fixed_deposit("FD-X12", "Maturity Fixed Deposit")?
        .to_builder()
        .interest_rate_maturity(Decimal::from(11))
        .build()?;
    payouts.store_mut().upsert_product(repriced);
    println!("  catalogue now at 11%");

    controller.advance(Duration::days(366));
    let status = payouts.refresh_maturity(investment.id, &time)?;
    println!("\n  {}: status {:?}", time.now().format("%Y-%m-%d"), status);

    let payout = payouts.initiate_payout(investment.id, SettlementTrigger::Maturity, &time)?;
    println!("  maturity payout {} (interest {} at the frozen rate)", payout.total_payout, payout.interest_amount);

    let (paid, renewed) = payouts.settle_and_renew(payout.id, "MAT-0001", &time)?;
    println!("  disbursed {} (principal {} stays invested)", paid.total_payout, investment.amount);
    if let Some(renewed) = renewed {
        println!("\n  ✓ renewed as {}", renewed.id);
        println!("    amount:   {}", renewed.amount);
        println!("    new rate: {}", renewed.snapshot().interest_rate_maturity());
        println!("    matures:  {}", renewed.maturity_date);
    }
    println!("  old investment: {:?}", payouts.store().get_investment(investment.id)?.status);

    println!("\n  book:");
    for inv in payouts.store().investments() {
        println!("    {} {} {:?}", inv.transaction_id, inv.amount, inv.status);
    }

    Ok(())
}
