/// settlement preview - what each trigger would pay, without committing anything
use investment_settlement_rs::{
    compute_payout, Investment, Money, ProductConfig, SettlementConfig, SettlementInput,
    SettlementPreviewView, SettlementTrigger,
};
use chrono::{NaiveDate, TimeZone, Utc};

fn main() -> Result<(), Box<dyn std::error::Error>> {
    env_logger::init();
    println!("=== settlement preview ===\n");

    let now = Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap();
    let start = NaiveDate::from_ymd_opt(2024, 1, 1).unwrap();
    let config = SettlementConfig::default();

    // monthly payout plan broken after six months
    let monthly = ProductConfig::monthly_fixed_deposit("FD-M12", "Monthly Fixed Deposit")?;
    let investment = Investment::subscribe(&monthly, "TXN-1001", Money::from_major(100_000), start, now)?;

    let as_of = NaiveDate::from_ymd_opt(2024, 7, 15).unwrap();
    let paid = Money::from_major(6_000); // six installments at 12%
    let input = SettlementInput::for_investment(&investment, as_of, paid, SettlementTrigger::EarlyBreak)?;
    let breakdown = compute_payout(&input, &config)?;

    println!("1. monthly plan, early break");
    println!("  stayed months:     {}", breakdown.stayed_months);
    println!("  normal rate:       {}", breakdown.normal_rate.unwrap_or_default());
    println!("  break rate:        {}", breakdown.break_rate.unwrap_or_default());
    println!("  interest paid:     {}", breakdown.interest_already_paid.unwrap_or_default());
    println!("  allowed interest:  {}", breakdown.allowed_interest.unwrap_or_default());
    println!("  overpaid interest: {}", breakdown.clawback());
    println!("  total payout:      {}", breakdown.total_payout);
    println!("  notice: {}", breakdown.notice);

    println!("\n  preview json:");
    println!("{}", SettlementPreviewView::new(&investment, breakdown).to_json_pretty()?);

    // maturity payout plan held to term
    let maturity = ProductConfig::maturity_fixed_deposit("FD-X12", "Maturity Fixed Deposit")?;
    let investment = Investment::subscribe(&maturity, "TXN-1002", Money::from_major(50_000), start, now)?;

    let input = SettlementInput::for_investment(
        &investment,
        investment.maturity_date,
        Money::ZERO,
        SettlementTrigger::Maturity,
    )?;
    let breakdown = compute_payout(&input, &config)?;

    println!("\n2. maturity plan, on time");
    println!("  rate used:      {}", breakdown.interest_rate_used);
    println!("  interest today: {}", breakdown.interest_payable_today);
    println!("  total payout:   {}", breakdown.total_payout);

    // asking for an early break after maturity is refused
    let input = SettlementInput::for_investment(
        &investment,
        investment.maturity_date,
        Money::ZERO,
        SettlementTrigger::EarlyBreak,
    )?;
    match compute_payout(&input, &config) {
        Ok(_) => println!("  error: early break accepted after maturity!"),
        Err(e) => println!("\n  ✓ early break refused: {}", e),
    }

    Ok(())
}
