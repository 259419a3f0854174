pub mod breakdown;

use chrono::NaiveDate;

use crate::config::SettlementConfig;
use crate::decimal::{Money, Rate};
use crate::errors::{Result, SettlementError};
use crate::interest::{stayed_months, AccrualEngine};
use crate::investment::Investment;
use crate::snapshot::InvestmentSnapshot;
use crate::types::{InvestmentStatus, PayoutType, SettlementTrigger};

pub use breakdown::{PayoutAmounts, PayoutBreakdown};

pub const BADGE_MONTHLY_INTEREST: &str = "MONTHLY INTEREST";
pub const BADGE_MATURED: &str = "MATURED";
pub const BADGE_EARLY_BREAK: &str = "EARLY BREAK";

/// inputs to a settlement calculation
#[derive(Debug, Clone)]
pub struct SettlementInput<'a> {
    pub snapshot: &'a InvestmentSnapshot,
    pub principal: Money,
    pub start_date: NaiveDate,
    pub maturity_date: NaiveDate,
    pub as_of_date: NaiveDate,
    /// sum of paid monthly interest payouts so far
    pub already_paid_interest: Money,
    pub trigger: SettlementTrigger,
}

impl<'a> SettlementInput<'a> {
    /// build the input for an investment, checking the trigger against its status
    pub fn for_investment(
        investment: &'a Investment,
        as_of_date: NaiveDate,
        already_paid_interest: Money,
        trigger: SettlementTrigger,
    ) -> Result<Self> {
        match (investment.status, trigger) {
            (InvestmentStatus::Active, _) => {}
            (InvestmentStatus::Matured, SettlementTrigger::Maturity) => {}
            (InvestmentStatus::Matured, _) => {
                return Err(SettlementError::UnsupportedTrigger {
                    trigger,
                    reason: "investment has already matured".to_string(),
                });
            }
            (status, _) => {
                return Err(SettlementError::InvestmentNotSettleable { status });
            }
        }

        Ok(Self {
            snapshot: investment.snapshot(),
            principal: investment.amount,
            start_date: investment.start_date,
            maturity_date: investment.maturity_date,
            as_of_date,
            already_paid_interest,
            trigger,
        })
    }
}

/// compute the payout due for a settlement trigger
///
/// pure: reads only the frozen snapshot and the supplied facts, performs no
/// i/o, and returns the same breakdown for the same input.
pub fn compute_payout(input: &SettlementInput<'_>, config: &SettlementConfig) -> Result<PayoutBreakdown> {
    ensure_non_negative("principal", input.principal)?;
    ensure_non_negative("already_paid_interest", input.already_paid_interest)?;

    if input.maturity_date < input.start_date {
        return Err(SettlementError::date_before(
            "maturity_date",
            input.maturity_date,
            "start_date",
            input.start_date,
        ));
    }

    let stayed = stayed_months(input.start_date, input.as_of_date)?;
    let matured = input.as_of_date >= input.maturity_date;

    let breakdown = match input.trigger {
        SettlementTrigger::ScheduledMonthly => {
            if input.snapshot.payout_type() != PayoutType::Monthly {
                return Err(unsupported(input.trigger, "maturity payout investments pay no interim interest"));
            }
            if matured {
                return Err(unsupported(input.trigger, "term is over, settle at maturity instead"));
            }
            scheduled_monthly(input, config, stayed)?
        }
        SettlementTrigger::Maturity => {
            if !matured {
                return Err(unsupported(
                    input.trigger,
                    &format!("maturity date {} not reached", input.maturity_date),
                ));
            }
            maturity(input, config, stayed)?
        }
        SettlementTrigger::EarlyBreak => {
            if matured {
                return Err(unsupported(input.trigger, "term is already complete"));
            }
            match input.snapshot.payout_type() {
                PayoutType::Maturity => early_break_maturity(input, config, stayed)?,
                PayoutType::Monthly => early_break_monthly(input, config, stayed)?,
            }
        }
    };

    ensure_non_negative("total_payout", breakdown.total_payout)?;

    log::debug!(
        "settlement {:?} for {} as of {}: stayed {} months at {}, total {}",
        breakdown.trigger,
        input.snapshot.product_code(),
        breakdown.as_of_date,
        breakdown.stayed_months,
        breakdown.interest_rate_used,
        breakdown.total_payout
    );

    Ok(breakdown)
}

fn scheduled_monthly(input: &SettlementInput<'_>, config: &SettlementConfig, stayed: u32) -> Result<PayoutBreakdown> {
    let rate = input.snapshot.normal_rate(config.negotiation_rate_policy);
    let accrued = AccrualEngine::new().accrue(input.principal, rate, stayed)?;

    let payable = accrued.interest_amount - input.already_paid_interest;
    ensure_non_negative("interest_payable_today", payable)?;

    Ok(PayoutBreakdown {
        notice: format!(
            "Interest for {} elapsed months is {}, of which {} was already paid",
            stayed, accrued.interest_amount, input.already_paid_interest
        ),
        normal_rate: Some(rate),
        interest_already_paid: Some(input.already_paid_interest),
        total_payout: payable,
        ..base(input, stayed, rate, payable, false, BADGE_MONTHLY_INTEREST)
    })
}

fn maturity(input: &SettlementInput<'_>, config: &SettlementConfig, stayed: u32) -> Result<PayoutBreakdown> {
    let rate = input.snapshot.normal_rate(config.negotiation_rate_policy);
    let term = input.snapshot.policy_term_months();

    // no interest accrues past the contractual term
    let entitled = AccrualEngine::new().accrue_within_term(input.principal, rate, stayed, term)?;

    let payable = entitled.interest_amount - input.already_paid_interest;
    ensure_non_negative("interest_payable_today", payable)?;

    Ok(PayoutBreakdown {
        notice: format!(
            "Matured after {} months: principal {} plus final interest {}",
            term, input.principal, payable
        ),
        normal_rate: Some(rate),
        interest_already_paid: Some(input.already_paid_interest),
        capital_returned: Some(input.principal),
        total_payout: input.principal + payable,
        ..base(input, stayed, rate, payable, false, BADGE_MATURED)
    })
}

fn early_break_maturity(input: &SettlementInput<'_>, config: &SettlementConfig, stayed: u32) -> Result<PayoutBreakdown> {
    let normal = input.snapshot.normal_rate(config.negotiation_rate_policy);
    let break_rate = input.snapshot.early_break_rate();
    let allowed = AccrualEngine::new().accrue(input.principal, break_rate, stayed)?;

    let payable = allowed.interest_amount - input.already_paid_interest;
    ensure_non_negative("interest_payable_today", payable)?;

    Ok(PayoutBreakdown {
        notice: format!(
            "Early break after {} months: interest recalculated at {} instead of {}",
            stayed, break_rate, normal
        ),
        normal_rate: Some(normal),
        break_rate: Some(break_rate),
        interest_already_paid: Some(input.already_paid_interest),
        allowed_interest: Some(allowed.interest_amount),
        capital_returned: Some(input.principal),
        total_payout: input.principal + payable,
        ..base(input, stayed, break_rate, payable, true, BADGE_EARLY_BREAK)
    })
}

/// monthly interest was paid at the normal rate; the break rate is applied
/// retroactively and the difference is recovered from principal
fn early_break_monthly(input: &SettlementInput<'_>, config: &SettlementConfig, stayed: u32) -> Result<PayoutBreakdown> {
    let normal = input.snapshot.normal_rate(config.negotiation_rate_policy);
    let break_rate = input.snapshot.early_break_rate();
    let allowed = AccrualEngine::new().accrue(input.principal, break_rate, stayed)?;

    // floored at zero by rule; a break rate above what was paid owes nothing extra
    let overpaid = (input.already_paid_interest - allowed.interest_amount).max(Money::ZERO);
    let capital_returned = input.principal - overpaid;
    ensure_non_negative("capital_returned", capital_returned)?;

    let notice = if overpaid.is_positive() {
        format!(
            "Bank rule: early break recalculates {} months at {}; {} of interest already paid is recovered from principal",
            stayed, break_rate, overpaid
        )
    } else {
        format!("Early break after {} months: no interest clawback required", stayed)
    };

    if overpaid.is_positive() {
        log::info!(
            "early break clawback of {} on principal {} ({} paid, {} allowed)",
            overpaid, input.principal, input.already_paid_interest, allowed.interest_amount
        );
    }

    Ok(PayoutBreakdown {
        notice,
        normal_rate: Some(normal),
        break_rate: Some(break_rate),
        interest_already_paid: Some(input.already_paid_interest),
        allowed_interest: Some(allowed.interest_amount),
        overpaid_interest: Some(overpaid),
        capital_returned: Some(capital_returned),
        total_payout: capital_returned,
        ..base(input, stayed, break_rate, Money::ZERO, true, BADGE_EARLY_BREAK)
    })
}

fn base(
    input: &SettlementInput<'_>,
    stayed: u32,
    rate: Rate,
    payable: Money,
    is_early_break: bool,
    badge: &str,
) -> PayoutBreakdown {
    PayoutBreakdown {
        trigger: input.trigger,
        payout_type: input.snapshot.payout_type(),
        as_of_date: input.as_of_date,
        principal: input.principal,
        stayed_months: stayed,
        interest_rate_used: rate,
        negotiation_rate: input.snapshot.negotiation_rate(),
        interest_payable_today: payable,
        is_early_break,
        badge: badge.to_string(),
        notice: String::new(),
        normal_rate: None,
        break_rate: None,
        interest_already_paid: None,
        allowed_interest: None,
        overpaid_interest: None,
        capital_returned: None,
        total_payout: Money::ZERO,
    }
}

fn ensure_non_negative(field: &'static str, amount: Money) -> Result<()> {
    if amount.is_negative() {
        return Err(SettlementError::NegativeAmount {
            field,
            amount: amount.as_decimal(),
        });
    }
    Ok(())
}

fn unsupported(trigger: SettlementTrigger, reason: &str) -> SettlementError {
    SettlementError::UnsupportedTrigger {
        trigger,
        reason: reason.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::ProductConfig;
    use chrono::{TimeZone, Utc};
    use rust_decimal_macros::dec;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn monthly_snapshot() -> InvestmentSnapshot {
        let product = ProductConfig::builder("FD-M12", "Monthly FD")
            .term_months(12)
            .payout_type(PayoutType::Monthly)
            .interest_rate_monthly(dec!(12))
            .interest_rate_maturity(dec!(13))
            .negotiation_rate(dec!(1))
            .early_break_rate_monthly(dec!(8))
            .early_break_rate_maturity(dec!(9))
            .build()
            .unwrap();
        InvestmentSnapshot::capture(&product, Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap())
    }

    fn maturity_snapshot() -> InvestmentSnapshot {
        let product = ProductConfig::builder("FD-X12", "Maturity FD")
            .term_months(12)
            .payout_type(PayoutType::Maturity)
            .interest_rate_monthly(dec!(9.5))
            .interest_rate_maturity(dec!(10))
            .early_break_rate_monthly(dec!(6))
            .early_break_rate_maturity(dec!(7))
            .build()
            .unwrap();
        InvestmentSnapshot::capture(&product, Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap())
    }

    fn input<'a>(
        snapshot: &'a InvestmentSnapshot,
        principal: i64,
        as_of: NaiveDate,
        paid: Money,
        trigger: SettlementTrigger,
    ) -> SettlementInput<'a> {
        SettlementInput {
            snapshot,
            principal: Money::from_major(principal),
            start_date: date(2024, 1, 1),
            maturity_date: date(2025, 1, 1),
            as_of_date: as_of,
            already_paid_interest: paid,
            trigger,
        }
    }

    #[test]
    fn test_monthly_early_break_clawback() {
        let snapshot = monthly_snapshot();
        let req = input(&snapshot, 100_000, date(2024, 7, 10), Money::from_major(6_000), SettlementTrigger::EarlyBreak);

        let b = compute_payout(&req, &SettlementConfig::default()).unwrap();

        assert_eq!(b.stayed_months, 6);
        assert_eq!(b.normal_rate, Some(Rate::from_percentage(12)));
        assert_eq!(b.break_rate, Some(Rate::from_percentage(8)));
        assert_eq!(b.interest_already_paid, Some(Money::from_major(6_000)));
        assert_eq!(b.allowed_interest, Some(Money::from_major(4_000)));
        assert_eq!(b.overpaid_interest, Some(Money::from_major(2_000)));
        assert_eq!(b.capital_returned, Some(Money::from_major(98_000)));
        assert_eq!(b.total_payout, Money::from_major(98_000));
        assert!(b.interest_payable_today.is_zero());
        assert!(b.is_early_break);
        assert_eq!(b.badge, BADGE_EARLY_BREAK);
        assert!(b.notice.contains("2000.00"));

        let amounts = b.amounts();
        assert_eq!(amounts.principal_amount, Money::from_major(100_000));
        assert_eq!(amounts.penalty_amount, Money::from_major(2_000));
        assert_eq!(
            amounts.principal_amount + amounts.interest_amount - amounts.penalty_amount,
            amounts.total_payout
        );
    }

    #[test]
    fn test_overpaid_interest_is_floored() {
        let snapshot = monthly_snapshot();
        let config = SettlementConfig::default();

        // allowed over 6 months at 8% is 4,000
        for (paid, expected) in [(0, 0), (3_000, 0), (4_000, 0), (4_500, 500), (6_000, 2_000)] {
            let req = input(&snapshot, 100_000, date(2024, 7, 1), Money::from_major(paid), SettlementTrigger::EarlyBreak);
            let b = compute_payout(&req, &config).unwrap();

            assert_eq!(b.overpaid_interest, Some(Money::from_major(expected)), "paid {}", paid);
            // conservation
            assert_eq!(b.capital_returned.unwrap() + b.overpaid_interest.unwrap(), b.principal);
            assert!(!b.total_payout.is_negative());
        }
    }

    #[test]
    fn test_early_break_on_start_date() {
        let snapshot = monthly_snapshot();
        let req = input(&snapshot, 100_000, date(2024, 1, 1), Money::ZERO, SettlementTrigger::EarlyBreak);

        let b = compute_payout(&req, &SettlementConfig::default()).unwrap();

        assert_eq!(b.stayed_months, 0);
        assert_eq!(b.allowed_interest, Some(Money::ZERO));
        assert_eq!(b.total_payout, Money::from_major(100_000));
        assert!(b.notice.contains("no interest clawback"));
    }

    #[test]
    fn test_clawback_beyond_principal_fails() {
        let snapshot = monthly_snapshot();
        let req = input(&snapshot, 1_000, date(2024, 2, 1), Money::from_major(5_000), SettlementTrigger::EarlyBreak);

        let result = compute_payout(&req, &SettlementConfig::default());
        assert!(matches!(result, Err(SettlementError::NegativeAmount { field: "capital_returned", .. })));
    }

    #[test]
    fn test_maturity_on_time() {
        let snapshot = maturity_snapshot();
        let req = input(&snapshot, 50_000, date(2025, 1, 1), Money::ZERO, SettlementTrigger::Maturity);

        let b = compute_payout(&req, &SettlementConfig::default()).unwrap();

        assert_eq!(b.stayed_months, 12);
        assert_eq!(b.interest_rate_used, Rate::from_percentage(10));
        assert_eq!(b.interest_payable_today, Money::from_major(5_000));
        assert_eq!(b.total_payout, Money::from_major(55_000));
        assert!(!b.is_early_break);
        assert_eq!(b.badge, BADGE_MATURED);
    }

    #[test]
    fn test_oversized_principal_fails_instead_of_panicking() {
        let snapshot = maturity_snapshot();
        let req = SettlementInput {
            principal: Money::from_decimal(rust_decimal::Decimal::MAX),
            ..input(&snapshot, 0, date(2025, 1, 1), Money::ZERO, SettlementTrigger::Maturity)
        };

        let result = compute_payout(&req, &SettlementConfig::default());
        assert!(matches!(result, Err(SettlementError::InterestOverflow { months: 12, .. })));
    }

    #[test]
    fn test_late_maturity_stops_accruing_at_term() {
        let snapshot = maturity_snapshot();
        let req = input(&snapshot, 50_000, date(2025, 4, 15), Money::ZERO, SettlementTrigger::Maturity);

        let b = compute_payout(&req, &SettlementConfig::default()).unwrap();

        assert_eq!(b.stayed_months, 15);
        assert_eq!(b.total_payout, Money::from_major(55_000));
    }

    #[test]
    fn test_maturity_for_monthly_payout_pays_remaining_interest() {
        let snapshot = monthly_snapshot();
        // eleven installments of 1,000 already paid
        let req = input(&snapshot, 100_000, date(2025, 1, 1), Money::from_major(11_000), SettlementTrigger::Maturity);

        let b = compute_payout(&req, &SettlementConfig::default()).unwrap();

        assert_eq!(b.interest_rate_used, Rate::from_percentage(12));
        assert_eq!(b.interest_payable_today, Money::from_major(1_000));
        assert_eq!(b.total_payout, Money::from_major(101_000));
    }

    #[test]
    fn test_maturity_with_over_disbursement_fails() {
        let snapshot = monthly_snapshot();
        let req = input(&snapshot, 100_000, date(2025, 1, 1), Money::from_major(13_000), SettlementTrigger::Maturity);

        let result = compute_payout(&req, &SettlementConfig::default());
        assert!(matches!(result, Err(SettlementError::NegativeAmount { field: "interest_payable_today", .. })));
    }

    #[test]
    fn test_maturity_type_early_break() {
        let snapshot = maturity_snapshot();
        let req = input(&snapshot, 60_000, date(2024, 4, 20), Money::ZERO, SettlementTrigger::EarlyBreak);

        let b = compute_payout(&req, &SettlementConfig::default()).unwrap();

        // 3 months at 7%
        assert_eq!(b.stayed_months, 3);
        assert_eq!(b.interest_rate_used, Rate::from_percentage(7));
        assert_eq!(b.interest_payable_today, Money::from_major(1_050));
        assert_eq!(b.total_payout, Money::from_major(61_050));
        assert!(b.overpaid_interest.is_none());
        assert!(b.is_early_break);
        assert_eq!(b.amounts().penalty_amount, Money::ZERO);
    }

    #[test]
    fn test_scheduled_monthly() {
        let snapshot = monthly_snapshot();
        let req = input(&snapshot, 100_000, date(2024, 4, 1), Money::from_major(2_000), SettlementTrigger::ScheduledMonthly);

        let b = compute_payout(&req, &SettlementConfig::default()).unwrap();

        assert_eq!(b.stayed_months, 3);
        assert_eq!(b.interest_payable_today, Money::from_major(1_000));
        assert_eq!(b.total_payout, Money::from_major(1_000));
        assert_eq!(b.amounts().principal_amount, Money::ZERO);
        assert_eq!(b.badge, BADGE_MONTHLY_INTEREST);
    }

    #[test]
    fn test_scheduled_monthly_rejected_for_maturity_type() {
        let snapshot = maturity_snapshot();
        let req = input(&snapshot, 100_000, date(2024, 4, 1), Money::ZERO, SettlementTrigger::ScheduledMonthly);

        let result = compute_payout(&req, &SettlementConfig::default());
        assert!(matches!(result, Err(SettlementError::UnsupportedTrigger { .. })));
    }

    #[test]
    fn test_trigger_date_consistency() {
        let snapshot = monthly_snapshot();
        let config = SettlementConfig::default();

        let early_after_term = input(&snapshot, 1_000, date(2025, 1, 1), Money::ZERO, SettlementTrigger::EarlyBreak);
        assert!(matches!(compute_payout(&early_after_term, &config), Err(SettlementError::UnsupportedTrigger { .. })));

        let maturity_before_term = input(&snapshot, 1_000, date(2024, 12, 31), Money::ZERO, SettlementTrigger::Maturity);
        assert!(matches!(compute_payout(&maturity_before_term, &config), Err(SettlementError::UnsupportedTrigger { .. })));
    }

    #[test]
    fn test_as_of_before_start() {
        let snapshot = monthly_snapshot();
        let req = input(&snapshot, 1_000, date(2023, 12, 31), Money::ZERO, SettlementTrigger::EarlyBreak);

        let result = compute_payout(&req, &SettlementConfig::default());
        assert!(matches!(result, Err(SettlementError::InvalidDateRange { .. })));
    }

    #[test]
    fn test_negotiation_rate_policy() {
        let snapshot = monthly_snapshot();
        let req = input(&snapshot, 100_000, date(2024, 4, 1), Money::ZERO, SettlementTrigger::ScheduledMonthly);

        let informational = compute_payout(&req, &SettlementConfig::default()).unwrap();
        assert_eq!(informational.interest_rate_used, Rate::from_percentage(12));
        assert_eq!(informational.negotiation_rate, Rate::from_percentage(1));
        assert_eq!(informational.total_payout, Money::from_major(3_000));

        let additive = compute_payout(&req, &SettlementConfig::additive_negotiation()).unwrap();
        assert_eq!(additive.interest_rate_used, Rate::from_percentage(13));
        assert_eq!(additive.total_payout, Money::from_major(3_250));
    }

    #[test]
    fn test_compute_is_pure() {
        let snapshot = monthly_snapshot();
        let req = input(&snapshot, 100_000, date(2024, 7, 1), Money::from_major(6_000), SettlementTrigger::EarlyBreak);
        let config = SettlementConfig::default();

        assert_eq!(compute_payout(&req, &config).unwrap(), compute_payout(&req, &config).unwrap());
    }

    #[test]
    fn test_for_investment_status_rules() {
        let product = ProductConfig::monthly_fixed_deposit("FD-M", "Monthly").unwrap();
        let now = Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap();
        let mut investment =
            Investment::subscribe(&product, "TXN-1", Money::from_major(10_000), date(2024, 1, 1), now).unwrap();

        assert!(SettlementInput::for_investment(&investment, date(2024, 3, 1), Money::ZERO, SettlementTrigger::EarlyBreak).is_ok());

        investment.update_status(InvestmentStatus::Matured, now);
        let early = SettlementInput::for_investment(&investment, date(2025, 1, 1), Money::ZERO, SettlementTrigger::EarlyBreak);
        assert!(matches!(early, Err(SettlementError::UnsupportedTrigger { .. })));
        assert!(SettlementInput::for_investment(&investment, date(2025, 1, 1), Money::ZERO, SettlementTrigger::Maturity).is_ok());

        investment.update_status(InvestmentStatus::Closed, now);
        let closed = SettlementInput::for_investment(&investment, date(2025, 1, 1), Money::ZERO, SettlementTrigger::Maturity);
        assert!(matches!(closed, Err(SettlementError::InvestmentNotSettleable { .. })));
    }
}
