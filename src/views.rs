//! serializable views for the return settlement preview screen

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

use crate::decimal::{Money, Rate};
use crate::investment::Investment;
use crate::payout::InvestmentPayout;
use crate::settlement::PayoutBreakdown;
use crate::types::{InvestmentId, InvestmentStatus, PayoutId, PayoutKind, PayoutStatus, PayoutType};

/// what the operator sees before committing a settlement
#[derive(Debug, Serialize, Deserialize)]
pub struct SettlementPreviewView {
    pub investment: InvestmentSummaryView,
    pub snapshot: SnapshotView,
    pub return_preview: PayoutBreakdown,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct InvestmentSummaryView {
    pub id: InvestmentId,
    pub transaction_id: String,
    pub amount: Money,
    pub start_date: NaiveDate,
    pub maturity_date: NaiveDate,
    pub status: InvestmentStatus,
    pub renewed_from: Option<InvestmentId>,
}

/// frozen terms, shown alongside the preview
#[derive(Debug, Serialize, Deserialize)]
pub struct SnapshotView {
    pub product_code: String,
    pub product_name: String,
    pub policy_term_months: u32,
    pub payout_type: PayoutType,
    pub interest_rate_monthly: Rate,
    pub interest_rate_maturity: Rate,
    pub negotiation_rate: Rate,
    pub early_break_rate_monthly: Rate,
    pub early_break_rate_maturity: Rate,
    pub captured_at: DateTime<Utc>,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct PayoutView {
    pub id: PayoutId,
    pub investment_id: InvestmentId,
    pub payout_type: PayoutKind,
    pub status: PayoutStatus,
    pub principal_amount: Money,
    pub interest_amount: Money,
    pub penalty_amount: Money,
    pub total_payout: Money,
    pub reference_no: Option<String>,
    pub renewal_requested: bool,
    pub requested_at: DateTime<Utc>,
    pub paid_at: Option<DateTime<Utc>>,
}

impl InvestmentSummaryView {
    pub fn from_investment(investment: &Investment) -> Self {
        InvestmentSummaryView {
            id: investment.id,
            transaction_id: investment.transaction_id.clone(),
            amount: investment.amount,
            start_date: investment.start_date,
            maturity_date: investment.maturity_date,
            status: investment.status,
            renewed_from: investment.renewed_from,
        }
    }
}

impl SnapshotView {
    pub fn from_investment(investment: &Investment) -> Self {
        let s = investment.snapshot();
        SnapshotView {
            product_code: s.product_code().to_string(),
            product_name: s.product_name().to_string(),
            policy_term_months: s.policy_term_months(),
            payout_type: s.payout_type(),
            interest_rate_monthly: s.interest_rate_monthly(),
            interest_rate_maturity: s.interest_rate_maturity(),
            negotiation_rate: s.negotiation_rate(),
            early_break_rate_monthly: s.early_break_rate_monthly(),
            early_break_rate_maturity: s.early_break_rate_maturity(),
            captured_at: s.captured_at(),
        }
    }
}

impl SettlementPreviewView {
    pub fn new(investment: &Investment, breakdown: PayoutBreakdown) -> Self {
        SettlementPreviewView {
            investment: InvestmentSummaryView::from_investment(investment),
            snapshot: SnapshotView::from_investment(investment),
            return_preview: breakdown,
        }
    }

    /// convert to pretty-printed json string
    pub fn to_json_pretty(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string_pretty(self)
    }
}

impl PayoutView {
    pub fn from_payout(payout: &InvestmentPayout) -> Self {
        PayoutView {
            id: payout.id,
            investment_id: payout.investment_id,
            payout_type: payout.payout_type,
            status: payout.status,
            principal_amount: payout.principal_amount,
            interest_amount: payout.interest_amount,
            penalty_amount: payout.penalty_amount,
            total_payout: payout.total_payout,
            reference_no: payout.reference_no.clone(),
            renewal_requested: payout.renewal_requested,
            requested_at: payout.requested_at,
            paid_at: payout.paid_at,
        }
    }

    pub fn to_json_pretty(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string_pretty(self)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::{ProductConfig, SettlementConfig};
    use crate::settlement::{compute_payout, SettlementInput};
    use crate::types::SettlementTrigger;
    use chrono::TimeZone;

    #[test]
    fn test_preview_json_carries_breakdown() {
        let now = Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap();
        let product = ProductConfig::monthly_fixed_deposit("FD-M", "Monthly FD").unwrap();
        let start = NaiveDate::from_ymd_opt(2024, 1, 1).unwrap();
        let investment = Investment::subscribe(&product, "TXN-7", Money::from_major(100_000), start, now).unwrap();

        let as_of = NaiveDate::from_ymd_opt(2024, 7, 1).unwrap();
        let input =
            SettlementInput::for_investment(&investment, as_of, Money::from_major(6_000), SettlementTrigger::EarlyBreak)
                .unwrap();
        let breakdown = compute_payout(&input, &SettlementConfig::default()).unwrap();

        let json = SettlementPreviewView::new(&investment, breakdown).to_json_pretty().unwrap();
        let value: serde_json::Value = serde_json::from_str(&json).unwrap();

        assert_eq!(value["return_preview"]["trigger"], "EARLY_BREAK");
        assert_eq!(value["return_preview"]["is_early_break"], true);
        assert_eq!(value["return_preview"]["stayed_months"], 6);
        assert_eq!(value["return_preview"]["overpaid_interest"], "2000.00");
        assert_eq!(value["snapshot"]["product_code"], "FD-M");
        assert_eq!(value["investment"]["status"], "ACTIVE");
    }
}
