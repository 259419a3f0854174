use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::decimal::Money;
use crate::errors::{Result, SettlementError};
use crate::settlement::PayoutBreakdown;
use crate::types::{InvestmentId, PayoutId, PayoutKind, PayoutStatus};

/// a payout request awaiting approval and disbursement
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct InvestmentPayout {
    pub id: PayoutId,
    pub investment_id: InvestmentId,
    pub payout_type: PayoutKind,
    pub principal_amount: Money,
    pub interest_amount: Money,
    /// recovered from principal
    pub penalty_amount: Money,
    pub total_payout: Money,
    pub status: PayoutStatus,
    pub reference_no: Option<String>,
    /// the preview the operator accepted
    pub breakdown: PayoutBreakdown,
    pub requested_at: DateTime<Utc>,
    pub approved_at: Option<DateTime<Utc>>,
    pub paid_at: Option<DateTime<Utc>>,
    /// renew the investment when this payout settles
    pub renewal_requested: bool,
}

/// result of a settle call
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SettleOutcome {
    /// moved to paid by this call
    Settled,
    /// already paid with the same reference, nothing changed
    AlreadySettled,
}

impl InvestmentPayout {
    /// new pending payout from an accepted breakdown
    pub fn from_breakdown(
        investment_id: InvestmentId,
        breakdown: PayoutBreakdown,
        requested_at: DateTime<Utc>,
    ) -> Self {
        let amounts = breakdown.amounts();
        Self {
            id: Uuid::new_v4(),
            investment_id,
            payout_type: breakdown.payout_kind(),
            principal_amount: amounts.principal_amount,
            interest_amount: amounts.interest_amount,
            penalty_amount: amounts.penalty_amount,
            total_payout: amounts.total_payout,
            status: PayoutStatus::Pending,
            reference_no: None,
            breakdown,
            requested_at,
            approved_at: None,
            paid_at: None,
            renewal_requested: false,
        }
    }

    pub fn is_outstanding(&self) -> bool {
        self.status != PayoutStatus::Paid
    }

    /// PENDING -> APPROVED
    pub fn approve(&mut self, now: DateTime<Utc>) -> Result<()> {
        if self.status != PayoutStatus::Pending {
            return Err(SettlementError::InvalidTransition {
                from: self.status,
                to: PayoutStatus::Approved,
            });
        }
        self.status = PayoutStatus::Approved;
        self.approved_at = Some(now);
        Ok(())
    }

    /// keep the principal invested instead of paying it out
    ///
    /// only an unpaid maturity payout can roll over. afterwards it disburses
    /// the final interest alone. returns the principal carried into the renewal.
    pub fn roll_over_principal(&mut self) -> Result<Money> {
        if self.payout_type != PayoutKind::Maturity {
            return Err(SettlementError::UnsupportedTrigger {
                trigger: self.breakdown.trigger,
                reason: "only maturity payouts can roll into a renewal".to_string(),
            });
        }
        if self.status == PayoutStatus::Paid {
            return Err(SettlementError::InvalidTransition {
                from: PayoutStatus::Paid,
                to: PayoutStatus::Paid,
            });
        }

        let rolled = self.principal_amount;
        self.principal_amount = Money::ZERO;
        self.total_payout -= rolled;
        self.renewal_requested = true;
        Ok(rolled)
    }

    /// PENDING or APPROVED -> PAID
    ///
    /// a repeat with the same reference is a no-op so a retried settlement
    /// never disburses twice; a different reference is rejected.
    pub fn settle(&mut self, reference_no: &str, now: DateTime<Utc>) -> Result<SettleOutcome> {
        let reference_no = reference_no.trim();
        if reference_no.is_empty() {
            return Err(SettlementError::MissingReference);
        }

        match self.status {
            PayoutStatus::Pending | PayoutStatus::Approved => {
                self.status = PayoutStatus::Paid;
                self.reference_no = Some(reference_no.to_string());
                self.paid_at = Some(now);
                Ok(SettleOutcome::Settled)
            }
            PayoutStatus::Paid if self.reference_no.as_deref() == Some(reference_no) => {
                Ok(SettleOutcome::AlreadySettled)
            }
            PayoutStatus::Paid => Err(SettlementError::InvalidTransition {
                from: PayoutStatus::Paid,
                to: PayoutStatus::Paid,
            }),
        }
    }
}
