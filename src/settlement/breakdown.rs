use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::decimal::{Money, Rate};
use crate::types::{PayoutKind, PayoutType, SettlementTrigger};

/// everything the preview screen shows before a payout is committed
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PayoutBreakdown {
    pub trigger: SettlementTrigger,
    pub payout_type: PayoutType,
    pub as_of_date: NaiveDate,
    pub principal: Money,
    pub stayed_months: u32,
    pub interest_rate_used: Rate,
    pub negotiation_rate: Rate,
    pub interest_payable_today: Money,
    pub is_early_break: bool,
    pub badge: String,
    pub notice: String,

    // present only where the branch computes them
    pub normal_rate: Option<Rate>,
    pub break_rate: Option<Rate>,
    pub interest_already_paid: Option<Money>,
    pub allowed_interest: Option<Money>,
    pub overpaid_interest: Option<Money>,
    pub capital_returned: Option<Money>,

    pub total_payout: Money,
}

/// the monetary columns of a payout record
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PayoutAmounts {
    pub principal_amount: Money,
    pub interest_amount: Money,
    /// deducted from principal
    pub penalty_amount: Money,
    pub total_payout: Money,
}

impl PayoutBreakdown {
    pub fn payout_kind(&self) -> PayoutKind {
        self.trigger.payout_kind()
    }

    /// split into principal returned, interest and penalty
    ///
    /// `principal_amount + interest_amount - penalty_amount == total_payout`
    pub fn amounts(&self) -> PayoutAmounts {
        let principal_amount = match self.trigger {
            SettlementTrigger::ScheduledMonthly => Money::ZERO,
            SettlementTrigger::Maturity | SettlementTrigger::EarlyBreak => self.principal,
        };

        PayoutAmounts {
            principal_amount,
            interest_amount: self.interest_payable_today,
            penalty_amount: self.overpaid_interest.unwrap_or(Money::ZERO),
            total_payout: self.total_payout,
        }
    }

    /// penalty recovered from principal, zero when nothing was clawed back
    pub fn clawback(&self) -> Money {
        self.overpaid_interest.unwrap_or(Money::ZERO)
    }

    pub fn to_json_pretty(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string_pretty(self)
    }
}
