use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// unique identifier for an investment
pub type InvestmentId = Uuid;

/// unique identifier for a payout request
pub type PayoutId = Uuid;

/// how interest is disbursed over the life of an investment
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum PayoutType {
    /// interest paid out every month during the term
    Monthly,
    /// all interest paid at term end
    Maturity,
}

/// investment status
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum InvestmentStatus {
    /// within term, earning interest
    Active,
    /// term over or terminal settlement requested, awaiting payout
    Matured,
    /// rolled into a new investment
    Renewed,
    /// settled, nothing further owed
    Closed,
}

impl InvestmentStatus {
    /// payout and renewal actions are only valid from these states
    pub fn is_settleable(&self) -> bool {
        matches!(self, InvestmentStatus::Active | InvestmentStatus::Matured)
    }
}

/// kind of payout record
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum PayoutKind {
    MonthlyInterest,
    Maturity,
    EarlyBreak,
}

/// payout status, forward-only
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum PayoutStatus {
    Pending,
    Approved,
    Paid,
}

/// the event that asks for a settlement
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum SettlementTrigger {
    /// a regular monthly interest date inside the term
    ScheduledMonthly,
    /// on or after the maturity date
    Maturity,
    /// customer withdraws before the maturity date
    EarlyBreak,
}

impl SettlementTrigger {
    pub fn payout_kind(&self) -> PayoutKind {
        match self {
            SettlementTrigger::ScheduledMonthly => PayoutKind::MonthlyInterest,
            SettlementTrigger::Maturity => PayoutKind::Maturity,
            SettlementTrigger::EarlyBreak => PayoutKind::EarlyBreak,
        }
    }

    /// terminal triggers return principal and end the investment
    pub fn is_terminal(&self) -> bool {
        !matches!(self, SettlementTrigger::ScheduledMonthly)
    }
}

impl PayoutKind {
    pub fn is_terminal(&self) -> bool {
        !matches!(self, PayoutKind::MonthlyInterest)
    }
}
