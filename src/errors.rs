use chrono::NaiveDate;
use thiserror::Error;

use crate::types::{InvestmentId, InvestmentStatus, PayoutId, PayoutStatus, SettlementTrigger};

#[derive(Error, Debug, Clone, PartialEq)]
pub enum SettlementError {
    #[error("invalid date range: {message}")]
    InvalidDateRange {
        message: String,
    },

    #[error("trigger {trigger:?} not supported: {reason}")]
    UnsupportedTrigger {
        trigger: SettlementTrigger,
        reason: String,
    },

    #[error("payout {existing} is still outstanding for investment {investment_id}")]
    PayoutAlreadyOutstanding {
        investment_id: InvestmentId,
        existing: PayoutId,
    },

    #[error("invalid transition: {from:?} -> {to:?}")]
    InvalidTransition {
        from: PayoutStatus,
        to: PayoutStatus,
    },

    #[error("negative amount for {field}: {amount}")]
    NegativeAmount {
        field: &'static str,
        amount: rust_decimal::Decimal,
    },

    #[error("settlement requires a payment reference")]
    MissingReference,

    #[error("investment not found: {id}")]
    InvestmentNotFound {
        id: InvestmentId,
    },

    #[error("payout not found: {id}")]
    PayoutNotFound {
        id: PayoutId,
    },

    #[error("product not found: {code}")]
    ProductNotFound {
        code: String,
    },

    #[error("investment not settleable: current status is {status:?}")]
    InvestmentNotSettleable {
        status: InvestmentStatus,
    },

    #[error("interest on {principal} over {months} months overflows")]
    InterestOverflow {
        principal: rust_decimal::Decimal,
        months: u32,
    },

    #[error("invalid configuration: {message}")]
    InvalidConfiguration {
        message: String,
    },
}

impl SettlementError {
    pub(crate) fn date_before(later: &str, later_date: NaiveDate, earlier: &str, earlier_date: NaiveDate) -> Self {
        SettlementError::InvalidDateRange {
            message: format!("{later} {later_date} precedes {earlier} {earlier_date}"),
        }
    }
}

pub type Result<T> = std::result::Result<T, SettlementError>;
