pub mod accrual;
pub mod calendar;

use serde::{Deserialize, Serialize};

use crate::decimal::{Money, Rate};

pub use accrual::AccrualEngine;
pub use calendar::{add_months, stayed_months};

/// interest calculation result
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct InterestCalculation {
    pub interest_amount: Money,
    pub annual_rate: Rate,
    pub months: u32,
    pub principal_base: Money,
}
