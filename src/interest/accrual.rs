use crate::decimal::{Money, Rate};
use crate::errors::{Result, SettlementError};
use crate::interest::InterestCalculation;

/// simple (non-compounding) interest over whole months
///
/// every investment settles on whole months, so there is no day count
/// convention here: a month is a twelfth of the annual rate.
#[derive(Debug, Clone, Copy, Default)]
pub struct AccrualEngine;

impl AccrualEngine {
    pub fn new() -> Self {
        Self
    }

    /// interest for `months` whole months at `annual_rate`
    pub fn accrue(&self, principal: Money, annual_rate: Rate, months: u32) -> Result<InterestCalculation> {
        let interest_amount =
            principal
                .simple_interest(annual_rate, months)
                .ok_or(SettlementError::InterestOverflow {
                    principal: principal.as_decimal(),
                    months,
                })?;

        Ok(InterestCalculation {
            interest_amount,
            annual_rate,
            months,
            principal_base: principal,
        })
    }

    /// cumulative interest due after `months`, capped at the contractual term
    pub fn accrue_within_term(
        &self,
        principal: Money,
        annual_rate: Rate,
        months: u32,
        term_months: u32,
    ) -> Result<InterestCalculation> {
        self.accrue(principal, annual_rate, months.min(term_months))
    }
}
