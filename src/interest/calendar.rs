use chrono::{Datelike, Months, NaiveDate};

use crate::errors::{Result, SettlementError};

/// add calendar months, clamping the day to the end of the target month
/// (jan 31 + 1 month = feb 28, or feb 29 in a leap year)
pub fn add_months(date: NaiveDate, months: u32) -> Result<NaiveDate> {
    date.checked_add_months(Months::new(months))
        .ok_or(SettlementError::InvalidDateRange {
            message: format!("{date} + {months} months is out of range"),
        })
}

/// whole calendar months elapsed between `start` and `as_of`
///
/// the largest `n` such that `add_months(start, n) <= as_of`. a partial month
/// never counts, so jan 15 -> feb 14 is 0 months and jan 15 -> feb 15 is 1.
pub fn stayed_months(start: NaiveDate, as_of: NaiveDate) -> Result<u32> {
    if as_of < start {
        return Err(SettlementError::date_before("as_of_date", as_of, "start_date", start));
    }

    let diff = (as_of.year() - start.year()) * 12 + as_of.month() as i32 - start.month() as i32;
    let mut months = diff.max(0) as u32;

    while months > 0 && add_months(start, months)? > as_of {
        months -= 1;
    }

    Ok(months)
}
