//! Month facts from the proleptic Gregorian calendar (via `chrono`).

use chrono::{Datelike, NaiveDate};

use crate::error::{Result, XlcalError};

/// Upper-case month names used for the sheet title.
pub const MONTH_NAMES: [&str; 12] = [
    "JANUARY",
    "FEBRUARY",
    "MARCH",
    "APRIL",
    "MAY",
    "JUNE",
    "JULY",
    "AUGUST",
    "SEPTEMBER",
    "OCTOBER",
    "NOVEMBER",
    "DECEMBER",
];

/// Day-of-week header labels, Sunday first.
pub const WEEKDAY_NAMES: [&str; 7] = [
    "SUNDAY",
    "MONDAY",
    "TUESDAY",
    "WEDNESDAY",
    "THURSDAY",
    "FRIDAY",
    "SATURDAY",
];

/// The two numbers the grid layout needs about a month.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MonthFacts {
    pub days_in_month: u32,
    /// Weekday of day 1, 0 = Sunday
    pub first_weekday: u32,
}

/// Compute days-in-month and the weekday of day 1.
///
/// `month` is zero-based (0 = January).
pub fn month_facts(year: i32, month: u32) -> Result<MonthFacts> {
    let invalid = || XlcalError::InvalidDate { year, month };
    if month > 11 {
        return Err(invalid());
    }

    let first = NaiveDate::from_ymd_opt(year, month + 1, 1).ok_or_else(invalid)?;
    let next_first = if month == 11 {
        NaiveDate::from_ymd_opt(year + 1, 1, 1)
    } else {
        NaiveDate::from_ymd_opt(year, month + 2, 1)
    }
    .ok_or_else(invalid)?;

    let last = next_first.pred_opt().ok_or_else(invalid)?;

    Ok(MonthFacts {
        days_in_month: last.day(),
        first_weekday: first.weekday().num_days_from_sunday(),
    })
}

/// Sheet title such as `FEBRUARY 2024`.
pub fn month_title(year: i32, month: u32) -> Result<String> {
    let name = usize::try_from(month)
        .ok()
        .and_then(|m| MONTH_NAMES.get(m))
        .ok_or(XlcalError::InvalidDate { year, month })?;
    Ok(format!("{name} {year}"))
}
