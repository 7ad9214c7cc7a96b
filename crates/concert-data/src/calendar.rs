//! Calendar Dates and Status Derivation
//!
//! Concert dates are wall-clock calendar dates. Everything here works on
//! `NaiveDate` (year, month, day) so neither comparisons nor display can be
//! shifted by a UTC conversion near midnight.

use chrono::{Local, NaiveDate};

use crate::error::{DataError, Result};
use crate::model::ConcertStatus;

/// Manual status values that force a concert to `Cancelled`
pub const CANCELLING_STATUSES: [&str; 2] = ["cancelled", "hidden"];

/// Parse the leading `YYYY-MM-DD` of a date string.
///
/// Any time-of-day suffix (`2025-03-15T19:00:00Z`, `2025-03-15 19:00`) is
/// ignored.
pub fn parse_calendar_date(date: &str) -> Option<NaiveDate> {
    let date = date.trim();
    let day_part = date.split(['T', ' ']).next().unwrap_or(date);
    NaiveDate::parse_from_str(day_part, "%Y-%m-%d").ok()
}

/// Today's date on the local wall clock
pub fn today() -> NaiveDate {
    Local::now().date_naive()
}

/// Derive the display status of a concert.
///
/// A manual `cancelled` or `hidden` wins over the date. Any other manual
/// value is ignored and the date decides: on or after `today` is upcoming.
pub fn derive_status(
    date: NaiveDate,
    manual_status: Option<&str>,
    today: NaiveDate,
) -> ConcertStatus {
    if manual_status.is_some_and(|s| CANCELLING_STATUSES.contains(&s)) {
        return ConcertStatus::Cancelled;
    }

    if date >= today {
        ConcertStatus::Upcoming
    } else {
        ConcertStatus::Past
    }
}

/// Render a calendar date as "Saturday, March 15, 2025"
pub fn format_calendar_date(date: NaiveDate) -> String {
    date.format("%A, %B %-d, %Y").to_string()
}

/// Parse a `YYYY-MM-DD` string and render it in long form
pub fn format_date(date: &str) -> Result<String> {
    parse_calendar_date(date)
        .map(format_calendar_date)
        .ok_or_else(|| DataError::InvalidDate(date.to_string()))
}
