//! Fixed-format publication dates.
//!
//! Published dates are stored in the index as `yyyyMMdd HH:mm` strings
//! (for example `20240131 09:30`). The format has minute precision, so any
//! value produced by [`to_px_date`] parses back to exactly the same
//! `NaiveDateTime` through [`parse_px_date`].

use chrono::{NaiveDateTime, Timelike};

use crate::error::{Error, Result};

/// chrono format string for the published date.
pub const PX_DATE_FORMAT: &str = "%Y%m%d %H:%M";

const PX_DATE_LEN: usize = 14;

/// Format a date-time as a published date string.
///
/// Seconds and sub-second precision are dropped.
///
/// ```
/// use chrono::NaiveDate;
/// use pxfind_core::date::to_px_date;
///
/// let dt = NaiveDate::from_ymd_opt(2024, 1, 31)
///     .unwrap()
///     .and_hms_opt(9, 30, 0)
///     .unwrap();
/// assert_eq!(to_px_date(&dt), "20240131 09:30");
/// ```
pub fn to_px_date(value: &NaiveDateTime) -> String {
    value.format(PX_DATE_FORMAT).to_string()
}

/// Check whether a string is a well-formed published date.
pub fn is_px_date(value: &str) -> bool {
    let bytes = value.as_bytes();
    if bytes.len() != PX_DATE_LEN {
        return false;
    }

    let shape_ok = bytes.iter().enumerate().all(|(i, b)| match i {
        8 => *b == b' ',
        11 => *b == b':',
        _ => b.is_ascii_digit(),
    });

    shape_ok && NaiveDateTime::parse_from_str(value, PX_DATE_FORMAT).is_ok()
}

/// Parse a published date string.
///
/// # Errors
///
/// Returns `Error::Parse` if the string is not in `yyyyMMdd HH:mm` form or
/// names an impossible date.
pub fn parse_px_date(value: &str) -> Result<NaiveDateTime> {
    if !is_px_date(value) {
        return Err(Error::parse(format!("'{value}' is not a published date")));
    }
    NaiveDateTime::parse_from_str(value, PX_DATE_FORMAT)
        .map_err(|e| Error::parse(format!("'{value}': {e}")))
}

/// Truncate a date-time to the precision the published format can carry.
pub fn truncate_to_minute(value: &NaiveDateTime) -> NaiveDateTime {
    value
        .with_second(0)
        .and_then(|v| v.with_nanosecond(0))
        .unwrap_or(*value)
}
