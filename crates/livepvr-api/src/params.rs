//! Parsing of user-supplied request parameters.

use anyhow::{Context, Result};
use chrono::{DateTime, NaiveDate, NaiveDateTime, Utc};

/// Tries full datetime formats, returns `None` if all fail.
fn try_full_datetime(s: &str) -> Option<NaiveDateTime> {
    NaiveDateTime::parse_from_str(s, "%Y-%m-%dT%H:%M:%S")
        .or_else(|_| NaiveDateTime::parse_from_str(s, "%Y-%m-%d %H:%M:%S"))
        .ok()
}

/// Parses a datetime string as UTC.
///
/// Accepts RFC 3339 (`2024-04-01T19:05:00-04:00`), `%Y-%m-%dT%H:%M:%S`,
/// `%Y-%m-%d %H:%M:%S` and `%Y-%m-%d` (midnight). Strings without an
/// offset are taken as UTC.
///
/// # Errors
///
/// Returns an error if the string does not match any known format.
pub fn parse_utc_datetime(s: &str) -> Result<DateTime<Utc>> {
    if let Ok(dt) = DateTime::parse_from_rfc3339(s) {
        return Ok(dt.with_timezone(&Utc));
    }
    if let Some(dt) = try_full_datetime(s) {
        return Ok(dt.and_utc());
    }
    let date = NaiveDate::parse_from_str(s, "%Y-%m-%d")
        .with_context(|| format!("invalid datetime format: {s}"))?;
    date.and_hms_opt(0, 0, 0)
        .map(|dt| dt.and_utc())
        .with_context(|| format!("invalid datetime: {s}"))
}
