use chrono::{DateTime, NaiveDate, NaiveDateTime};

use crate::errors::{Result, ValidationError};

/// Half-open instant range `[start, end)` covering one calendar month.
pub fn month_bounds(year: i32, month: u32) -> Result<(NaiveDateTime, NaiveDateTime)> {
    let first = first_of_month(year, month)?;
    let next = if month == 12 {
        first_of_month(year + 1, 1)?
    } else {
        first_of_month(year, month + 1)?
    };
    Ok((
        first.and_hms_opt(0, 0, 0).unwrap_or_default(),
        next.and_hms_opt(0, 0, 0).unwrap_or_default(),
    ))
}

/// Half-open instant range `[start, end)` covering one calendar day.
pub fn day_bounds(day: NaiveDate) -> (NaiveDateTime, NaiveDateTime) {
    let start = day.and_hms_opt(0, 0, 0).unwrap_or_default();
    let end = day
        .succ_opt()
        .map(|next| next.and_hms_opt(0, 0, 0).unwrap_or_default())
        .unwrap_or(NaiveDateTime::MAX);
    (start, end)
}

/// Month key in the `YYYY-MM` form budget rows are stored under.
pub fn month_key(year: i32, month: u32) -> String {
    format!("{:04}-{:02}", year, month)
}

/// Accepts RFC 3339 timestamps or bare `YYYY-MM-DD` dates, the two forms
/// the write path receives from callers.
pub fn parse_event_datetime(raw: &str) -> Result<NaiveDateTime> {
    if let Ok(dt) = DateTime::parse_from_rfc3339(raw) {
        return Ok(dt.naive_utc());
    }
    if let Ok(date) = NaiveDate::parse_from_str(raw, "%Y-%m-%d") {
        return Ok(date.and_hms_opt(0, 0, 0).unwrap_or_default());
    }
    Err(ValidationError::InvalidInput(format!(
        "invalid date '{}', expected RFC 3339 or YYYY-MM-DD",
        raw
    ))
    .into())
}

fn first_of_month(year: i32, month: u32) -> Result<NaiveDate> {
    NaiveDate::from_ymd_opt(year, month, 1).ok_or_else(|| {
        ValidationError::InvalidPeriod(format!("{}-{}", year, month)).into()
    })
}
