//! CLI command groups.

pub mod book;
pub mod event;
pub mod remind;
pub mod sync;
pub mod system;

use chrono::{DateTime, Datelike, NaiveDate, Utc};
use edcal_core::{EventPriority, EventStatus};

/// Parse an RFC 3339 timestamp or a bare `YYYY-MM-DD` (midnight UTC).
pub fn parse_when(value: &str) -> Result<DateTime<Utc>, Box<dyn std::error::Error>> {
    if let Ok(ts) = DateTime::parse_from_rfc3339(value) {
        return Ok(ts.with_timezone(&Utc));
    }
    let date = NaiveDate::parse_from_str(value, "%Y-%m-%d")
        .map_err(|_| format!("Invalid date/time: {value} (expected RFC 3339 or YYYY-MM-DD)"))?;
    match date.and_hms_opt(0, 0, 0) {
        Some(dt) => Ok(dt.and_utc()),
        None => Err(format!("Invalid date: {value}").into()),
    }
}

/// Inclusive bounds of a `YYYY-MM` month, first day 00:00:00 through
/// last day 23:59:59.
pub fn month_range(
    value: &str,
) -> Result<(DateTime<Utc>, DateTime<Utc>), Box<dyn std::error::Error>> {
    let first = NaiveDate::parse_from_str(&format!("{value}-01"), "%Y-%m-%d")
        .map_err(|_| format!("Invalid month: {value} (expected YYYY-MM)"))?;
    let next = if first.month() == 12 {
        NaiveDate::from_ymd_opt(first.year() + 1, 1, 1)
    } else {
        NaiveDate::from_ymd_opt(first.year(), first.month() + 1, 1)
    };
    let last = next
        .and_then(|d| d.pred_opt())
        .ok_or(format!("Invalid month: {value}"))?;
    match (first.and_hms_opt(0, 0, 0), last.and_hms_opt(23, 59, 59)) {
        (Some(start), Some(end)) => Ok((start.and_utc(), end.and_utc())),
        _ => Err(format!("Invalid month: {value}").into()),
    }
}

pub fn parse_status(value: &str) -> Result<EventStatus, Box<dyn std::error::Error>> {
    match value {
        "pending" => Ok(EventStatus::Pending),
        "in_progress" => Ok(EventStatus::InProgress),
        "review" => Ok(EventStatus::Review),
        "done" => Ok(EventStatus::Done),
        "cancelled" => Ok(EventStatus::Cancelled),
        _ => Err(format!(
            "Unknown status: {value}. Valid: pending, in_progress, review, done, cancelled"
        )
        .into()),
    }
}

pub fn parse_priority(value: &str) -> Result<EventPriority, Box<dyn std::error::Error>> {
    match value {
        "low" => Ok(EventPriority::Low),
        "medium" => Ok(EventPriority::Medium),
        "high" => Ok(EventPriority::High),
        "urgent" => Ok(EventPriority::Urgent),
        _ => Err(format!("Unknown priority: {value}. Valid: low, medium, high, urgent").into()),
    }
}
