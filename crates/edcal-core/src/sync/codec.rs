//! Encoding/decoding between provider event payloads and [`Event`].
//!
//! The payload shape follows the common calendar-API convention: all-day
//! events carry `start.date`/`end.date`, timed events carry
//! `start.dateTime`/`end.dateTime` in RFC 3339, and a cancelled remote
//! event has `"status": "cancelled"`.

use chrono::{DateTime, NaiveDate, Utc};
use serde_json::{json, Value};

use crate::event::{clamp_span, Event, EventKind, EventOrigin, EventPriority, EventStatus};

use super::types::SyncError;

/// Map a provider payload to an external-sync [`Event`].
///
/// The returned event has an empty local id; the repository assigns one
/// when the event is first merged.
pub fn parse_remote_event(payload: &Value) -> Result<Event, SyncError> {
    let external_id = payload["id"]
        .as_str()
        .ok_or_else(|| SyncError::MalformedEvent("missing id".into()))?
        .to_string();
    let title = payload["summary"]
        .as_str()
        .ok_or_else(|| SyncError::MalformedEvent("missing summary".into()))?
        .to_string();

    let (start_at, all_day) = parse_point(&payload["start"])?;
    let (end_at, _) = parse_point(&payload["end"]).unwrap_or((start_at, all_day));
    let (end_at, _) = clamp_span(start_at, end_at);

    let updated_at = payload["updated"]
        .as_str()
        .and_then(|s| DateTime::parse_from_rfc3339(s).ok())
        .map(|t| t.with_timezone(&Utc))
        .unwrap_or(start_at);

    let status = if payload["status"].as_str() == Some("cancelled") {
        EventStatus::Cancelled
    } else {
        EventStatus::Pending
    };

    Ok(Event {
        id: String::new(),
        kind: EventKind::User,
        origin: EventOrigin::ExternalSync,
        title,
        description: payload["description"].as_str().map(|s| s.to_string()),
        start_at,
        end_at,
        all_day,
        status,
        priority: EventPriority::Medium,
        tags: Vec::new(),
        book_ids: Vec::new(),
        checklist: Vec::new(),
        reminders: Vec::new(),
        external_id: Some(external_id),
        template_key: None,
        book_id: None,
        task_id: None,
        campaign: None,
        marketplaces: Vec::new(),
        created_at: updated_at,
        updated_at,
    })
}

/// Map a local event to the provider payload shape. An event that
/// already carries an `external_id` keeps it, so the provider treats
/// the upsert as an update.
pub fn to_remote_event(event: &Event) -> Value {
    let mut payload = json!({
        "summary": event.title,
        "start": encode_point(event.start_at, event.all_day),
        "end": encode_point(event.end_at, event.all_day),
        "updated": event.updated_at.to_rfc3339(),
    });
    if let Some(description) = &event.description {
        payload["description"] = json!(description);
    }
    if let Some(external_id) = &event.external_id {
        payload["id"] = json!(external_id);
    }
    if event.status == EventStatus::Cancelled {
        payload["status"] = json!("cancelled");
    }
    payload
}

fn parse_point(value: &Value) -> Result<(DateTime<Utc>, bool), SyncError> {
    if let Some(date) = value["date"].as_str() {
        let day = date
            .parse::<NaiveDate>()
            .map_err(|e| SyncError::MalformedEvent(format!("bad date '{date}': {e}")))?;
        return Ok((day.and_hms_opt(0, 0, 0).unwrap().and_utc(), true));
    }
    if let Some(stamp) = value["dateTime"].as_str() {
        let at = DateTime::parse_from_rfc3339(stamp)
            .map_err(|e| SyncError::MalformedEvent(format!("bad dateTime '{stamp}': {e}")))?;
        return Ok((at.with_timezone(&Utc), false));
    }
    Err(SyncError::MalformedEvent("missing start/end".into()))
}

fn encode_point(at: DateTime<Utc>, all_day: bool) -> Value {
    if all_day {
        json!({ "date": at.format("%Y-%m-%d").to_string() })
    } else {
        json!({ "dateTime": at.to_rfc3339() })
    }
}
