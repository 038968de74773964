//! In-process calendar provider.
//!
//! A deterministic provider backed by plain vectors, used by the CLI
//! composition root and the engine tests. Failure toggles let tests
//! exercise every error path without a network.

use std::collections::HashMap;

use chrono::{DateTime, Utc};
use serde_json::Value;

use super::codec::parse_remote_event;
use super::provider::CalendarProvider;
use super::types::{RemoteCalendar, SyncError};

/// Deterministic in-memory provider.
pub struct MockCalendarProvider {
    account: String,
    calendars: Vec<RemoteCalendar>,
    /// Remote events per calendar id, stored as raw payloads.
    events: HashMap<String, Vec<Value>>,
    upsert_counter: u64,
    pub fail_auth: bool,
    pub fail_list_events: bool,
    pub fail_upsert: bool,
}

impl MockCalendarProvider {
    pub fn new(account: &str) -> Self {
        Self {
            account: account.to_string(),
            calendars: Vec::new(),
            events: HashMap::new(),
            upsert_counter: 0,
            fail_auth: false,
            fail_list_events: false,
            fail_upsert: false,
        }
    }

    /// A provider with a primary work calendar, a promotions calendar
    /// and a couple of seeded events.
    pub fn seeded() -> Self {
        let mut provider = Self::new("ops@press.example");
        provider.add_calendar("work", "Work", true);
        provider.add_calendar("promo", "Promotions", false);
        provider.seed_event(
            "work",
            serde_json::json!({
                "id": "remote-standup",
                "summary": "Editorial standup",
                "start": { "dateTime": "2024-06-03T09:00:00Z" },
                "end": { "dateTime": "2024-06-03T09:30:00Z" },
                "updated": "2024-06-01T08:00:00Z",
            }),
        );
        provider.seed_event(
            "promo",
            serde_json::json!({
                "id": "remote-newsletter",
                "summary": "Newsletter send",
                "start": { "date": "2024-06-07" },
                "end": { "date": "2024-06-07" },
                "updated": "2024-06-01T08:00:00Z",
            }),
        );
        provider
    }

    pub fn add_calendar(&mut self, id: &str, name: &str, primary: bool) {
        self.calendars.push(RemoteCalendar {
            id: id.to_string(),
            name: name.to_string(),
            color: None,
            primary,
            selected: false,
        });
        self.events.entry(id.to_string()).or_default();
    }

    pub fn seed_event(&mut self, calendar_id: &str, payload: Value) {
        self.events.entry(calendar_id.to_string()).or_default().push(payload);
    }

    /// Payloads pushed into a calendar via `upsert_event`, for assertions.
    pub fn events_in(&self, calendar_id: &str) -> &[Value] {
        self.events.get(calendar_id).map(Vec::as_slice).unwrap_or(&[])
    }
}

impl CalendarProvider for MockCalendarProvider {
    fn authenticate(&mut self) -> Result<String, SyncError> {
        if self.fail_auth {
            return Err(SyncError::Auth("account rejected".into()));
        }
        Ok(self.account.clone())
    }

    fn list_calendars(&self) -> Result<Vec<RemoteCalendar>, SyncError> {
        Ok(self.calendars.clone())
    }

    fn list_events(
        &self,
        calendar_ids: &[String],
        from: DateTime<Utc>,
        to: DateTime<Utc>,
    ) -> Result<Vec<Value>, SyncError> {
        if self.fail_list_events {
            return Err(SyncError::Provider("remote unavailable".into()));
        }
        let mut out = Vec::new();
        for id in calendar_ids {
            for payload in self.events.get(id).map(Vec::as_slice).unwrap_or(&[]) {
                if let Ok(event) = parse_remote_event(payload) {
                    if event.overlaps(from, to) {
                        out.push(payload.clone());
                    }
                }
            }
        }
        Ok(out)
    }

    fn upsert_event(
        &mut self,
        calendar_id: &str,
        payload: &Value,
    ) -> Result<String, SyncError> {
        if self.fail_upsert {
            return Err(SyncError::Provider("remote unavailable".into()));
        }
        let events = self.events.entry(calendar_id.to_string()).or_default();

        let external_id = match payload["id"].as_str() {
            Some(id) => id.to_string(),
            None => {
                self.upsert_counter += 1;
                format!("ext-{}", self.upsert_counter)
            }
        };

        let mut stored = payload.clone();
        stored["id"] = serde_json::json!(external_id);
        match events
            .iter_mut()
            .find(|e| e["id"].as_str() == Some(external_id.as_str()))
        {
            Some(existing) => *existing = stored,
            None => events.push(stored),
        }
        Ok(external_id)
    }
}
