//! Event repository.
//!
//! Holds the mutable set of user-authored and imported-external events and
//! merges it with the read-only overlays (system events, book-task events)
//! into the unified event set the rest of the engine consumes.
//!
//! Mutation rules: only `kind == User, origin == Local` events accept
//! `update`/`delete`/`move_event`. Calls against any other id are silent
//! no-ops -- they originate from optimistic UI actions that may race with
//! list refreshes, so they are not errors.

use chrono::{DateTime, Datelike, Duration, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

use super::{
    clamp_span, ClampWarning, Event, EventDraft, EventFilter, EventKind, EventOrigin, EventPatch,
    EventStatus,
};
use crate::error::ValidationError;
use crate::id::{IdProvider, UuidProvider};

/// Observable save indicator for the presentation layer. Not a
/// correctness signal.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SaveStatus {
    Idle,
    Saving,
    Saved,
}

/// The event repository.
pub struct EventStore {
    /// User-authored and imported-external events. The only mutable set.
    events: Vec<Event>,
    /// Ephemeral system-event overlay, regenerated per year.
    system_events: Vec<Event>,
    /// Book-task overlay mirrored from the kanban backlog.
    book_events: Vec<Event>,
    ids: Box<dyn IdProvider>,
    save_status: SaveStatus,
}

impl EventStore {
    pub fn new(ids: Box<dyn IdProvider>) -> Self {
        Self {
            events: Vec::new(),
            system_events: Vec::new(),
            book_events: Vec::new(),
            ids,
            save_status: SaveStatus::Idle,
        }
    }

    /// Restore a store from previously serialized user/external events.
    pub fn with_events(ids: Box<dyn IdProvider>, events: Vec<Event>) -> Self {
        let mut store = Self::new(ids);
        store.events = events;
        store
    }

    // ── Queries ──────────────────────────────────────────────────────

    /// The unified event set: mutable events plus both overlays.
    pub fn all(&self) -> Vec<Event> {
        let mut out = self.events.clone();
        out.extend(self.system_events.iter().cloned());
        out.extend(self.book_events.iter().cloned());
        out
    }

    /// The mutable (user + external) set only, e.g. for session persistence.
    pub fn stored_events(&self) -> &[Event] {
        &self.events
    }

    /// Look up an event anywhere in the unified set.
    pub fn find(&self, id: &str) -> Option<&Event> {
        self.events
            .iter()
            .chain(self.system_events.iter())
            .chain(self.book_events.iter())
            .find(|e| e.id == id)
    }

    /// Local-origin events not yet pushed to the external calendar.
    pub fn unsynced_local(&self) -> Vec<Event> {
        self.events
            .iter()
            .filter(|e| e.origin == EventOrigin::Local && e.external_id.is_none())
            .cloned()
            .collect()
    }

    pub fn save_status(&self) -> SaveStatus {
        self.save_status
    }

    /// Return the save indicator to `Idle` after the UI has shown it.
    pub fn acknowledge_save(&mut self) {
        self.save_status = SaveStatus::Idle;
    }

    // ── Mutations ────────────────────────────────────────────────────

    /// Create a user event from a draft. Rejects an empty trimmed title or
    /// a missing start before any state changes; an inverted span is
    /// clamped and reported as a warning.
    pub fn create(
        &mut self,
        draft: EventDraft,
    ) -> Result<(Event, Option<ClampWarning>), ValidationError> {
        let title = draft.title.trim().to_string();
        if title.is_empty() {
            return Err(ValidationError::EmptyTitle);
        }
        let start_at = draft.start_at.ok_or(ValidationError::MissingStart)?;

        self.save_status = SaveStatus::Saving;

        let (end_at, clamped) = clamp_span(start_at, draft.end_at.unwrap_or(start_at));
        let now = Utc::now();
        let id = self.ids.next_id("event");

        let event = Event {
            id: id.clone(),
            kind: EventKind::User,
            origin: EventOrigin::Local,
            title,
            description: draft.description,
            start_at,
            end_at,
            all_day: draft.all_day,
            status: draft.status.unwrap_or_default(),
            priority: draft.priority.unwrap_or_default(),
            tags: dedup_tags(draft.tags),
            book_ids: draft.book_ids,
            checklist: draft.checklist,
            reminders: draft.reminders,
            external_id: None,
            template_key: None,
            book_id: None,
            task_id: None,
            campaign: None,
            marketplaces: draft.marketplaces,
            created_at: now,
            updated_at: now,
        };
        self.events.push(event.clone());
        self.save_status = SaveStatus::Saved;

        let warning = clamped.then(|| ClampWarning {
            event_id: id,
            supplied_end: draft.end_at.unwrap_or(start_at),
            clamped_to: end_at,
        });
        Ok((event, warning))
    }

    /// Apply a partial update. No-op for unknown ids and for events that
    /// are not user-origin. Re-clamps the span whenever it is touched.
    pub fn update(&mut self, id: &str, patch: EventPatch) -> Option<ClampWarning> {
        let index = self.events.iter().position(|e| e.id == id && e.is_mutable())?;
        self.save_status = SaveStatus::Saving;
        let event = &mut self.events[index];

        if let Some(title) = patch.title {
            let title = title.trim().to_string();
            if !title.is_empty() {
                event.title = title;
            }
        }
        if let Some(description) = patch.description {
            event.description = description;
        }
        if let Some(all_day) = patch.all_day {
            event.all_day = all_day;
        }
        if let Some(status) = patch.status {
            event.status = status;
        }
        if let Some(priority) = patch.priority {
            event.priority = priority;
        }
        if let Some(tags) = patch.tags {
            event.tags = dedup_tags(tags);
        }
        if let Some(book_ids) = patch.book_ids {
            event.book_ids = book_ids;
        }
        if let Some(checklist) = patch.checklist {
            event.checklist = checklist;
        }
        if let Some(reminders) = patch.reminders {
            event.reminders = reminders;
        }
        if let Some(marketplaces) = patch.marketplaces {
            event.marketplaces = marketplaces;
        }

        let mut warning = None;
        if patch.start_at.is_some() || patch.end_at.is_some() {
            let start = patch.start_at.unwrap_or(event.start_at);
            let supplied_end = patch.end_at.unwrap_or(event.end_at);
            let (end, clamped) = clamp_span(start, supplied_end);
            event.start_at = start;
            event.end_at = end;
            if clamped {
                warning = Some(ClampWarning {
                    event_id: event.id.clone(),
                    supplied_end,
                    clamped_to: end,
                });
            }
        }

        event.touch(Utc::now());
        self.save_status = SaveStatus::Saved;
        warning
    }

    /// Remove a user event. Unknown or non-local ids are a silent no-op.
    pub fn delete(&mut self, id: &str) {
        self.events.retain(|e| e.id != id || !e.is_mutable());
    }

    /// Shift an event to a new start, preserving its duration. No-op for
    /// non-user origins -- their span is externally authoritative.
    pub fn move_event(&mut self, id: &str, new_start: DateTime<Utc>) {
        if let Some(event) = self.events.iter_mut().find(|e| e.id == id && e.is_mutable()) {
            let duration = event.duration();
            event.start_at = new_start;
            event.end_at = new_start + duration;
            event.touch(Utc::now());
        }
    }

    /// Deep-copy any event into a fresh user-origin event. This is the
    /// only path by which a system event becomes editable.
    pub fn duplicate(&mut self, id: &str) -> Option<Event> {
        let source = self.find(id)?.clone();
        let now = Utc::now();
        let copy = Event {
            id: self.ids.next_id("event"),
            kind: EventKind::User,
            origin: EventOrigin::Local,
            title: format!("{} (copy)", source.title),
            external_id: None,
            template_key: None,
            book_id: None,
            task_id: None,
            created_at: now,
            updated_at: now,
            ..source
        };
        self.events.push(copy.clone());
        Some(copy)
    }

    /// Merge externally synced events, keyed by `external_id`. Existing
    /// entries are overwritten (remote wins); new ones are appended with
    /// `origin = ExternalSync`. Idempotent under repeated application.
    pub fn import_external(&mut self, incoming: Vec<Event>) {
        let now = Utc::now();
        for mut remote in incoming {
            let Some(external_id) = remote.external_id.clone() else {
                continue;
            };
            remote.origin = EventOrigin::ExternalSync;
            (remote.end_at, _) = clamp_span(remote.start_at, remote.end_at);

            match self
                .events
                .iter_mut()
                .find(|e| e.external_id.as_deref() == Some(external_id.as_str()))
            {
                Some(existing) => {
                    remote.id = existing.id.clone();
                    remote.created_at = existing.created_at;
                    remote.updated_at = now;
                    *existing = remote;
                }
                None => {
                    if remote.id.is_empty() {
                        remote.id = self.ids.next_id("event");
                    }
                    remote.updated_at = now;
                    self.events.push(remote);
                }
            }
        }
    }

    /// Record that a local event now has an external counterpart, e.g.
    /// after an export leg assigned it a remote id.
    pub fn assign_external_id(&mut self, id: &str, external_id: String) {
        if let Some(event) = self.events.iter_mut().find(|e| e.id == id) {
            event.external_id = Some(external_id);
            event.touch(Utc::now());
        }
    }

    /// Install the ephemeral system-event overlay.
    pub fn set_system_events(&mut self, events: Vec<Event>) {
        self.system_events = events;
    }

    /// Install the book-task overlay.
    pub fn set_book_task_events(&mut self, events: Vec<Event>) {
        self.book_events = events;
    }

    // ── Range queries ────────────────────────────────────────────────

    /// Events overlapping `[start, end]`, inclusive on both ends.
    pub fn events_in_range(&self, start: DateTime<Utc>, end: DateTime<Utc>) -> Vec<Event> {
        let mut filter = EventFilter::default();
        filter.range = Some((start, end));
        self.filtered(&filter)
    }

    pub fn events_for_day(&self, day: NaiveDate) -> Vec<Event> {
        let start = day.and_hms_opt(0, 0, 0).unwrap().and_utc();
        let end = day.and_hms_opt(23, 59, 59).unwrap().and_utc();
        self.events_in_range(start, end)
    }

    pub fn events_for_month(&self, year: i32, month: u32) -> Vec<Event> {
        let Some(first) = NaiveDate::from_ymd_opt(year, month, 1) else {
            return Vec::new();
        };
        let next_month = if month == 12 {
            NaiveDate::from_ymd_opt(year + 1, 1, 1)
        } else {
            NaiveDate::from_ymd_opt(year, month + 1, 1)
        };
        let Some(last) = next_month.and_then(|d| d.pred_opt()) else {
            return Vec::new();
        };
        let start = first.and_hms_opt(0, 0, 0).unwrap().and_utc();
        let end = last.and_hms_opt(23, 59, 59).unwrap().and_utc();
        self.events_in_range(start, end)
    }

    /// Events in the ISO week (Monday..Sunday) containing `now`.
    pub fn this_week(&self, now: DateTime<Utc>) -> Vec<Event> {
        let monday = now.date_naive()
            - Duration::days(now.weekday().num_days_from_monday() as i64);
        let sunday = monday + Duration::days(6);
        let start = monday.and_hms_opt(0, 0, 0).unwrap().and_utc();
        let end = sunday.and_hms_opt(23, 59, 59).unwrap().and_utc();
        self.events_in_range(start, end)
    }

    /// The next `count` events starting at or after `now`, ascending by
    /// start. Ties keep insertion order (stable sort).
    pub fn upcoming(&self, now: DateTime<Utc>, count: usize) -> Vec<Event> {
        let mut out: Vec<Event> = self.all().into_iter().filter(|e| e.start_at >= now).collect();
        out.sort_by_key(|e| e.start_at);
        out.truncate(count);
        out
    }

    /// Apply a composable filter to the unified set.
    pub fn filtered(&self, filter: &EventFilter) -> Vec<Event> {
        self.all().into_iter().filter(|e| filter.matches(e)).collect()
    }

    /// Count of events currently carrying a given status, across the
    /// unified set.
    pub fn count_by_status(&self, status: EventStatus) -> usize {
        self.all().iter().filter(|e| e.status == status).count()
    }
}

impl Default for EventStore {
    fn default() -> Self {
        Self::new(Box::new(UuidProvider))
    }
}

/// Keep at most one tag per id, first occurrence wins.
fn dedup_tags(tags: Vec<super::Tag>) -> Vec<super::Tag> {
    let mut seen = std::collections::HashSet::new();
    tags.into_iter().filter(|t| seen.insert(t.id.clone())).collect()
}
