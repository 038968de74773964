//! Calendar event model.
//!
//! [`Event`] is the unifying entity across all four source streams:
//! user-authored entries, deterministic system dates, book-production
//! tasks and externally synced entries. The `end_at >= start_at` span
//! invariant is enforced by clamping at every write path (see
//! [`clamp_span`]); the clamp is reported as a warning, never an error.

pub mod filter;
pub mod store;

use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};

pub use filter::EventFilter;
pub use store::{EventStore, SaveStatus};

/// Whether an event was derived from a yearly template or authored by
/// the user.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EventKind {
    System,
    User,
}

/// Provenance of an event. Drives filterability and editability:
/// only `Local` events are mutable through the repository.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EventOrigin {
    Local,
    ExternalSync,
    BookTask,
}

/// Workflow status. Ordered for display, but no transition graph is
/// enforced -- any value is settable.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EventStatus {
    Pending,
    InProgress,
    Review,
    Done,
    Cancelled,
}

impl Default for EventStatus {
    fn default() -> Self {
        EventStatus::Pending
    }
}

/// Event priority. Total order: Low < Medium < High < Urgent.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
#[serde(rename_all = "snake_case")]
pub enum EventPriority {
    Low,
    Medium,
    High,
    Urgent,
}

impl Default for EventPriority {
    fn default() -> Self {
        EventPriority::Medium
    }
}

/// A named tag. Events hold at most one tag per id.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Tag {
    pub id: String,
    pub name: String,
    pub color: Option<String>,
}

/// One entry of an event's checklist. Order is significant.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChecklistItem {
    pub id: String,
    pub text: String,
    pub done: bool,
}

/// Delivery channel for a reminder notification.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ReminderChannel {
    Popup,
    Email,
}

/// A reminder attached to an event. Fires at `start_at - offset_minutes`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Reminder {
    pub id: String,
    pub offset_minutes: i64,
    pub channel: ReminderChannel,
    pub enabled: bool,
}

/// Campaign metadata carried by system events derived from marketing
/// templates.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CampaignInfo {
    pub campaign_type: String,
    /// Recommended promotional window around the date, in days.
    pub window_days: u32,
    pub niches: Vec<String>,
}

/// The unifying calendar entity.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Event {
    pub id: String,
    pub kind: EventKind,
    pub origin: EventOrigin,
    pub title: String,
    pub description: Option<String>,
    pub start_at: DateTime<Utc>,
    /// Always >= `start_at`; writes violating this are clamped.
    pub end_at: DateTime<Utc>,
    pub all_day: bool,
    pub status: EventStatus,
    pub priority: EventPriority,
    pub tags: Vec<Tag>,
    pub book_ids: Vec<String>,
    pub checklist: Vec<ChecklistItem>,
    pub reminders: Vec<Reminder>,
    /// Sync dedup key. Present only when `origin` is `ExternalSync`.
    pub external_id: Option<String>,
    /// Template key for system events (`kind == System`).
    pub template_key: Option<String>,
    /// Provenance for book-task origin, used only for deep-linking.
    pub book_id: Option<String>,
    pub task_id: Option<String>,
    pub campaign: Option<CampaignInfo>,
    pub marketplaces: Vec<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Event {
    /// Inclusive overlap test against `[start, end]`: the event starts in
    /// range, ends in range, or fully spans it.
    pub fn overlaps(&self, start: DateTime<Utc>, end: DateTime<Utc>) -> bool {
        (self.start_at >= start && self.start_at <= end)
            || (self.end_at >= start && self.end_at <= end)
            || (self.start_at <= start && self.end_at >= end)
    }

    /// Span length. Preserved by `move_event`.
    pub fn duration(&self) -> Duration {
        self.end_at - self.start_at
    }

    /// Whether the repository accepts mutations for this event.
    pub fn is_mutable(&self) -> bool {
        self.kind == EventKind::User && self.origin == EventOrigin::Local
    }

    pub(crate) fn touch(&mut self, now: DateTime<Utc>) {
        self.updated_at = now;
    }
}

/// Caller-supplied fields for `EventStore::create`.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct EventDraft {
    pub title: String,
    pub description: Option<String>,
    pub start_at: Option<DateTime<Utc>>,
    /// Missing end defaults to the start.
    pub end_at: Option<DateTime<Utc>>,
    pub all_day: bool,
    pub status: Option<EventStatus>,
    pub priority: Option<EventPriority>,
    pub tags: Vec<Tag>,
    pub book_ids: Vec<String>,
    pub checklist: Vec<ChecklistItem>,
    pub reminders: Vec<Reminder>,
    pub marketplaces: Vec<String>,
}

/// Partial update for `EventStore::update`. `None` leaves a field alone.
#[derive(Debug, Clone, Default)]
pub struct EventPatch {
    pub title: Option<String>,
    pub description: Option<Option<String>>,
    pub start_at: Option<DateTime<Utc>>,
    pub end_at: Option<DateTime<Utc>>,
    pub all_day: Option<bool>,
    pub status: Option<EventStatus>,
    pub priority: Option<EventPriority>,
    pub tags: Option<Vec<Tag>>,
    pub book_ids: Option<Vec<String>>,
    pub checklist: Option<Vec<ChecklistItem>>,
    pub reminders: Option<Vec<Reminder>>,
    pub marketplaces: Option<Vec<String>>,
}

/// Non-fatal report that an `end_at < start_at` write was auto-corrected.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ClampWarning {
    pub event_id: String,
    pub supplied_end: DateTime<Utc>,
    pub clamped_to: DateTime<Utc>,
}

/// Enforce `end >= start`, returning the corrected end and whether a
/// clamp happened.
pub fn clamp_span(
    start: DateTime<Utc>,
    end: DateTime<Utc>,
) -> (DateTime<Utc>, bool) {
    if end < start {
        (start, true)
    } else {
        (end, false)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn at(h: u32) -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 6, 1, h, 0, 0).unwrap()
    }

    #[test]
    fn priority_total_order() {
        assert!(EventPriority::Low < EventPriority::Medium);
        assert!(EventPriority::Medium < EventPriority::High);
        assert!(EventPriority::High < EventPriority::Urgent);
    }

    #[test]
    fn clamp_corrects_inverted_span() {
        let (end, clamped) = clamp_span(at(10), at(8));
        assert_eq!(end, at(10));
        assert!(clamped);

        let (end, clamped) = clamp_span(at(8), at(10));
        assert_eq!(end, at(10));
        assert!(!clamped);
    }

    #[test]
    fn overlap_cases() {
        let event = Event {
            id: "e".into(),
            kind: EventKind::User,
            origin: EventOrigin::Local,
            title: "t".into(),
            description: None,
            start_at: at(10),
            end_at: at(12),
            all_day: false,
            status: EventStatus::Pending,
            priority: EventPriority::Medium,
            tags: vec![],
            book_ids: vec![],
            checklist: vec![],
            reminders: vec![],
            external_id: None,
            template_key: None,
            book_id: None,
            task_id: None,
            campaign: None,
            marketplaces: vec![],
            created_at: at(0),
            updated_at: at(0),
        };

        // Starts in range.
        assert!(event.overlaps(at(9), at(11)));
        // Ends in range.
        assert!(event.overlaps(at(11), at(13)));
        // Fully spans the range.
        assert!(event.overlaps(at(11), at(11)));
        // Disjoint.
        assert!(!event.overlaps(at(13), at(14)));
        assert!(!event.overlaps(at(8), at(9)));
    }
}
