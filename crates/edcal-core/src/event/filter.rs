//! Composable event filtering.
//!
//! One predicate over the unified set: every axis is optional, an empty
//! axis imposes no constraint, values within an axis are OR'd and axes
//! are AND'd together.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::{Event, EventKind, EventOrigin, EventPriority, EventStatus};

/// Filter over the unified event set.
///
/// `Default` matches everything.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EventFilter {
    /// Source-stream visibility toggles.
    pub show_system: bool,
    pub show_user: bool,
    pub show_external: bool,
    pub show_book_tasks: bool,
    /// Case-insensitive substring over title, description and tag names.
    pub text: Option<String>,
    /// Tag-id intersection.
    pub tag_ids: Vec<String>,
    pub statuses: Vec<EventStatus>,
    pub priorities: Vec<EventPriority>,
    pub marketplaces: Vec<String>,
    pub book_ids: Vec<String>,
    pub origins: Vec<EventOrigin>,
    /// Inclusive date-range overlap test.
    pub range: Option<(DateTime<Utc>, DateTime<Utc>)>,
}

impl Default for EventFilter {
    fn default() -> Self {
        Self {
            show_system: true,
            show_user: true,
            show_external: true,
            show_book_tasks: true,
            text: None,
            tag_ids: Vec::new(),
            statuses: Vec::new(),
            priorities: Vec::new(),
            marketplaces: Vec::new(),
            book_ids: Vec::new(),
            origins: Vec::new(),
            range: None,
        }
    }
}

impl EventFilter {
    pub fn matches(&self, event: &Event) -> bool {
        self.matches_visibility(event)
            && self.matches_text(event)
            && intersects(&self.tag_ids, event.tags.iter().map(|t| t.id.as_str()))
            && contains(&self.statuses, &event.status)
            && contains(&self.priorities, &event.priority)
            && intersects(&self.marketplaces, event.marketplaces.iter().map(String::as_str))
            && intersects(&self.book_ids, event.book_ids.iter().map(String::as_str))
            && contains(&self.origins, &event.origin)
            && self.matches_range(event)
    }

    fn matches_visibility(&self, event: &Event) -> bool {
        match (event.kind, event.origin) {
            (EventKind::System, _) => self.show_system,
            (EventKind::User, EventOrigin::ExternalSync) => self.show_external,
            (EventKind::User, EventOrigin::BookTask) => self.show_book_tasks,
            (EventKind::User, EventOrigin::Local) => self.show_user,
        }
    }

    fn matches_text(&self, event: &Event) -> bool {
        let Some(needle) = self.text.as_deref() else {
            return true;
        };
        let needle = needle.trim().to_lowercase();
        if needle.is_empty() {
            return true;
        }
        event.title.to_lowercase().contains(&needle)
            || event
                .description
                .as_deref()
                .is_some_and(|d| d.to_lowercase().contains(&needle))
            || event.tags.iter().any(|t| t.name.to_lowercase().contains(&needle))
    }

    fn matches_range(&self, event: &Event) -> bool {
        match self.range {
            Some((start, end)) => event.overlaps(start, end),
            None => true,
        }
    }
}

/// Empty axis passes; otherwise the event's value must be listed.
fn contains<T: PartialEq>(axis: &[T], value: &T) -> bool {
    axis.is_empty() || axis.contains(value)
}

/// Empty axis passes; otherwise at least one event value must be listed.
fn intersects<'a>(axis: &[String], mut values: impl Iterator<Item = &'a str>) -> bool {
    axis.is_empty() || values.any(|v| axis.iter().any(|a| a == v))
}
