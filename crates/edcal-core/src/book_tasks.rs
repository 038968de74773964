//! Book-production task boundary.
//!
//! Tasks live on the kanban backlog; the calendar only mirrors the dated
//! ones as a read-only overlay. The source is an injected capability so
//! the composition root decides where tasks come from.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::event::{Event, EventKind, EventOrigin, EventPriority, EventStatus};

/// Production stage of a book task, mirroring the kanban columns.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BookStage {
    Manuscript,
    Editing,
    Design,
    Production,
    Published,
}

impl BookStage {
    /// Workflow status shown for a task surfaced on the calendar.
    pub fn as_event_status(self) -> EventStatus {
        match self {
            BookStage::Manuscript => EventStatus::Pending,
            BookStage::Editing | BookStage::Design => EventStatus::InProgress,
            BookStage::Production => EventStatus::Review,
            BookStage::Published => EventStatus::Done,
        }
    }
}

/// One backlog item tied to a book.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BookTask {
    pub id: String,
    pub book_id: String,
    pub book_title: String,
    pub title: String,
    pub stage: BookStage,
    /// Undated tasks stay on the board and never reach the calendar.
    pub due_at: Option<DateTime<Utc>>,
    pub marketplaces: Vec<String>,
}

/// Where book tasks come from. Constructed at the composition root and
/// injected; the engine never reaches for an ambient backlog.
pub trait BookTaskSource: Send + Sync {
    fn tasks(&self) -> Vec<BookTask>;
}

/// Fixed in-memory source for demos and tests.
#[derive(Debug, Clone, Default)]
pub struct StaticBookTaskSource {
    tasks: Vec<BookTask>,
}

impl StaticBookTaskSource {
    pub fn new(tasks: Vec<BookTask>) -> Self {
        Self { tasks }
    }
}

impl BookTaskSource for StaticBookTaskSource {
    fn tasks(&self) -> Vec<BookTask> {
        self.tasks.clone()
    }
}

/// Map dated tasks to read-only calendar events. Pure and idempotent:
/// ids follow `book-task-{task id}` and timestamps are pinned to the
/// due date, so re-deriving the overlay is always safe.
pub fn events_from_book_tasks(tasks: &[BookTask]) -> Vec<Event> {
    tasks
        .iter()
        .filter_map(|task| {
            let due_at = task.due_at?;
            let day = due_at.date_naive();
            let start_at = day.and_hms_opt(0, 0, 0).unwrap().and_utc();
            let end_at = day.and_hms_opt(23, 59, 59).unwrap().and_utc();
            Some(Event {
                id: format!("book-task-{}", task.id),
                kind: EventKind::User,
                origin: EventOrigin::BookTask,
                title: format!("{}: {}", task.book_title, task.title),
                description: None,
                start_at,
                end_at,
                all_day: true,
                status: task.stage.as_event_status(),
                priority: EventPriority::Medium,
                tags: Vec::new(),
                book_ids: vec![task.book_id.clone()],
                checklist: Vec::new(),
                reminders: Vec::new(),
                external_id: None,
                template_key: None,
                book_id: Some(task.book_id.clone()),
                task_id: Some(task.id.clone()),
                campaign: None,
                marketplaces: task.marketplaces.clone(),
                created_at: start_at,
                updated_at: start_at,
            })
        })
        .collect()
}
