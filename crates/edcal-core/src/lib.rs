//! # Edcal Core Library
//!
//! This library provides the core business logic for the Edcal editorial
//! calendar. It implements a CLI-first philosophy where all operations are
//! available via a standalone CLI binary, with any GUI being a thin layer
//! over the same core library.
//!
//! ## Architecture
//!
//! - **Event Store**: In-memory repository for user events with read-only
//!   overlays for generated system events and book-task mirrors
//! - **System Events**: Deterministic yearly generation from a template
//!   catalog, including weekday-based dynamic date rules
//! - **Sync**: Bidirectional engine over a pluggable calendar provider,
//!   with a connection model and an append-only sync log
//! - **Reminders**: At-most-once reminder scheduling with an async poll loop
//!
//! ## Key Components
//!
//! - [`EventStore`]: Event repository and query surface
//! - [`SyncEngine`]: Import/export engine over a [`CalendarProvider`]
//! - [`ReminderScheduler`]: Due-reminder scanning and delivery
//! - [`Config`]: Application configuration management

pub mod book_tasks;
pub mod config;
pub mod error;
pub mod event;
pub mod id;
pub mod reminders;
pub mod sync;
pub mod system_events;

pub use book_tasks::{events_from_book_tasks, BookStage, BookTask, BookTaskSource, StaticBookTaskSource};
pub use config::{Config, ReminderConfig, SyncConfig};
pub use error::{ConfigError, CoreError, Result, ValidationError};
pub use event::{
    ClampWarning, Event, EventDraft, EventFilter, EventKind, EventOrigin, EventPatch,
    EventPriority, EventStatus, EventStore, Reminder, ReminderChannel, SaveStatus, Tag,
};
pub use id::{IdProvider, SequentialIdProvider, UuidProvider};
pub use reminders::{ReminderNotification, ReminderScheduler, UpcomingReminder};
pub use sync::{
    CalendarProvider, ConflictChoice, Connection, MockCalendarProvider, RemoteCalendar,
    SyncAction, SyncEngine, SyncError, SyncLogEntry, SyncLogStatus, SyncReport,
};
pub use system_events::{default_catalog, generate_for_year, generate_window, DynamicRule, Template};
