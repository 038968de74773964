//! External-calendar synchronization layer.
//!
//! One-shot import/export plus a bidirectional reconcile pass against an
//! abstract [`CalendarProvider`]. Every operation appends an immutable
//! log entry; provider failures never propagate into the repository.

pub mod codec;
pub mod engine;
pub mod mock_provider;
pub mod provider;
pub mod types;

#[cfg(test)]
mod engine_tests;

pub use codec::{parse_remote_event, to_remote_event};
pub use engine::{SyncEngine, SyncReport};
pub use mock_provider::MockCalendarProvider;
pub use provider::CalendarProvider;
pub use types::{
    ConflictChoice, Connection, RemoteCalendar, SyncAction, SyncError, SyncLogEntry,
    SyncLogStatus,
};
