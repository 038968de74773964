//! The calendar sync provider capability.
//!
//! The engine is implementable against any backend satisfying this
//! shape; transport, OAuth mechanics and rate limiting are the
//! provider's concern. Event payloads cross this boundary as the
//! provider's raw JSON and are mapped by the codec.

use chrono::{DateTime, Utc};

use super::types::{RemoteCalendar, SyncError};

/// External calendar backend.
///
/// Implementations are expected to enforce the request timeout they were
/// constructed with and surface overruns as [`SyncError::Timeout`].
pub trait CalendarProvider: Send + Sync {
    /// Establish a session. Returns the account identifier on success.
    fn authenticate(&mut self) -> Result<String, SyncError>;

    /// List the calendars visible to the authenticated account.
    fn list_calendars(&self) -> Result<Vec<RemoteCalendar>, SyncError>;

    /// List event payloads in `[from, to]` across the given calendars.
    fn list_events(
        &self,
        calendar_ids: &[String],
        from: DateTime<Utc>,
        to: DateTime<Utc>,
    ) -> Result<Vec<serde_json::Value>, SyncError>;

    /// Create or update a single event, returning its remote id.
    /// A payload that already carries an id is an update, not a
    /// duplicate create.
    fn upsert_event(
        &mut self,
        calendar_id: &str,
        payload: &serde_json::Value,
    ) -> Result<String, SyncError>;
}
