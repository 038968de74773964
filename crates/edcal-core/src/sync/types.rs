//! Core types for external-calendar synchronization.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Kind of sync operation recorded in the log.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SyncAction {
    Import,
    Export,
    Sync,
}

/// Outcome recorded in the log.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SyncLogStatus {
    Success,
    Partial,
    Error,
}

/// Immutable record of one sync operation. The log is append-only,
/// newest first.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SyncLogEntry {
    pub id: String,
    pub action: SyncAction,
    pub status: SyncLogStatus,
    pub events_processed: usize,
    pub events_created: usize,
    pub events_updated: usize,
    pub timestamp: DateTime<Utc>,
}

/// One selectable calendar on the remote account.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RemoteCalendar {
    pub id: String,
    pub name: String,
    pub color: Option<String>,
    pub primary: bool,
    /// Authorization scope for import/export.
    pub selected: bool,
}

/// Connection/session state for the external calendar account.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Connection {
    pub is_connected: bool,
    pub account: Option<String>,
    pub last_sync_at: Option<DateTime<Utc>>,
    pub sync_enabled: bool,
    pub calendars: Vec<RemoteCalendar>,
}

impl Connection {
    pub fn selected_calendar_ids(&self) -> Vec<String> {
        self.calendars
            .iter()
            .filter(|c| c.selected)
            .map(|c| c.id.clone())
            .collect()
    }
}

/// Which side survives an explicitly resolved conflict.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ConflictChoice {
    KeepLocal,
    KeepRemote,
}

/// Sync error types. All of these are recoverable: the engine catches
/// them at its boundary, records an error log entry and returns an
/// empty result to the caller.
#[derive(Debug, thiserror::Error)]
pub enum SyncError {
    #[error("Provider error: {0}")]
    Provider(String),

    #[error("Authentication rejected: {0}")]
    Auth(String),

    #[error("Not connected to the calendar account")]
    NotConnected,

    #[error("A sync operation is already in flight")]
    SyncInProgress,

    #[error("Provider request timed out")]
    Timeout,

    #[error("Malformed remote event: {0}")]
    MalformedEvent(String),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}
