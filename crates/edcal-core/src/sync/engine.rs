//! Sync engine for external-calendar reconciliation.
//!
//! Owns the connection state, the selectable calendar list and the
//! append-only operation log. Import and export never touch the event
//! repository directly: they return mapped events and id assignments for
//! the caller to apply, keeping the two components decoupled.
//!
//! Provider failures are caught here, recorded as `status = error` log
//! entries and surfaced as empty results -- sync is always recoverable
//! and must never corrupt the repository.

use chrono::{DateTime, Duration, Utc};

use crate::config::SyncConfig;
use crate::event::{Event, EventOrigin};
use crate::id::{IdProvider, UuidProvider};

use super::codec::{parse_remote_event, to_remote_event};
use super::provider::CalendarProvider;
use super::types::{
    ConflictChoice, Connection, SyncAction, SyncError, SyncLogEntry, SyncLogStatus,
};

/// Result of a bidirectional pass, for the caller to apply to the store.
#[derive(Debug, Default)]
pub struct SyncReport {
    /// Remote events mapped for `EventStore::import_external`.
    pub imported: Vec<Event>,
    /// `(local event id, assigned external id)` pairs from the export leg.
    pub exported: Vec<(String, String)>,
    pub import_ok: bool,
    pub export_ok: bool,
}

/// Sync engine over an injected [`CalendarProvider`].
pub struct SyncEngine {
    provider: Box<dyn CalendarProvider>,
    config: SyncConfig,
    ids: Box<dyn IdProvider>,
    connection: Connection,
    /// Newest first.
    log: Vec<SyncLogEntry>,
    /// Serializes sync operations per connection (no two may run
    /// concurrently; log ordering and `last_sync_at` assume one writer).
    in_flight: bool,
}

impl SyncEngine {
    pub fn new(provider: Box<dyn CalendarProvider>, config: SyncConfig) -> Self {
        Self::with_ids(provider, config, Box::new(UuidProvider))
    }

    pub fn with_ids(
        provider: Box<dyn CalendarProvider>,
        config: SyncConfig,
        ids: Box<dyn IdProvider>,
    ) -> Self {
        Self {
            provider,
            config,
            ids,
            connection: Connection::default(),
            log: Vec::new(),
            in_flight: false,
        }
    }

    // ── Queries ──────────────────────────────────────────────────────

    pub fn connection(&self) -> &Connection {
        &self.connection
    }

    pub fn is_connected(&self) -> bool {
        self.connection.is_connected
    }

    /// The operation log, newest first.
    pub fn log(&self) -> &[SyncLogEntry] {
        &self.log
    }

    // ── Connection lifecycle ─────────────────────────────────────────

    /// Authenticate and populate the calendar list. Only the primary
    /// calendar starts selected.
    pub fn connect(&mut self) -> Result<(), SyncError> {
        if self.in_flight {
            return Err(SyncError::SyncInProgress);
        }
        self.in_flight = true;
        let result = self.connect_inner();
        self.in_flight = false;
        result
    }

    fn connect_inner(&mut self) -> Result<(), SyncError> {
        let account = self.provider.authenticate()?;
        let mut calendars = self.provider.list_calendars()?;
        for calendar in &mut calendars {
            calendar.selected = calendar.primary;
        }
        self.connection = Connection {
            is_connected: true,
            account: Some(account),
            last_sync_at: None,
            sync_enabled: true,
            calendars,
        };
        Ok(())
    }

    /// Reset to the initial disconnected state. Remote events already
    /// merged into the repository are not removed.
    pub fn disconnect(&mut self) {
        self.connection = Connection::default();
    }

    /// Refresh the calendar list, preserving `selected` flags by id.
    /// An empty selection stays empty; primary pre-selection happens only
    /// in `connect`. No-op unless connected.
    pub fn fetch_calendars(&mut self) -> Result<(), SyncError> {
        if !self.connection.is_connected {
            return Ok(());
        }
        let previous: Vec<String> = self.connection.selected_calendar_ids();
        let mut calendars = self.provider.list_calendars()?;
        for calendar in &mut calendars {
            calendar.selected = previous.contains(&calendar.id);
        }
        self.connection.calendars = calendars;
        Ok(())
    }

    /// Select exactly the calendars whose id is listed. This is the
    /// authorization scope for subsequent import/export.
    pub fn select_calendars(&mut self, ids: &[String]) {
        for calendar in &mut self.connection.calendars {
            calendar.selected = ids.contains(&calendar.id);
        }
    }

    // ── Operations ───────────────────────────────────────────────────

    /// Fetch remote events in `[from, to]` from the selected calendars
    /// and map them to [`Event`]s for `EventStore::import_external`.
    /// Failures degrade to an error log entry and an empty result.
    pub fn import_events(&mut self, from: DateTime<Utc>, to: DateTime<Utc>) -> Vec<Event> {
        if self.in_flight {
            return Vec::new();
        }
        self.in_flight = true;
        let result = self.import_leg(from, to);
        self.in_flight = false;

        match result {
            Ok((events, seen)) => {
                let status = if events.len() == seen {
                    SyncLogStatus::Success
                } else {
                    SyncLogStatus::Partial
                };
                self.push_log(SyncAction::Import, status, seen, events.len(), 0);
                events
            }
            Err(_) => {
                self.push_log(SyncAction::Import, SyncLogStatus::Error, 0, 0, 0);
                Vec::new()
            }
        }
    }

    fn import_leg(
        &mut self,
        from: DateTime<Utc>,
        to: DateTime<Utc>,
    ) -> Result<(Vec<Event>, usize), SyncError> {
        if !self.connection.is_connected {
            return Err(SyncError::NotConnected);
        }
        let calendar_ids = self.connection.selected_calendar_ids();
        let payloads = self.provider.list_events(&calendar_ids, from, to)?;
        // If the caller disconnected while the request was out, the
        // response must not be applied.
        if !self.connection.is_connected {
            return Ok((Vec::new(), 0));
        }
        let seen = payloads.len();
        let events = payloads
            .iter()
            .filter_map(|p| parse_remote_event(p).ok())
            .collect();
        Ok((events, seen))
    }

    /// Push local events outward. Returns the number exported; the
    /// external-id assignments are recorded in the log and applied by
    /// `sync_bidirectional` callers via the report.
    pub fn export_events(&mut self, events: &[Event]) -> usize {
        if self.in_flight {
            return 0;
        }
        self.in_flight = true;
        let result = self.export_leg(events);
        self.in_flight = false;

        match result {
            Ok(assignments) => {
                let created = assignments
                    .iter()
                    .filter(|(id, _)| {
                        events
                            .iter()
                            .find(|e| &e.id == id)
                            .is_some_and(|e| e.external_id.is_none())
                    })
                    .count();
                let updated = assignments.len() - created;
                self.push_log(
                    SyncAction::Export,
                    SyncLogStatus::Success,
                    events.len(),
                    created,
                    updated,
                );
                assignments.len()
            }
            Err(_) => {
                self.push_log(SyncAction::Export, SyncLogStatus::Error, 0, 0, 0);
                0
            }
        }
    }

    fn export_leg(&mut self, events: &[Event]) -> Result<Vec<(String, String)>, SyncError> {
        if !self.connection.is_connected {
            return Err(SyncError::NotConnected);
        }
        let target = self.export_target()?;
        let mut assignments = Vec::new();
        for event in events {
            let payload = to_remote_event(event);
            let external_id = self.provider.upsert_event(&target, &payload)?;
            assignments.push((event.id.clone(), external_id));
        }
        Ok(assignments)
    }

    /// Import over the configured recent window, then export local
    /// events not yet carrying an external id. One aggregate log entry;
    /// `last_sync_at` is updated even when one leg fails (the entry is
    /// marked partial), but not when both do.
    pub fn sync_bidirectional(&mut self, local_events: &[Event]) -> SyncReport {
        if self.in_flight {
            return SyncReport::default();
        }
        self.in_flight = true;

        let now = Utc::now();
        let from = now - Duration::days(self.config.window_days_past);
        let to = now + Duration::days(self.config.window_days_future);

        let import = self.import_leg(from, to);
        let unsynced: Vec<Event> = local_events
            .iter()
            .filter(|e| e.origin == EventOrigin::Local && e.external_id.is_none())
            .cloned()
            .collect();
        let export = self.export_leg(&unsynced);

        self.in_flight = false;

        let mut report = SyncReport::default();
        let mut processed = 0;
        if let Ok((events, seen)) = import {
            processed += seen;
            report.imported = events;
            report.import_ok = true;
        }
        if let Ok(assignments) = export {
            processed += assignments.len();
            report.exported = assignments;
            report.export_ok = true;
        }

        let status = match (report.import_ok, report.export_ok) {
            (true, true) => SyncLogStatus::Success,
            (false, false) => SyncLogStatus::Error,
            _ => SyncLogStatus::Partial,
        };
        self.push_log(
            SyncAction::Sync,
            status,
            processed,
            report.imported.len(),
            report.exported.len(),
        );
        // A wholly failed pass did not sync anything.
        if status != SyncLogStatus::Error {
            self.connection.last_sync_at = Some(now);
        }
        report
    }

    /// Manual conflict resolution for a UI-surfaced divergence between
    /// the local and remote versions of the same external id. Plain
    /// import stays remote-wins; there is no automatic detector.
    pub fn resolve_conflict(
        &self,
        local: &Event,
        remote: &Event,
        choice: ConflictChoice,
    ) -> Event {
        match choice {
            ConflictChoice::KeepLocal => local.clone(),
            ConflictChoice::KeepRemote => Event {
                id: local.id.clone(),
                created_at: local.created_at,
                ..remote.clone()
            },
        }
    }

    // ── Internal ─────────────────────────────────────────────────────

    fn export_target(&self) -> Result<String, SyncError> {
        self.connection
            .calendars
            .iter()
            .find(|c| c.selected)
            .or_else(|| self.connection.calendars.iter().find(|c| c.primary))
            .map(|c| c.id.clone())
            .ok_or(SyncError::NotConnected)
    }

    fn push_log(
        &mut self,
        action: SyncAction,
        status: SyncLogStatus,
        processed: usize,
        created: usize,
        updated: usize,
    ) {
        self.log.insert(
            0,
            SyncLogEntry {
                id: self.ids.next_id("log"),
                action,
                status,
                events_processed: processed,
                events_created: created,
                events_updated: updated,
                timestamp: Utc::now(),
            },
        );
    }
}
