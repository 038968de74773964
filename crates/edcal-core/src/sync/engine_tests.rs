//! Sync engine tests against the in-process provider.

use chrono::{TimeZone, Utc};

use crate::config::SyncConfig;
use crate::event::store::EventStore;
use crate::event::{EventDraft, EventOrigin};
use crate::id::SequentialIdProvider;
use crate::sync::engine::SyncEngine;
use crate::sync::mock_provider::MockCalendarProvider;
use crate::sync::types::{ConflictChoice, SyncAction, SyncLogStatus};

fn engine_with(provider: MockCalendarProvider) -> SyncEngine {
    SyncEngine::with_ids(
        Box::new(provider),
        SyncConfig::default(),
        Box::new(SequentialIdProvider::new()),
    )
}

fn june() -> (chrono::DateTime<Utc>, chrono::DateTime<Utc>) {
    (
        Utc.with_ymd_and_hms(2024, 6, 1, 0, 0, 0).unwrap(),
        Utc.with_ymd_and_hms(2024, 6, 30, 23, 59, 59).unwrap(),
    )
}

#[test]
fn connect_populates_calendars_primary_selected() {
    let mut engine = engine_with(MockCalendarProvider::seeded());
    engine.connect().unwrap();

    let conn = engine.connection();
    assert!(conn.is_connected);
    assert_eq!(conn.account.as_deref(), Some("ops@press.example"));
    assert_eq!(conn.calendars.len(), 2);
    assert_eq!(conn.selected_calendar_ids(), vec!["work".to_string()]);
}

#[test]
fn connect_surfaces_auth_rejection() {
    let mut provider = MockCalendarProvider::seeded();
    provider.fail_auth = true;
    let mut engine = engine_with(provider);

    assert!(engine.connect().is_err());
    assert!(!engine.is_connected());
}

#[test]
fn disconnect_resets_to_initial_state() {
    let mut engine = engine_with(MockCalendarProvider::seeded());
    engine.connect().unwrap();
    engine.disconnect();

    let conn = engine.connection();
    assert!(!conn.is_connected);
    assert!(conn.account.is_none());
    assert!(conn.calendars.is_empty());
}

#[test]
fn fetch_calendars_preserves_selection() {
    let mut engine = engine_with(MockCalendarProvider::seeded());
    engine.connect().unwrap();
    engine.select_calendars(&["promo".to_string()]);

    engine.fetch_calendars().unwrap();
    assert_eq!(engine.connection().selected_calendar_ids(), vec!["promo".to_string()]);
}

#[test]
fn fetch_calendars_keeps_an_empty_selection_empty() {
    let mut engine = engine_with(MockCalendarProvider::seeded());
    engine.connect().unwrap();
    engine.select_calendars(&[]);

    // A refresh must not silently widen the authorization scope back to
    // the primary calendar.
    engine.fetch_calendars().unwrap();
    assert!(engine.connection().selected_calendar_ids().is_empty());
}

#[test]
fn fetch_calendars_is_noop_when_disconnected() {
    let mut engine = engine_with(MockCalendarProvider::seeded());
    engine.fetch_calendars().unwrap();
    assert!(engine.connection().calendars.is_empty());
}

#[test]
fn import_maps_selected_calendars_and_logs_counts() {
    let mut engine = engine_with(MockCalendarProvider::seeded());
    engine.connect().unwrap();
    let (from, to) = june();

    // Only the primary "work" calendar is selected.
    let imported = engine.import_events(from, to);
    assert_eq!(imported.len(), 1);
    assert_eq!(imported[0].external_id.as_deref(), Some("remote-standup"));
    assert_eq!(imported[0].origin, EventOrigin::ExternalSync);

    let entry = &engine.log()[0];
    assert_eq!(entry.action, SyncAction::Import);
    assert_eq!(entry.status, SyncLogStatus::Success);
    assert_eq!(entry.events_processed, 1);

    // Widen the scope and both calendars contribute.
    engine.select_calendars(&["work".to_string(), "promo".to_string()]);
    let imported = engine.import_events(from, to);
    assert_eq!(imported.len(), 2);
}

#[test]
fn import_failure_logs_error_and_returns_empty() {
    let mut provider = MockCalendarProvider::seeded();
    provider.fail_list_events = true;
    let mut engine = engine_with(provider);
    engine.connect().unwrap();
    let (from, to) = june();

    let imported = engine.import_events(from, to);
    assert!(imported.is_empty());

    let entry = &engine.log()[0];
    assert_eq!(entry.status, SyncLogStatus::Error);
    assert_eq!(entry.events_processed, 0);
}

#[test]
fn import_does_not_touch_the_store() {
    let mut provider = MockCalendarProvider::seeded();
    provider.fail_list_events = true;
    let mut engine = engine_with(provider);
    engine.connect().unwrap();
    let (from, to) = june();

    let mut store = EventStore::new(Box::new(SequentialIdProvider::new()));
    store
        .create(EventDraft {
            title: "Local plan".into(),
            start_at: Some(from),
            ..Default::default()
        })
        .unwrap();
    let before = store.all();

    let imported = engine.import_events(from, to);
    store.import_external(imported);
    assert_eq!(store.all(), before);
}

#[test]
fn export_assigns_external_ids_and_counts_updates() {
    let mut engine = engine_with(MockCalendarProvider::seeded());
    engine.connect().unwrap();

    let mut store = EventStore::new(Box::new(SequentialIdProvider::new()));
    let (event, _) = store
        .create(EventDraft {
            title: "Launch plan".into(),
            start_at: Some(Utc.with_ymd_and_hms(2024, 6, 10, 9, 0, 0).unwrap()),
            ..Default::default()
        })
        .unwrap();

    let count = engine.export_events(&[event.clone()]);
    assert_eq!(count, 1);

    let entry = &engine.log()[0];
    assert_eq!(entry.action, SyncAction::Export);
    assert_eq!(entry.events_created, 1);
    assert_eq!(entry.events_updated, 0);

    // Second export of the same event, now carrying an external id, is
    // an update rather than a duplicate create.
    let mut synced = event;
    synced.external_id = Some("ext-1".into());
    let count = engine.export_events(&[synced]);
    assert_eq!(count, 1);
    let entry = &engine.log()[0];
    assert_eq!(entry.events_created, 0);
    assert_eq!(entry.events_updated, 1);
}

#[test]
fn export_failure_logs_error_and_returns_zero() {
    let mut provider = MockCalendarProvider::seeded();
    provider.fail_upsert = true;
    let mut engine = engine_with(provider);
    engine.connect().unwrap();

    let mut store = EventStore::new(Box::new(SequentialIdProvider::new()));
    let (event, _) = store
        .create(EventDraft {
            title: "Unlucky".into(),
            start_at: Some(Utc::now()),
            ..Default::default()
        })
        .unwrap();

    assert_eq!(engine.export_events(&[event]), 0);
    assert_eq!(engine.log()[0].status, SyncLogStatus::Error);
}

#[test]
fn bidirectional_round_trip_updates_store_and_last_sync() {
    let mut provider = MockCalendarProvider::seeded();
    // Seed a remote event inside the default sync window.
    let soon = Utc::now() + chrono::Duration::days(2);
    provider.seed_event(
        "work",
        serde_json::json!({
            "id": "remote-window",
            "summary": "Cover proof due",
            "start": { "dateTime": soon.to_rfc3339() },
            "end": { "dateTime": (soon + chrono::Duration::hours(1)).to_rfc3339() },
        }),
    );
    let mut engine = engine_with(provider);
    engine.connect().unwrap();

    let mut store = EventStore::new(Box::new(SequentialIdProvider::new()));
    let (local, _) = store
        .create(EventDraft {
            title: "ARC mailing".into(),
            start_at: Some(Utc::now() + chrono::Duration::days(3)),
            ..Default::default()
        })
        .unwrap();

    let report = engine.sync_bidirectional(store.stored_events());
    assert!(report.import_ok && report.export_ok);
    assert_eq!(report.exported.len(), 1);
    assert_eq!(report.exported[0].0, local.id);

    // Apply the report the way a composition root would.
    store.import_external(report.imported);
    for (event_id, external_id) in report.exported {
        store.assign_external_id(&event_id, external_id);
    }

    assert!(store.find(&local.id).unwrap().external_id.is_some());
    assert!(store
        .stored_events()
        .iter()
        .any(|e| e.external_id.as_deref() == Some("remote-window")));

    assert!(engine.connection().last_sync_at.is_some());
    assert_eq!(engine.log()[0].action, SyncAction::Sync);
    assert_eq!(engine.log()[0].status, SyncLogStatus::Success);

    // A second pass finds nothing new to export.
    let report = engine.sync_bidirectional(store.stored_events());
    assert!(report.exported.is_empty());
}

#[test]
fn bidirectional_marks_partial_when_one_leg_fails() {
    let mut provider = MockCalendarProvider::seeded();
    provider.fail_upsert = true;
    let mut engine = engine_with(provider);
    engine.connect().unwrap();

    let mut store = EventStore::new(Box::new(SequentialIdProvider::new()));
    store
        .create(EventDraft {
            title: "Will not export".into(),
            start_at: Some(Utc::now()),
            ..Default::default()
        })
        .unwrap();

    let report = engine.sync_bidirectional(store.stored_events());
    assert!(report.import_ok);
    assert!(!report.export_ok);

    assert_eq!(engine.log()[0].status, SyncLogStatus::Partial);
    // last_sync_at updates regardless of the partial failure.
    assert!(engine.connection().last_sync_at.is_some());
}

#[test]
fn bidirectional_total_failure_leaves_last_sync_unset() {
    let mut provider = MockCalendarProvider::seeded();
    provider.fail_list_events = true;
    provider.fail_upsert = true;
    let mut engine = engine_with(provider);
    engine.connect().unwrap();

    let mut store = EventStore::new(Box::new(SequentialIdProvider::new()));
    store
        .create(EventDraft {
            title: "Doomed".into(),
            start_at: Some(Utc::now()),
            ..Default::default()
        })
        .unwrap();

    let report = engine.sync_bidirectional(store.stored_events());
    assert!(!report.import_ok && !report.export_ok);
    assert_eq!(engine.log()[0].status, SyncLogStatus::Error);
    assert!(engine.connection().last_sync_at.is_none());
}

#[test]
fn log_is_newest_first() {
    let mut engine = engine_with(MockCalendarProvider::seeded());
    engine.connect().unwrap();
    let (from, to) = june();

    engine.import_events(from, to);
    engine.export_events(&[]);

    assert_eq!(engine.log().len(), 2);
    assert_eq!(engine.log()[0].action, SyncAction::Export);
    assert_eq!(engine.log()[1].action, SyncAction::Import);
    assert!(engine.log()[0].timestamp >= engine.log()[1].timestamp);
}

#[test]
fn resolve_conflict_keeps_the_chosen_side() {
    let engine = engine_with(MockCalendarProvider::seeded());

    let mut store = EventStore::new(Box::new(SequentialIdProvider::new()));
    let (mut local, _) = store
        .create(EventDraft {
            title: "Local title".into(),
            start_at: Some(Utc::now()),
            ..Default::default()
        })
        .unwrap();
    local.external_id = Some("g-9".into());

    let mut remote = local.clone();
    remote.id = String::new();
    remote.title = "Remote title".into();

    let kept = engine.resolve_conflict(&local, &remote, ConflictChoice::KeepLocal);
    assert_eq!(kept.title, "Local title");

    let kept = engine.resolve_conflict(&local, &remote, ConflictChoice::KeepRemote);
    assert_eq!(kept.title, "Remote title");
    // Local identity survives either way.
    assert_eq!(kept.id, local.id);
    assert_eq!(kept.created_at, local.created_at);
}
