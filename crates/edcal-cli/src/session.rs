//! JSON-backed session store for CLI invocations.
//!
//! Each command loads the stored events, runs one operation against an
//! in-memory `EventStore`, and writes the surviving events back. Only
//! user and external events are persisted; system and book-task overlays
//! are rederived on load.

use std::error::Error;
use std::fs;
use std::path::{Path, PathBuf};

use chrono::{Datelike, Utc};
use edcal_core::{
    default_catalog, events_from_book_tasks, generate_window, BookTask, BookTaskSource, Event,
    EventStore, StaticBookTaskSource, UuidProvider,
};

fn default_path() -> Result<PathBuf, Box<dyn Error>> {
    let base = dirs::data_local_dir().ok_or("Could not determine data directory")?;
    Ok(base.join("edcal").join("session.json"))
}

/// Load the session store, rebuilding the system-event and book-task
/// overlays for a three-year window around the current year. A
/// `book_tasks.json` next to the session file feeds the book overlay.
pub fn load() -> Result<EventStore, Box<dyn Error>> {
    load_from(default_path()?)
}

pub fn load_from(path: PathBuf) -> Result<EventStore, Box<dyn Error>> {
    let events: Vec<Event> = if path.exists() {
        serde_json::from_str(&fs::read_to_string(&path)?)?
    } else {
        Vec::new()
    };

    let mut store = EventStore::with_events(Box::new(UuidProvider), events);
    let year = Utc::now().year();
    store.set_system_events(generate_window(&default_catalog(), year - 1, year + 1));

    let source = book_task_source(&path)?;
    store.set_book_task_events(events_from_book_tasks(&source.tasks()));
    Ok(store)
}

fn book_task_source(session_path: &Path) -> Result<StaticBookTaskSource, Box<dyn Error>> {
    let tasks_path = session_path.with_file_name("book_tasks.json");
    let tasks: Vec<BookTask> = if tasks_path.exists() {
        serde_json::from_str(&fs::read_to_string(&tasks_path)?)?
    } else {
        Vec::new()
    };
    Ok(StaticBookTaskSource::new(tasks))
}

/// Persist the store's user and external events.
pub fn save(store: &EventStore) -> Result<(), Box<dyn Error>> {
    save_to(store, default_path()?)
}

pub fn save_to(store: &EventStore, path: PathBuf) -> Result<(), Box<dyn Error>> {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)?;
    }
    fs::write(&path, serde_json::to_string_pretty(store.stored_events())?)?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use edcal_core::EventDraft;

    #[test]
    fn roundtrip_preserves_stored_events() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("session.json");

        let mut store = load_from(path.clone()).unwrap();
        let draft = EventDraft {
            title: "Cover reveal".into(),
            start_at: Some(Utc::now()),
            ..EventDraft::default()
        };
        let (event, _) = store.create(draft).unwrap();
        save_to(&store, path.clone()).unwrap();

        let reloaded = load_from(path).unwrap();
        assert!(reloaded.find(&event.id).is_some());
    }

    #[test]
    fn book_task_file_feeds_the_overlay() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("session.json");
        std::fs::write(
            dir.path().join("book_tasks.json"),
            r#"[{
                "id": "t-1",
                "book_id": "book-1",
                "book_title": "Saltwater Hearts",
                "title": "Proof pass",
                "stage": "editing",
                "due_at": "2026-09-15T00:00:00Z",
                "marketplaces": []
            }]"#,
        )
        .unwrap();

        let store = load_from(path).unwrap();
        assert!(store.find("book-task-t-1").is_some());
    }

    #[test]
    fn missing_file_loads_empty_store_with_overlays() {
        let dir = tempfile::tempdir().unwrap();
        let store = load_from(dir.path().join("absent.json")).unwrap();
        assert!(store.stored_events().is_empty());
        // Overlays still present.
        assert!(!store.all().is_empty());
    }
}
