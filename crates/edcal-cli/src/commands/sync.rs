//! External calendar sync commands for CLI.
//!
//! The CLI wires the engine to the built-in mock provider; a desktop
//! shell would substitute a real provider at the same seam.

use chrono::{Duration, Utc};
use clap::Subcommand;
use edcal_core::{Config, MockCalendarProvider, SyncEngine};

use crate::session;

use super::parse_when;

#[derive(Subcommand)]
pub enum SyncAction {
    /// Show connection state and calendars after connecting
    Status,
    /// Import remote events into the session store
    Import {
        /// Window start (RFC 3339 or YYYY-MM-DD; default: 7 days back)
        #[arg(long)]
        from: Option<String>,
        /// Window end (default: 30 days ahead)
        #[arg(long)]
        to: Option<String>,
    },
    /// Export unsynced local events to the remote calendar
    Export,
    /// Run a full bidirectional pass
    Run,
}

fn engine() -> SyncEngine {
    SyncEngine::new(
        Box::new(MockCalendarProvider::seeded()),
        Config::default().sync,
    )
}

pub fn run(action: SyncAction) -> Result<(), Box<dyn std::error::Error>> {
    let mut engine = engine();

    match action {
        SyncAction::Status => {
            engine.connect()?;
            println!("{}", serde_json::to_string_pretty(engine.connection())?);
        }
        SyncAction::Import { from, to } => {
            engine.connect()?;
            let now = Utc::now();
            let from = match from {
                Some(f) => parse_when(&f)?,
                None => now - Duration::days(7),
            };
            let to = match to {
                Some(t) => parse_when(&t)?,
                None => now + Duration::days(30),
            };

            let mut store = session::load()?;
            let imported = engine.import_events(from, to);
            let count = imported.len();
            store.import_external(imported);
            session::save(&store)?;

            println!("Imported {count} events");
            println!("{}", serde_json::to_string_pretty(engine.log())?);
        }
        SyncAction::Export => {
            engine.connect()?;
            let store = session::load()?;
            let exported = engine.export_events(&store.unsynced_local());
            // Push-only preview; `sync run` is the pass that records the
            // assigned external ids on the local events.
            println!("Exported {exported} events");
            println!("{}", serde_json::to_string_pretty(engine.log())?);
        }
        SyncAction::Run => {
            engine.connect()?;
            let mut store = session::load()?;
            let report = engine.sync_bidirectional(&store.unsynced_local());

            let imported = report.imported.len();
            let exported = report.exported.len();
            store.import_external(report.imported);
            for (local_id, external_id) in report.exported {
                store.assign_external_id(&local_id, external_id);
            }
            session::save(&store)?;

            println!("Sync complete: {imported} imported, {exported} exported");
            println!("{}", serde_json::to_string_pretty(engine.log())?);
        }
    }
    Ok(())
}
