//! Reminder commands for CLI.

use std::sync::{Arc, Mutex};

use chrono::{Duration, Utc};
use clap::Subcommand;
use edcal_core::{Config, ReminderScheduler};
use tokio::sync::mpsc;

use crate::session;

use super::parse_when;

#[derive(Subcommand)]
pub enum RemindAction {
    /// Scan once for reminders due right now
    Due {
        /// Scan as-of this instant instead of the wall clock
        #[arg(long)]
        at: Option<String>,
    },
    /// List reminders due within a look-ahead window
    Upcoming {
        /// Look-ahead in hours (default: 24)
        #[arg(long, default_value = "24")]
        hours: i64,
    },
    /// Poll continuously and print reminders as they come due
    Watch,
}

pub fn run(action: RemindAction) -> Result<(), Box<dyn std::error::Error>> {
    let config = Config::default();
    let store = session::load()?;

    match action {
        RemindAction::Due { at } => {
            let mut scheduler = ReminderScheduler::new(&config.reminders);
            let events = store.all();
            let fired = match at {
                Some(at) => scheduler.scan_at(&events, parse_when(&at)?),
                None => scheduler.scan(&events),
            };
            println!("{}", serde_json::to_string_pretty(&fired)?);
        }
        RemindAction::Upcoming { hours } => {
            let scheduler = ReminderScheduler::new(&config.reminders);
            let upcoming = scheduler.upcoming_at(&store.all(), Utc::now(), Duration::hours(hours));
            println!("{}", serde_json::to_string_pretty(&upcoming)?);
        }
        RemindAction::Watch => {
            let runtime = tokio::runtime::Runtime::new()?;
            runtime.block_on(async {
                let scheduler = ReminderScheduler::new(&config.reminders);
                let interval = std::time::Duration::from_secs(config.reminders.poll_interval_secs);
                let (tx, mut rx) = mpsc::channel(16);
                let shared = Arc::new(Mutex::new(store));

                tokio::spawn(scheduler.run(shared, interval, tx));
                println!("Watching for reminders (Ctrl-C to stop)...");
                while let Some(notification) = rx.recv().await {
                    println!(
                        "[{}] {} ({})",
                        notification.trigger_at, notification.event_title, notification.event_id
                    );
                }
            });
        }
    }
    Ok(())
}
