//! Event management commands for CLI.

use clap::Subcommand;
use edcal_core::{EventDraft, EventFilter, EventPatch, Tag};
use uuid::Uuid;

use crate::session;

use super::{month_range, parse_priority, parse_status, parse_when};

#[derive(Subcommand)]
pub enum EventAction {
    /// Create a new event
    Create {
        /// Event title
        title: String,
        /// Start (RFC 3339 or YYYY-MM-DD)
        start: String,
        /// End (defaults to start)
        #[arg(long)]
        end: Option<String>,
        /// Event description
        #[arg(long)]
        description: Option<String>,
        /// All-day event
        #[arg(long)]
        all_day: bool,
        /// Workflow status (default: pending)
        #[arg(long)]
        status: Option<String>,
        /// Priority (default: medium)
        #[arg(long)]
        priority: Option<String>,
        /// Comma-separated tag names
        #[arg(long)]
        tags: Option<String>,
        /// Comma-separated marketplaces
        #[arg(long)]
        marketplaces: Option<String>,
    },
    /// List events
    List {
        /// Only events on this day (YYYY-MM-DD)
        #[arg(long)]
        day: Option<String>,
        /// Only events in this month (YYYY-MM)
        #[arg(long)]
        month: Option<String>,
        /// Filter by status
        #[arg(long)]
        status: Option<String>,
        /// Free-text filter over titles, descriptions, and tag names
        #[arg(long)]
        text: Option<String>,
        /// Hide generated system events
        #[arg(long)]
        no_system: bool,
        /// Hide book-task events
        #[arg(long)]
        no_book: bool,
    },
    /// Get event details
    Get {
        /// Event ID
        id: String,
    },
    /// Update an event
    Update {
        /// Event ID
        id: String,
        /// New title
        #[arg(long)]
        title: Option<String>,
        /// New description
        #[arg(long)]
        description: Option<String>,
        /// New start
        #[arg(long)]
        start: Option<String>,
        /// New end
        #[arg(long)]
        end: Option<String>,
        /// New status
        #[arg(long)]
        status: Option<String>,
        /// New priority
        #[arg(long)]
        priority: Option<String>,
    },
    /// Delete an event
    Delete {
        /// Event ID
        id: String,
    },
    /// Move an event to a new start, preserving its duration
    Move {
        /// Event ID
        id: String,
        /// New start (RFC 3339 or YYYY-MM-DD)
        start: String,
    },
    /// Duplicate an event as a fresh local copy
    Duplicate {
        /// Event ID
        id: String,
    },
}

fn split_csv(value: Option<String>) -> Vec<String> {
    value
        .map(|v| v.split(',').map(|s| s.trim().to_string()).collect())
        .unwrap_or_default()
}

pub fn run(action: EventAction) -> Result<(), Box<dyn std::error::Error>> {
    let mut store = session::load()?;

    match action {
        EventAction::Create {
            title,
            start,
            end,
            description,
            all_day,
            status,
            priority,
            tags,
            marketplaces,
        } => {
            let draft = EventDraft {
                title,
                description,
                start_at: Some(parse_when(&start)?),
                end_at: end.as_deref().map(parse_when).transpose()?,
                all_day,
                status: status.as_deref().map(parse_status).transpose()?,
                priority: priority.as_deref().map(parse_priority).transpose()?,
                tags: split_csv(tags)
                    .into_iter()
                    .map(|name| Tag {
                        id: Uuid::new_v4().to_string(),
                        name,
                        color: None,
                    })
                    .collect(),
                marketplaces: split_csv(marketplaces),
                ..EventDraft::default()
            };
            let (event, warning) = store.create(draft)?;
            if let Some(w) = warning {
                eprintln!("warning: end was before start, clamped to {}", w.clamped_to);
            }
            session::save(&store)?;
            println!("Event created: {}", event.id);
            println!("{}", serde_json::to_string_pretty(&event)?);
        }
        EventAction::List {
            day,
            month,
            status,
            text,
            no_system,
            no_book,
        } => {
            let mut filter = EventFilter::default();
            filter.text = text;
            filter.show_system = !no_system;
            filter.show_book_tasks = !no_book;
            if let Some(s) = status {
                filter.statuses = vec![parse_status(&s)?];
            }
            if let Some(d) = day {
                let start = parse_when(&d)?;
                filter.range = Some((start, start + chrono::Duration::days(1)));
            } else if let Some(m) = month {
                filter.range = Some(month_range(&m)?);
            }
            println!("{}", serde_json::to_string_pretty(&store.filtered(&filter))?);
        }
        EventAction::Get { id } => match store.find(&id) {
            Some(event) => println!("{}", serde_json::to_string_pretty(event)?),
            None => println!("Event not found: {id}"),
        },
        EventAction::Update {
            id,
            title,
            description,
            start,
            end,
            status,
            priority,
        } => {
            if store.find(&id).is_none() {
                return Err(format!("Event not found: {id}").into());
            }
            let patch = EventPatch {
                title,
                description: description.map(Some),
                start_at: start.as_deref().map(parse_when).transpose()?,
                end_at: end.as_deref().map(parse_when).transpose()?,
                status: status.as_deref().map(parse_status).transpose()?,
                priority: priority.as_deref().map(parse_priority).transpose()?,
                ..EventPatch::default()
            };
            if let Some(w) = store.update(&id, patch) {
                eprintln!("warning: end was before start, clamped to {}", w.clamped_to);
            }
            session::save(&store)?;
            match store.find(&id) {
                Some(event) => {
                    println!("Event updated:");
                    println!("{}", serde_json::to_string_pretty(event)?);
                }
                None => println!("Event not updated (read-only origin): {id}"),
            }
        }
        EventAction::Delete { id } => {
            store.delete(&id);
            session::save(&store)?;
            println!("Event deleted: {id}");
        }
        EventAction::Move { id, start } => {
            store.move_event(&id, parse_when(&start)?);
            session::save(&store)?;
            match store.find(&id) {
                Some(event) => println!("{}", serde_json::to_string_pretty(event)?),
                None => println!("Event not found: {id}"),
            }
        }
        EventAction::Duplicate { id } => match store.duplicate(&id) {
            Some(copy) => {
                session::save(&store)?;
                println!("Event duplicated: {}", copy.id);
                println!("{}", serde_json::to_string_pretty(&copy)?);
            }
            None => println!("Event not found: {id}"),
        },
    }
    Ok(())
}
