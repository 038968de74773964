//! Book task overlay commands for CLI.

use std::fs;

use clap::Subcommand;
use edcal_core::{events_from_book_tasks, BookTask};

#[derive(Subcommand)]
pub enum BookAction {
    /// Map a JSON file of book tasks to calendar events
    Preview {
        /// Path to a JSON array of book tasks
        file: String,
    },
    /// Print an example book task for authoring task files
    Example,
}

pub fn run(action: BookAction) -> Result<(), Box<dyn std::error::Error>> {
    match action {
        BookAction::Preview { file } => {
            let tasks: Vec<BookTask> = serde_json::from_str(&fs::read_to_string(&file)?)?;
            let events = events_from_book_tasks(&tasks);
            println!("{}", serde_json::to_string_pretty(&events)?);
        }
        BookAction::Example => {
            let example = serde_json::json!([{
                "id": "t-1",
                "book_id": "book-1",
                "book_title": "Saltwater Hearts",
                "title": "Proof pass",
                "stage": "editing",
                "due_at": "2026-09-15T00:00:00Z",
                "marketplaces": ["amazon"]
            }]);
            println!("{}", serde_json::to_string_pretty(&example)?);
        }
    }
    Ok(())
}
