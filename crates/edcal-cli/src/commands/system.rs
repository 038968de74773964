//! System event generation commands for CLI.

use clap::Subcommand;
use edcal_core::system_events::{default_catalog, generate_for_year, resolve_template_date};

#[derive(Subcommand)]
pub enum SystemAction {
    /// Generate the system events for a year
    Generate {
        /// Target year
        year: i32,
    },
    /// List the template catalog
    Catalog,
    /// Resolve the date of a single template for a year
    Resolve {
        /// Template key
        key: String,
        /// Target year
        year: i32,
    },
}

pub fn run(action: SystemAction) -> Result<(), Box<dyn std::error::Error>> {
    let catalog = default_catalog();

    match action {
        SystemAction::Generate { year } => {
            let events = generate_for_year(&catalog, year);
            println!("{}", serde_json::to_string_pretty(&events)?);
        }
        SystemAction::Catalog => {
            println!("{}", serde_json::to_string_pretty(&catalog)?);
        }
        SystemAction::Resolve { key, year } => {
            let template = catalog
                .iter()
                .find(|t| t.key == key)
                .ok_or(format!("Unknown template key: {key}"))?;
            match resolve_template_date(&catalog, template, year) {
                Some(date) => println!("{key} {year}: {date}"),
                None => println!("{key} does not resolve for {year}"),
            }
        }
    }
    Ok(())
}
