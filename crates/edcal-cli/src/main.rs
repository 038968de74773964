use clap::{Parser, Subcommand};

mod commands;
mod session;

#[derive(Parser)]
#[command(name = "edcal-cli", version, about = "Edcal editorial calendar CLI")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Event management
    Event {
        #[command(subcommand)]
        action: commands::event::EventAction,
    },
    /// System event generation
    System {
        #[command(subcommand)]
        action: commands::system::SystemAction,
    },
    /// Book task overlay
    Book {
        #[command(subcommand)]
        action: commands::book::BookAction,
    },
    /// External calendar sync
    Sync {
        #[command(subcommand)]
        action: commands::sync::SyncAction,
    },
    /// Reminder scanning
    Remind {
        #[command(subcommand)]
        action: commands::remind::RemindAction,
    },
}

fn main() {
    let cli = Cli::parse();
    let result = match cli.command {
        Commands::Event { action } => commands::event::run(action),
        Commands::System { action } => commands::system::run(action),
        Commands::Book { action } => commands::book::run(action),
        Commands::Sync { action } => commands::sync::run(action),
        Commands::Remind { action } => commands::remind::run(action),
    };

    if let Err(e) = result {
        eprintln!("error: {e}");
        std::process::exit(1);
    }
}
