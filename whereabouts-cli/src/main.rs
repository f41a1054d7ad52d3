mod client;
mod commands;
mod dispatch;
mod notifier;
mod render;
mod schedule;
mod status;
mod stream;
mod surface;
mod terminal;
mod utils;

use anyhow::Result;
use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;
use whereabouts_core::EntryId;
use whereabouts_core::config::BoardConfig;

use crate::commands::new::NewEntryArgs;
use crate::commands::notify::NotifyAction;
use crate::commands::status::StatusArg;

#[derive(Parser)]
#[command(name = "whereabouts")]
#[command(about = "Shared schedule board and live presence status, from the terminal")]
struct Cli {
    /// Board server URL (overrides the config file)
    #[arg(long, global = true)]
    server: Option<String>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// List entries, with overlapping ones marked
    Entries,
    /// Add an entry
    New {
        location: Option<String>,

        /// Where the information came from
        #[arg(long)]
        source: Option<String>,

        /// Start time (e.g., "2025-03-20T15:00", "tomorrow 3pm")
        #[arg(short, long)]
        start: Option<String>,

        /// End time
        #[arg(short, long, conflicts_with = "duration")]
        end: Option<String>,

        /// Length (e.g., "30m", "2h")
        #[arg(short, long)]
        duration: Option<String>,

        /// Use a configured location preset
        #[arg(short, long, conflicts_with = "location")]
        preset: Option<String>,
    },
    /// Reschedule an entry
    Move {
        id: EntryId,

        #[arg(short, long)]
        start: String,

        #[arg(short, long, conflicts_with = "duration")]
        end: Option<String>,

        #[arg(short, long)]
        duration: Option<String>,
    },
    /// Delete an entry
    Delete { id: EntryId },
    /// Show the current presence status
    Status,
    /// Set the presence status
    Set {
        #[arg(value_enum)]
        status: StatusArg,
    },
    /// Show the board and follow status changes live
    Watch,
    /// Desktop notification setup
    Notify {
        #[arg(value_enum)]
        action: Option<NotifyAction>,
    },
    /// Show config and state paths
    Config,
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("whereabouts=info")),
        )
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();

    let cli = Cli::parse();
    let config = load_config(cli.server)?;

    match cli.command {
        Commands::Entries => commands::entries::run(&config).await,
        Commands::New {
            location,
            source,
            start,
            end,
            duration,
            preset,
        } => {
            let args = NewEntryArgs {
                location,
                source,
                start,
                end,
                duration,
                preset,
            };
            commands::new::run(&config, args).await
        }
        Commands::Move {
            id,
            start,
            end,
            duration,
        } => commands::move_entry::run(&config, id, start, end, duration).await,
        Commands::Delete { id } => commands::delete::run(&config, id).await,
        Commands::Status => commands::status::show(&config).await,
        Commands::Set { status } => commands::status::set(&config, status).await,
        Commands::Watch => commands::watch::run(&config).await,
        Commands::Notify { action } => commands::notify::run(&config, action).await,
        Commands::Config => commands::config::run(&config),
    }
}

fn load_config(server: Option<String>) -> Result<BoardConfig> {
    let mut config = BoardConfig::load()?;

    if let Some(server) = server {
        config.server_url = server;
        config.validate()?;
    }

    Ok(config)
}
