mod config;
mod edit_cmds;
mod hotel_cmds;
mod resolve;
mod save_cmd;
mod trip_cmds;

use std::path::PathBuf;

use clap::{Parser, Subcommand};

use config::WayfareConfig;

#[derive(Parser)]
#[command(name = "wayfare", about = "Itinerary editor for trip drafts")]
struct Cli {
    /// Email attached to saved trips (overrides WAYFARE_EMAIL env var)
    #[arg(long, global = true)]
    email: Option<String>,

    /// Draft cache directory (overrides WAYFARE_CACHE_DIR env var)
    #[arg(long, global = true)]
    cache_dir: Option<String>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Write a wayfare config file
    Init {
        /// Email to attach to saved trips
        #[arg(long)]
        email: String,
        /// Overwrite existing config file
        #[arg(long)]
        force: bool,
    },
    /// Load a trip JSON document into the draft cache
    Import {
        /// Path to the trip document
        file: PathBuf,
    },
    /// Show a draft itinerary
    Show {
        /// Draft trip id
        trip_id: String,
    },
    /// Move an activity to a new slot, day, or position
    Move {
        /// Draft trip id
        trip_id: String,
        /// Source day (YYYY-MM-DD)
        from_day: String,
        /// Source slot: morning, lunch, afternoon, or evening
        from_slot: String,
        /// Source position within the slot
        from_index: usize,
        /// Target day (YYYY-MM-DD)
        to_day: String,
        /// Target slot
        to_slot: String,
        /// Target position within the slot
        to_index: usize,
    },
    /// Add an attraction to a slot
    Add {
        /// Draft trip id
        trip_id: String,
        /// Day (YYYY-MM-DD)
        day: String,
        /// Slot: morning, lunch, afternoon, or evening
        slot: String,
        /// Attraction name
        #[arg(long)]
        name: String,
        /// Attraction description
        #[arg(long)]
        details: Option<String>,
        /// Position within the slot (defaults to the end)
        #[arg(long)]
        index: Option<usize>,
    },
    /// Remove an activity from a slot
    Remove {
        /// Draft trip id
        trip_id: String,
        /// Day (YYYY-MM-DD)
        day: String,
        /// Slot: morning, lunch, afternoon, or evening
        slot: String,
        /// Position within the slot
        index: usize,
    },
    /// Remove a whole day from the itinerary
    RemoveDay {
        /// Draft trip id
        trip_id: String,
        /// Day (YYYY-MM-DD)
        day: String,
    },
    /// Hotel options
    Hotel {
        #[command(subcommand)]
        command: HotelCommands,
    },
    /// Validate the draft and reconcile it to the trip store
    Save {
        /// Draft trip id
        trip_id: String,
        /// Index of the hotel to save with (see `wayfare hotel list`)
        #[arg(long, default_value_t = 0)]
        hotel: usize,
    },
    /// Delete a draft without saving
    Discard {
        /// Draft trip id
        trip_id: String,
    },
}

#[derive(Subcommand)]
pub enum HotelCommands {
    /// List the trip's hotel options
    List {
        /// Draft trip id
        trip_id: String,
    },
    /// Select a hotel and rebind check-in/out to it
    Select {
        /// Draft trip id
        trip_id: String,
        /// Hotel index from `wayfare hotel list`
        index: usize,
    },
    /// Normalize a provider hotel payload and add it as an option
    Add {
        /// Draft trip id
        trip_id: String,
        /// Path to the raw hotel JSON payload
        file: PathBuf,
    },
}

/// Execute the `wayfare init` command: write config file.
fn cmd_init(email: &str, force: bool) -> anyhow::Result<()> {
    let path = config::config_path();

    if path.exists() && !force {
        anyhow::bail!(
            "config file already exists at {}\nUse --force to overwrite.",
            path.display()
        );
    }

    let cfg = config::ConfigFile {
        user: config::UserSection {
            email: Some(email.to_owned()),
        },
        storage: config::StorageSection::default(),
    };

    config::save_config(&cfg)?;

    println!("Config written to {}", path.display());
    println!("  user.email = {email}");
    println!();
    println!("Next: run `wayfare import <trip.json>` to start editing a draft.");

    Ok(())
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .init();

    let cli = Cli::parse();

    if let Commands::Init { email, force } = &cli.command {
        return cmd_init(email, *force);
    }

    let config = WayfareConfig::resolve(cli.email.as_deref(), cli.cache_dir.as_deref())?;

    match cli.command {
        Commands::Init { .. } => unreachable!("handled above"),
        Commands::Import { file } => trip_cmds::run_import(&config, &file)?,
        Commands::Show { trip_id } => trip_cmds::run_show(&config, &trip_id)?,
        Commands::Move {
            trip_id,
            from_day,
            from_slot,
            from_index,
            to_day,
            to_slot,
            to_index,
        } => edit_cmds::run_move(
            &config,
            &trip_id,
            &from_day,
            &from_slot,
            from_index,
            &to_day,
            &to_slot,
            to_index,
        )?,
        Commands::Add {
            trip_id,
            day,
            slot,
            name,
            details,
            index,
        } => edit_cmds::run_add(
            &config,
            &trip_id,
            &day,
            &slot,
            index,
            &name,
            details.as_deref(),
        )?,
        Commands::Remove {
            trip_id,
            day,
            slot,
            index,
        } => edit_cmds::run_remove(&config, &trip_id, &day, &slot, index)?,
        Commands::RemoveDay { trip_id, day } => {
            edit_cmds::run_remove_day(&config, &trip_id, &day)?
        }
        Commands::Hotel { command } => match command {
            HotelCommands::List { trip_id } => hotel_cmds::run_list(&config, &trip_id)?,
            HotelCommands::Select { trip_id, index } => {
                hotel_cmds::run_select(&config, &trip_id, index)?
            }
            HotelCommands::Add { trip_id, file } => {
                hotel_cmds::run_add(&config, &trip_id, &file)?
            }
        },
        Commands::Save { trip_id, hotel } => {
            save_cmd::run_save(&config, &trip_id, hotel).await?
        }
        Commands::Discard { trip_id } => trip_cmds::run_discard(&config, &trip_id)?,
    }

    Ok(())
}
