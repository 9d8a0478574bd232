//! Motorpool CLI - Database migrations and management tools.
//!
//! # Usage
//!
//! ```bash
//! # Run database migrations
//! mp-cli migrate
//!
//! # Load the flat-file JSON data into PostgreSQL
//! mp-cli seed --data-dir crates/server/data
//! ```
//!
//! # Commands
//!
//! - `migrate` - Run database migrations
//! - `seed` - Bulk-load the three JSON collection files into `PostgreSQL`

#![cfg_attr(not(test), forbid(unsafe_code))]

use clap::{Parser, Subcommand};

mod commands;

#[derive(Parser)]
#[command(name = "mp-cli")]
#[command(author, version, about = "Motorpool CLI tools")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Run database migrations
    Migrate,
    /// Load the flat-file JSON data into the database
    Seed {
        /// Directory holding people.json, cars.json and stores.json
        #[arg(short, long, default_value = "crates/server/data")]
        data_dir: String,

        /// Delete existing registry rows before loading
        #[arg(long)]
        truncate: bool,
    },
}

#[tokio::main]
async fn main() {
    // Initialize tracing
    tracing_subscriber::fmt::init();

    let cli = Cli::parse();

    let result = match cli.command {
        Commands::Migrate => commands::migrate::run().await,
        Commands::Seed { data_dir, truncate } => commands::seed::run(&data_dir, truncate).await,
    };

    if let Err(e) = result {
        tracing::error!("command failed: {e}");
        std::process::exit(1);
    }
}
