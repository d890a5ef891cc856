//! CanineRacks CLI - Database migrations and management tools.
//!
//! # Usage
//!
//! ```bash
//! # Run database migrations
//! cr-cli migrate run
//!
//! # Create an inventory manager account
//! cr-cli manager create -e manager@example.com -p 's3cure-pass'
//! ```
//!
//! # Commands
//!
//! - `migrate run` - Run database migrations
//! - `manager create` - Create inventory manager accounts

#![cfg_attr(not(test), forbid(unsafe_code))]

use clap::{Parser, Subcommand};

mod commands;

#[derive(Parser)]
#[command(name = "cr-cli")]
#[command(author, version, about = "CanineRacks CLI tools")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Run database migrations
    Migrate {
        #[command(subcommand)]
        action: MigrateAction,
    },
    /// Manage inventory manager accounts
    Manager {
        #[command(subcommand)]
        action: ManagerAction,
    },
}

#[derive(Subcommand)]
enum MigrateAction {
    /// Apply pending migrations
    Run,
}

#[derive(Subcommand)]
enum ManagerAction {
    /// Create a new inventory manager account
    Create {
        /// Manager email address
        #[arg(short, long)]
        email: String,

        /// Initial password
        #[arg(short, long)]
        password: String,
    },
}

#[tokio::main]
async fn main() {
    // Initialize tracing
    tracing_subscriber::fmt::init();

    let cli = Cli::parse();

    let result: Result<(), Box<dyn std::error::Error>> = run(cli).await;

    if let Err(e) = result {
        tracing::error!("Command failed: {e}");
        std::process::exit(1);
    }
}

async fn run(cli: Cli) -> Result<(), Box<dyn std::error::Error>> {
    match cli.command {
        Commands::Migrate { action } => match action {
            MigrateAction::Run => commands::migrate::run().await?,
        },
        Commands::Manager { action } => match action {
            ManagerAction::Create { email, password } => {
                commands::manager::create(&email, &password).await?;
            }
        },
    }
    Ok(())
}
