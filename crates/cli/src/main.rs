//! Adlist CLI - session-store migration and management tools.
//!
//! # Usage
//!
//! ```bash
//! # Create the sessions table
//! adlist-cli migrate
//!
//! # Bootstrap an admin account through the backend
//! adlist-cli admin create -e admin@example.com -n "Admin Name"
//!
//! # Check a running instance
//! adlist-cli health --url https://adlist.example
//! ```
//!
//! # Commands
//!
//! - `migrate` - Create the session-store schema
//! - `admin create` - Create an admin account via the backend API
//! - `health` - Ping a running web instance

#![cfg_attr(not(test), forbid(unsafe_code))]

use clap::{Parser, Subcommand};

mod commands;

#[derive(Parser)]
#[command(name = "adlist-cli")]
#[command(author, version, about = "Adlist CLI tools")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Run session-store migrations
    Migrate,
    /// Manage admin accounts
    Admin {
        #[command(subcommand)]
        action: AdminAction,
    },
    /// Check a running web instance
    Health {
        /// Base URL of the instance
        #[arg(long, default_value = "http://127.0.0.1:3000")]
        url: String,
    },
}

#[derive(Subcommand)]
enum AdminAction {
    /// Create a new admin account
    Create {
        /// Admin email address
        #[arg(short, long)]
        email: String,

        /// Admin display name
        #[arg(short, long)]
        name: String,
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
        Commands::Migrate => commands::migrate::sessions().await?,
        Commands::Admin { action } => match action {
            AdminAction::Create { email, name } => {
                commands::admin::create_admin(&email, &name).await?;
            }
        },
        Commands::Health { url } => commands::health::check(&url).await?,
    }
    Ok(())
}
