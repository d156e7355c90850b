//! Jewelry orders CLI - database migrations and operator tools.
//!
//! # Usage
//!
//! ```bash
//! # Apply order store migrations
//! jo-cli migrate
//!
//! # Is this email on the admin allow-list?
//! jo-cli admin check -e owner@shop.com
//!
//! # Show the admin allow-list
//! jo-cli admin list
//!
//! # Give a user the three sample orders
//! jo-cli seed --user-id 67e55044-10b1-426f-9247-bb680e5fe0c8
//! ```

#![cfg_attr(not(test), forbid(unsafe_code))]

use clap::{Parser, Subcommand};

use jewelry_orders_core::UserId;

mod commands;

#[derive(Parser)]
#[command(name = "jo-cli")]
#[command(author, version, about = "Jewelry order service CLI tools")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Run order store migrations against `DATABASE_URL`
    Migrate,
    /// Inspect the admin allow-list (`NEXT_PUBLIC_ADMIN_EMAILS` or `ADMIN_EMAILS`)
    Admin {
        #[command(subcommand)]
        action: AdminAction,
    },
    /// Insert the sample orders for a user
    Seed {
        /// Identity provider user id
        #[arg(long)]
        user_id: UserId,

        /// Seed even if the user already has orders
        #[arg(long)]
        force: bool,
    },
}

#[derive(Subcommand)]
enum AdminAction {
    /// Report whether an email is an admin
    Check {
        /// Email address to check
        #[arg(short, long)]
        email: String,
    },
    /// List configured admin emails
    List,
}

#[tokio::main]
async fn main() {
    tracing_subscriber::fmt::init();

    let cli = Cli::parse();

    if let Err(e) = run(cli).await {
        tracing::error!("Command failed: {e}");
        std::process::exit(1);
    }
}

async fn run(cli: Cli) -> Result<(), commands::CommandError> {
    dotenvy::dotenv().ok();

    match cli.command {
        Commands::Migrate => commands::migrate::run().await?,
        Commands::Admin { action } => match action {
            AdminAction::Check { email } => commands::admin::check(&email)?,
            AdminAction::List => commands::admin::list(),
        },
        Commands::Seed { user_id, force } => commands::seed::run(user_id, force).await?,
    }
    Ok(())
}
