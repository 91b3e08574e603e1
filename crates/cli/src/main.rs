//! Tutorial CLI - database migrations, demo data and accounts.
//!
//! # Usage
//!
//! ```bash
//! # Run store database migrations
//! tutorial-cli migrate store
//!
//! # Run to-do database migrations
//! tutorial-cli migrate todo
//!
//! # Run all database migrations
//! tutorial-cli migrate all
//!
//! # Insert the demo catalog into an empty products table
//! tutorial-cli seed products
//!
//! # Create a to-do API account and print its token
//! tutorial-cli user create -u alice -p 'correct horse'
//! ```

#![cfg_attr(not(test), forbid(unsafe_code))]

use clap::{Parser, Subcommand};

mod commands;

#[derive(Parser)]
#[command(name = "tutorial-cli")]
#[command(author, version, about = "Tutorial apps CLI tools")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Run database migrations
    Migrate {
        #[command(subcommand)]
        target: MigrateTarget,
    },
    /// Insert demo data
    Seed {
        #[command(subcommand)]
        target: SeedTarget,
    },
    /// Manage to-do API accounts
    User {
        #[command(subcommand)]
        action: UserAction,
    },
}

#[derive(Subcommand)]
enum MigrateTarget {
    /// Run store database migrations
    Store,
    /// Run to-do database migrations
    Todo,
    /// Run all database migrations
    All,
}

#[derive(Subcommand)]
enum SeedTarget {
    /// Insert the demo catalog if the products table is empty
    Products,
}

#[derive(Subcommand)]
enum UserAction {
    /// Create an account and print its API token
    Create {
        /// Account username
        #[arg(short, long)]
        username: String,

        /// Account password (at least 8 characters)
        #[arg(short, long)]
        password: String,
    },
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

async fn run(cli: Cli) -> Result<(), Box<dyn std::error::Error>> {
    match cli.command {
        Commands::Migrate { target } => match target {
            MigrateTarget::Store => commands::migrate::store().await?,
            MigrateTarget::Todo => commands::migrate::todo().await?,
            MigrateTarget::All => {
                commands::migrate::store().await?;
                commands::migrate::todo().await?;
            }
        },
        Commands::Seed { target } => match target {
            SeedTarget::Products => commands::seed::products().await?,
        },
        Commands::User { action } => match action {
            UserAction::Create { username, password } => {
                commands::user::create(&username, &password).await?;
            }
        },
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use clap::CommandFactory;

    use super::*;

    #[test]
    fn test_cli_definition_is_valid() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_parse_user_create() {
        let cli = Cli::try_parse_from([
            "tutorial-cli",
            "user",
            "create",
            "-u",
            "alice",
            "-p",
            "secret-pass",
        ]);
        assert!(matches!(
            cli.map(|c| c.command),
            Ok(Commands::User {
                action: UserAction::Create { .. }
            })
        ));
    }
}
