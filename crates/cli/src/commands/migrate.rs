//! Database migration commands.
//!
//! # Usage
//!
//! ```bash
//! tutorial-cli migrate store
//! tutorial-cli migrate todo
//! tutorial-cli migrate all
//! ```
//!
//! # Environment Variables
//!
//! - `STORE_DATABASE_URL` - `PostgreSQL` connection string for the store
//! - `TODO_DATABASE_URL` - `PostgreSQL` connection string for the to-do API
//! - `DATABASE_URL` - Fallback for either
//!
//! # Migration Files
//!
//! Store migrations: `crates/store/migrations/`
//! To-do migrations: `crates/todo/migrations/`
//!
//! Both sets may target the same database, so each run ignores versions
//! applied by the other set. Session tables are created by the store itself
//! on startup.

use sqlx::migrate::Migrator;

use super::{MissingDatabaseUrl, database_url};

/// Errors that can occur while migrating.
#[derive(Debug, thiserror::Error)]
pub enum MigrationError {
    #[error(transparent)]
    MissingEnvVar(#[from] MissingDatabaseUrl),

    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    #[error("Migration error: {0}")]
    Migration(#[from] sqlx::migrate::MigrateError),
}

/// Run store database migrations.
///
/// # Errors
///
/// Returns `MigrationError` if the database URL is missing, the database is
/// unreachable, or a migration fails.
pub async fn store() -> Result<(), MigrationError> {
    run("store", "STORE_DATABASE_URL", sqlx::migrate!("../store/migrations")).await
}

/// Run to-do database migrations.
///
/// # Errors
///
/// Returns `MigrationError` if the database URL is missing, the database is
/// unreachable, or a migration fails.
pub async fn todo() -> Result<(), MigrationError> {
    run("todo", "TODO_DATABASE_URL", sqlx::migrate!("../todo/migrations")).await
}

async fn run(
    name: &str,
    env_var: &'static str,
    mut migrator: Migrator,
) -> Result<(), MigrationError> {
    let url = database_url(env_var)?;

    tracing::info!("Connecting to {name} database...");
    let pool = tutorial_store::db::create_pool(&url).await?;

    tracing::info!(count = migrator.iter().count(), "Running {name} migrations...");
    migrator.set_ignore_missing(true).run(&pool).await?;

    tracing::info!("{name} migrations complete!");
    Ok(())
}
