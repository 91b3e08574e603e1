//! Database operations for the to-do API.
//!
//! # Tables
//!
//! - `users` - Accounts with argon2 password hashes
//! - `auth_tokens` - One API token per user
//! - `todos` - To-do items, owned by a user
//!
//! Without a configured database the API uses the in-memory repositories.
//!
//! # Migrations
//!
//! Migrations are stored in `crates/todo/migrations/` and run via:
//! ```bash
//! cargo run -p tutorial-cli -- migrate todo
//! ```

pub mod todos;
pub mod users;

use std::time::Duration;

use secrecy::ExposeSecret;
use sqlx::PgPool;
use sqlx::postgres::PgPoolOptions;
use thiserror::Error;

pub use todos::{InMemoryTodoRepository, PgTodoRepository, TodoRepository};
pub use users::{InMemoryUserRepository, PgUserRepository, UserRepository};

/// Errors that can occur during repository operations.
#[derive(Debug, Error)]
pub enum RepositoryError {
    /// Database error from sqlx.
    #[error("database error: {0}")]
    Database(#[from] sqlx::Error),

    /// Data in the database is corrupted or invalid.
    #[error("data corruption: {0}")]
    DataCorruption(String),

    /// Constraint violation (e.g., unique username).
    #[error("constraint violation: {0}")]
    Conflict(String),

    /// The in-memory store ran out of identifiers.
    #[error("identifier space exhausted")]
    Exhausted,
}

/// Map a unique-constraint violation to `RepositoryError::Conflict`.
pub(crate) fn conflict_on_unique(err: sqlx::Error, what: &str) -> RepositoryError {
    if let sqlx::Error::Database(ref db_err) = err
        && db_err.is_unique_violation()
    {
        return RepositoryError::Conflict(format!("{what} already exists"));
    }
    RepositoryError::Database(err)
}

/// Create a `PostgreSQL` connection pool with sensible defaults.
///
/// # Errors
///
/// Returns `sqlx::Error` if the connection cannot be established.
pub async fn create_pool(database_url: &secrecy::SecretString) -> Result<PgPool, sqlx::Error> {
    PgPoolOptions::new()
        .max_connections(10)
        .min_connections(1)
        .acquire_timeout(Duration::from_secs(10))
        .connect(database_url.expose_secret())
        .await
}

/// Next identifier after the largest in use, starting at 1.
pub(crate) fn next_id(ids: impl Iterator<Item = i32>) -> Result<i32, RepositoryError> {
    ids.max()
        .unwrap_or(0)
        .checked_add(1)
        .ok_or(RepositoryError::Exhausted)
}
