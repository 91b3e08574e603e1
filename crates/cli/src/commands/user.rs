//! To-do API account commands.
//!
//! # Environment Variables
//!
//! - `TODO_DATABASE_URL` - `PostgreSQL` connection string (falls back to `DATABASE_URL`)

use tutorial_todo::db::PgUserRepository;
use tutorial_todo::services::AuthService;

use super::database_url;

/// Create an account and log its API token.
///
/// # Errors
///
/// Returns an error if the username is invalid or taken, the password is
/// too short, or the database is unreachable.
pub async fn create(username: &str, password: &str) -> Result<(), Box<dyn std::error::Error>> {
    let url = database_url("TODO_DATABASE_URL")?;
    let pool = tutorial_todo::db::create_pool(&url).await?;

    let users = PgUserRepository::new(pool);
    let (user, token) = AuthService::new(&users).signup(username, password).await?;

    tracing::info!("Account created! ID: {}, Username: {}", user.id, user.username);
    tracing::info!("API token: {}", token.as_str());
    Ok(())
}
