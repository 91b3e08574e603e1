//! Session middleware configuration.
//!
//! Sessions live in `PostgreSQL` when the store has a database, otherwise in
//! process memory.

use tower_sessions::{Expiry, MemoryStore, SessionManagerLayer, SessionStore};
use tower_sessions_sqlx_store::PostgresStore;

use crate::config::StoreConfig;

/// Session cookie name.
pub const SESSION_COOKIE_NAME: &str = "tutorial_session";

/// Session expiry time in seconds (7 days).
const SESSION_EXPIRY_SECONDS: i64 = 7 * 24 * 60 * 60;

/// Create the session layer for any session store.
#[must_use]
pub fn create_session_layer<S>(store: S, config: &StoreConfig) -> SessionManagerLayer<S>
where
    S: SessionStore + Clone,
{
    SessionManagerLayer::new(store)
        .with_name(SESSION_COOKIE_NAME)
        .with_expiry(Expiry::OnInactivity(
            tower_sessions::cookie::time::Duration::seconds(SESSION_EXPIRY_SECONDS),
        ))
        .with_secure(config.is_secure())
        .with_same_site(tower_sessions::cookie::SameSite::Lax)
        .with_http_only(true)
        .with_path("/")
}

/// Create the session layer with an in-memory store.
#[must_use]
pub fn memory_session_layer(config: &StoreConfig) -> SessionManagerLayer<MemoryStore> {
    create_session_layer(MemoryStore::default(), config)
}

/// Create the `PostgreSQL` session store and its table.
///
/// # Errors
///
/// Returns `sqlx::Error` if the session schema cannot be created.
pub async fn postgres_session_store(pool: sqlx::PgPool) -> Result<PostgresStore, sqlx::Error> {
    let store = PostgresStore::new(pool);
    store.migrate().await?;
    Ok(store)
}
