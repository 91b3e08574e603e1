//! Live-server integration tests for the tutorial apps.
//!
//! # Running Tests
//!
//! ```bash
//! # Start both servers (in-memory mode works without a database)
//! cargo run -p tutorial-store &
//! cargo run -p tutorial-todo &
//!
//! # Run the ignored live tests
//! cargo test -p tutorial-integration-tests -- --ignored
//! ```
//!
//! # Environment Variables
//!
//! - `STORE_BASE_URL` - Store server (default: `http://localhost:8000`)
//! - `TODO_BASE_URL` - To-do API server (default: `http://localhost:8001`)

use reqwest::{Client, redirect::Policy};

/// Base URL of the running store.
#[must_use]
pub fn store_base_url() -> String {
    base_url("STORE_BASE_URL", "http://localhost:8000")
}

/// Base URL of the running to-do API.
#[must_use]
pub fn todo_base_url() -> String {
    base_url("TODO_BASE_URL", "http://localhost:8001")
}

/// A client that keeps cookies and does not follow redirects, so tests can
/// assert on the redirect itself.
///
/// # Errors
///
/// Returns an error if the TLS backend cannot be initialized.
pub fn browser_client() -> reqwest::Result<Client> {
    Client::builder()
        .cookie_store(true)
        .redirect(Policy::none())
        .build()
}

/// A username that will not collide with earlier runs.
#[must_use]
pub fn unique_username(prefix: &str) -> String {
    format!("{prefix}_{}", &uuid::Uuid::new_v4().simple().to_string()[..12])
}

fn base_url(var: &str, default: &str) -> String {
    std::env::var(var)
        .unwrap_or_else(|_| default.to_owned())
        .trim_end_matches('/')
        .to_owned()
}
