//! HTTP route handlers for the to-do API.
//!
//! # Route Structure
//!
//! ```text
//! POST   /signup/               - Create account, returns token
//! POST   /login/                - Returns the account's token
//! GET    /health                - Liveness check
//! GET    /health/ready          - Readiness check
//!
//! # Todos (Authorization: Token <key>)
//! GET    /todos/                - List own todos, newest first
//! POST   /todos/                - Create todo
//! GET    /todos/{pk}            - Show todo
//! PUT    /todos/{pk}            - Replace title, memo and importance
//! PATCH  /todos/{pk}            - Change given fields
//! DELETE /todos/{pk}            - Delete todo
//! PUT    /todos/{pk}/complete   - Toggle completed
//! PATCH  /todos/{pk}/complete   - Toggle completed
//! ```

pub mod auth;
pub mod health;
pub mod todos;

use axum::{
    Router,
    routing::{get, post, put},
};

use crate::state::AppState;

/// Create the signup and login routes router.
pub fn auth_routes() -> Router<AppState> {
    Router::new()
        .route("/signup/", post(auth::signup))
        .route("/login/", post(auth::login))
}

/// Create the todo routes router.
pub fn todo_routes() -> Router<AppState> {
    Router::new()
        .route("/todos/", get(todos::list).post(todos::create))
        .route(
            "/todos/{pk}",
            get(todos::show)
                .put(todos::replace)
                .patch(todos::patch)
                .delete(todos::delete),
        )
        .route(
            "/todos/{pk}/complete",
            put(todos::toggle_complete).patch(todos::toggle_complete),
        )
}

/// Create the health check routes router.
pub fn health_routes() -> Router<AppState> {
    Router::new()
        .route("/health", get(health::health))
        .route("/health/ready", get(health::readiness))
}

/// Create all to-do API routes.
pub fn routes() -> Router<AppState> {
    Router::new()
        .merge(auth_routes())
        .merge(todo_routes())
        .merge(health_routes())
}
