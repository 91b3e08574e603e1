//! Online store library.
//!
//! Server-rendered pages for a small product catalog, a session cart and an
//! image upload. The binary wires this library to configuration; tests build
//! the same router with in-memory backends.

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod config;
pub mod db;
pub mod error;
pub mod filters;
pub mod middleware;
pub mod models;
pub mod routes;
pub mod state;
pub mod storage;

use std::sync::Arc;

use axum::Router;
use tower_http::{services::ServeDir, trace::TraceLayer};
use tower_sessions::{SessionManagerLayer, SessionStore};

use crate::state::AppState;
use crate::storage::ImageStorage;

/// Build the complete store application.
///
/// Layers, outermost first: Sentry, request tracing, request id, sessions.
/// Uploaded images are served from the media root when the media URL is a
/// local path.
pub fn app<S>(
    state: AppState,
    image_storage: Arc<dyn ImageStorage>,
    session_layer: SessionManagerLayer<S>,
) -> Router
where
    S: SessionStore + Clone,
{
    let config = state.config();
    let mut router = routes::routes(image_storage, config.max_upload_bytes);

    if config.serves_media() {
        router = router.nest_service(&config.media_url, ServeDir::new(&config.media_root));
    }

    router
        .layer(session_layer)
        .layer(axum::middleware::from_fn(middleware::request_id_middleware))
        .layer(TraceLayer::new_for_http().make_span_with(middleware::make_request_span))
        .with_state(state)
        // Sentry layers (outermost for full request coverage)
        .layer(sentry_tower::NewSentryLayer::new_from_top())
        .layer(sentry_tower::SentryHttpLayer::new().enable_transaction())
}
