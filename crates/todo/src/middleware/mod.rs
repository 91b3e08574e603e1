//! HTTP middleware and extractors for the to-do API.
//!
//! # Middleware Order (outermost first)
//!
//! 1. Sentry layers (capture errors, transactions)
//! 2. `TraceLayer` (request spans)
//! 3. Request ID (add unique ID to each request)
//!
//! Authentication is per-handler through the [`RequireUser`] extractor.

pub mod auth;
pub mod request_id;

pub use auth::{AUTH_SCHEME, RequireUser};
pub use request_id::{REQUEST_ID_HEADER, make_request_span, request_id_middleware};
