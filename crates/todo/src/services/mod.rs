//! Business logic services for the to-do API.
//!
//! # Services
//!
//! - `auth` - Username/password accounts and API tokens

pub mod auth;

pub use auth::{AuthError, AuthService};
