//! Tutorial Core - Shared types library.
//!
//! This crate provides common types used across the tutorial applications:
//! - `store` - Online store (pages, catalog, cart, image uploads)
//! - `todo` - To-do list JSON API
//! - `cli` - Command-line tools for migrations and seeding
//!
//! # Architecture
//!
//! The core crate contains only types and validation - no I/O, no database
//! access, no HTTP. This keeps it lightweight and allows it to be used anywhere.
//!
//! # Modules
//!
//! - [`types`] - Newtype wrappers for type-safe IDs, prices, usernames, to-do
//!   titles, and validated product drafts

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod types;

pub use types::*;
