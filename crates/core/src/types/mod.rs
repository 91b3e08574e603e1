//! Core types for the tutorial apps.
//!
//! This module provides type-safe wrappers for common domain concepts.

pub mod id;
pub mod price;
pub mod product;
pub mod todo;
pub mod username;

pub use id::*;
pub use price::{Price, PriceError};
pub use product::{ProductDraft, ProductFieldErrors};
pub use todo::{TodoTitle, TodoTitleError};
pub use username::{Username, UsernameError};
