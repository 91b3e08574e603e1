//! Domain models for the store.

pub mod product;
pub mod session;

pub use product::Product;
pub use session::{Cart, SessionState, StoreSession};
