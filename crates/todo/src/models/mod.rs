//! Domain models for the to-do API.

pub mod todo;
pub mod user;

pub use todo::{NewTodo, Todo, TodoChanges};
pub use user::{AuthToken, User};
