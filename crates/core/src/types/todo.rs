//! To-do item title.

use core::fmt;

use serde::{Deserialize, Serialize};

/// Errors that can occur when parsing a [`TodoTitle`].
#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
pub enum TodoTitleError {
    /// The title is empty or only whitespace.
    #[error("title cannot be blank")]
    Blank,
    /// The title is too long.
    #[error("title must be at most {max} characters")]
    TooLong {
        /// Maximum allowed length.
        max: usize,
    },
}

/// The title of a to-do item, trimmed and between 1 and 100 characters.
///
/// ```
/// use tutorial_core::TodoTitle;
///
/// assert_eq!(TodoTitle::parse("  buy milk ").unwrap().as_str(), "buy milk");
/// assert!(TodoTitle::parse("   ").is_err());
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct TodoTitle(String);

impl TodoTitle {
    /// Maximum length of a title, in characters.
    pub const MAX_LENGTH: usize = 100;

    /// Parse a title, trimming surrounding whitespace.
    ///
    /// # Errors
    ///
    /// Returns `TodoTitleError::Blank` for an empty title and
    /// `TodoTitleError::TooLong` when it exceeds 100 characters.
    pub fn parse(s: &str) -> Result<Self, TodoTitleError> {
        let s = s.trim();
        if s.is_empty() {
            return Err(TodoTitleError::Blank);
        }
        if s.chars().count() > Self::MAX_LENGTH {
            return Err(TodoTitleError::TooLong {
                max: Self::MAX_LENGTH,
            });
        }
        Ok(Self(s.to_owned()))
    }

    /// Returns the title as a string slice.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for TodoTitle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl TryFrom<String> for TodoTitle {
    type Error = TodoTitleError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::parse(&value)
    }
}

impl From<TodoTitle> for String {
    fn from(title: TodoTitle) -> Self {
        title.0
    }
}
