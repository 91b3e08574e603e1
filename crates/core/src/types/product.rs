//! Product creation input and its validation.

use serde::{Deserialize, Serialize};

use super::price::Price;

/// Maximum length of a product name.
pub const MAX_NAME_LENGTH: usize = 255;

/// Per-field validation messages for a product submission.
///
/// A field is `None` when it passed validation.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProductFieldErrors {
    pub name: Option<String>,
    pub price: Option<String>,
}

impl ProductFieldErrors {
    /// Returns true when no field has an error.
    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.name.is_none() && self.price.is_none()
    }
}

/// A validated product that has not been persisted yet.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProductDraft {
    pub name: String,
    pub description: String,
    pub price: Price,
}

impl ProductDraft {
    /// Validate raw form input into a draft.
    ///
    /// The name is trimmed and must be non-empty; the price must parse as a
    /// decimal greater than zero.
    ///
    /// # Errors
    ///
    /// Returns every failing field at once so a form can show all messages.
    pub fn validate(
        name: &str,
        description: &str,
        price: &str,
    ) -> Result<Self, ProductFieldErrors> {
        let mut errors = ProductFieldErrors::default();

        let name = name.trim();
        if name.is_empty() {
            errors.name = Some("This field is required.".to_owned());
        } else if name.chars().count() > MAX_NAME_LENGTH {
            errors.name = Some(format!(
                "Ensure this value has at most {MAX_NAME_LENGTH} characters."
            ));
        }

        let price = if price.trim().is_empty() {
            errors.price = Some("This field is required.".to_owned());
            None
        } else {
            match Price::parse(price) {
                Ok(p) => Some(p),
                Err(e) => {
                    errors.price = Some(format!("Enter a valid price: {e}."));
                    None
                }
            }
        };

        match price {
            Some(price) if errors.is_empty() => Ok(Self {
                name: name.to_owned(),
                description: description.trim().to_owned(),
                price,
            }),
            _ => Err(errors),
        }
    }
}
