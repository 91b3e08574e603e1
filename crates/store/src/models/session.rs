//! Session-related types.
//!
//! Everything the store keeps per visitor lives in one [`SessionState`]
//! value stored under a single session key, so handlers work with named,
//! typed fields instead of string lookups.

use std::collections::BTreeSet;

use axum::{extract::FromRequestParts, http::request::Parts};
use serde::{Deserialize, Serialize};
use tower_sessions::Session;

use tutorial_core::ProductId;

/// Session key holding the serialized [`SessionState`].
const STATE_KEY: &str = "store";

/// Products the visitor has put in the cart.
///
/// Presence means "in cart"; there is no quantity.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Cart {
    items: BTreeSet<ProductId>,
}

impl Cart {
    /// Add a product. Returns false if it was already in the cart.
    pub fn add(&mut self, id: ProductId) -> bool {
        self.items.insert(id)
    }

    /// Whether the product is in the cart.
    #[must_use]
    pub fn contains(&self, id: ProductId) -> bool {
        self.items.contains(&id)
    }

    /// Number of distinct products in the cart.
    #[must_use]
    pub fn len(&self) -> usize {
        self.items.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }
}

/// Per-visitor state stored in the session.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SessionState {
    /// Shopping cart contents.
    #[serde(default)]
    pub cart: Cart,
    /// URL of the most recently uploaded image.
    #[serde(default)]
    pub last_image_url: Option<String>,
}

/// Typed access to the visitor's session.
///
/// Wraps the tower-sessions [`Session`] set by the session layer.
#[derive(Debug, Clone)]
pub struct StoreSession(Session);

impl StoreSession {
    /// Wrap a raw session.
    #[must_use]
    pub const fn new(session: Session) -> Self {
        Self(session)
    }

    /// Load the current state, or the default for a fresh session.
    ///
    /// # Errors
    ///
    /// Returns an error if the session store cannot be read.
    pub async fn load(&self) -> Result<SessionState, tower_sessions::session::Error> {
        Ok(self.0.get(STATE_KEY).await?.unwrap_or_default())
    }

    /// Apply a change to the state and write it back.
    ///
    /// # Errors
    ///
    /// Returns an error if the session store cannot be read or written.
    pub async fn update<F>(&self, change: F) -> Result<SessionState, tower_sessions::session::Error>
    where
        F: FnOnce(&mut SessionState),
    {
        let mut state = self.load().await?;
        change(&mut state);
        self.0.insert(STATE_KEY, &state).await?;
        Ok(state)
    }

    /// The visitor's cart.
    ///
    /// # Errors
    ///
    /// Returns an error if the session store cannot be read.
    pub async fn cart(&self) -> Result<Cart, tower_sessions::session::Error> {
        Ok(self.load().await?.cart)
    }

    /// Add a product to the cart.
    ///
    /// # Errors
    ///
    /// Returns an error if the session store cannot be read or written.
    pub async fn add_to_cart(&self, id: ProductId) -> Result<Cart, tower_sessions::session::Error> {
        Ok(self.update(|state| {
            state.cart.add(id);
        })
        .await?
        .cart)
    }

    /// Empty the cart. A no-op when the cart is already empty.
    ///
    /// # Errors
    ///
    /// Returns an error if the session store cannot be read or written.
    pub async fn clear_cart(&self) -> Result<(), tower_sessions::session::Error> {
        if self.cart().await?.is_empty() {
            return Ok(());
        }
        self.update(|state| state.cart = Cart::default()).await?;
        Ok(())
    }

    /// URL of the most recently uploaded image, if any.
    ///
    /// # Errors
    ///
    /// Returns an error if the session store cannot be read.
    pub async fn last_image_url(&self) -> Result<Option<String>, tower_sessions::session::Error> {
        Ok(self.load().await?.last_image_url)
    }

    /// Remember the URL of a newly uploaded image.
    ///
    /// # Errors
    ///
    /// Returns an error if the session store cannot be read or written.
    pub async fn set_last_image_url(
        &self,
        url: String,
    ) -> Result<(), tower_sessions::session::Error> {
        self.update(|state| state.last_image_url = Some(url)).await?;
        Ok(())
    }
}

impl<S> FromRequestParts<S> for StoreSession
where
    S: Send + Sync,
{
    type Rejection = <Session as FromRequestParts<S>>::Rejection;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        Session::from_request_parts(parts, state).await.map(Self)
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use std::sync::Arc;

    use tower_sessions::MemoryStore;

    use super::*;

    fn session() -> StoreSession {
        StoreSession::new(Session::new(None, Arc::new(MemoryStore::default()), None))
    }

    #[test]
    fn test_cart_add_is_idempotent() {
        let mut cart = Cart::default();
        assert!(cart.add(ProductId::new(2)));
        assert!(!cart.add(ProductId::new(2)));
        assert_eq!(cart.len(), 1);
        assert!(cart.contains(ProductId::new(2)));
    }

    #[test]
    fn test_state_deserializes_from_partial_json() {
        let state: SessionState = serde_json::from_str(r#"{"cart":[4]}"#).unwrap();
        assert!(state.cart.contains(ProductId::new(4)));
        assert!(state.last_image_url.is_none());
    }

    #[tokio::test]
    async fn test_fresh_session_has_empty_state() {
        let session = session();
        assert_eq!(session.load().await.unwrap(), SessionState::default());
    }

    #[tokio::test]
    async fn test_add_twice_keeps_one_entry() {
        let session = session();
        session.add_to_cart(ProductId::new(1)).await.unwrap();
        let cart = session.add_to_cart(ProductId::new(1)).await.unwrap();
        assert_eq!(cart.len(), 1);
    }

    #[tokio::test]
    async fn test_clear_cart_keeps_image() {
        let session = session();
        session.add_to_cart(ProductId::new(1)).await.unwrap();
        session
            .set_last_image_url("/media/uploaded_images/a.png".to_owned())
            .await
            .unwrap();

        session.clear_cart().await.unwrap();

        let state = session.load().await.unwrap();
        assert!(state.cart.is_empty());
        assert_eq!(
            state.last_image_url.as_deref(),
            Some("/media/uploaded_images/a.png")
        );
    }

    #[tokio::test]
    async fn test_clear_empty_cart_is_noop() {
        let session = session();
        session.clear_cart().await.unwrap();
        assert!(session.cart().await.unwrap().is_empty());
    }
}
