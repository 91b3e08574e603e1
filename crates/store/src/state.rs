//! Application state shared across handlers.

use std::sync::Arc;

use sqlx::PgPool;

use crate::config::StoreConfig;
use crate::db::{InMemoryProductRepository, PgProductRepository, ProductRepository};

/// Application state shared across all handlers.
///
/// This struct is cheaply cloneable via `Arc` and provides access to
/// shared resources like the product catalog and configuration.
#[derive(Clone)]
pub struct AppState {
    inner: Arc<AppStateInner>,
}

struct AppStateInner {
    config: StoreConfig,
    pool: Option<PgPool>,
    products: Arc<dyn ProductRepository>,
}

impl AppState {
    /// Create state backed by the in-memory demo catalog.
    #[must_use]
    pub fn in_memory(config: StoreConfig) -> Self {
        Self::with_products(config, None, Arc::new(InMemoryProductRepository::seeded()))
    }

    /// Create state backed by `PostgreSQL`.
    #[must_use]
    pub fn postgres(config: StoreConfig, pool: PgPool) -> Self {
        let products = Arc::new(PgProductRepository::new(pool.clone()));
        Self::with_products(config, Some(pool), products)
    }

    /// Create state with an explicit product repository.
    #[must_use]
    pub fn with_products(
        config: StoreConfig,
        pool: Option<PgPool>,
        products: Arc<dyn ProductRepository>,
    ) -> Self {
        Self {
            inner: Arc::new(AppStateInner {
                config,
                pool,
                products,
            }),
        }
    }

    /// Get a reference to the store configuration.
    #[must_use]
    pub fn config(&self) -> &StoreConfig {
        &self.inner.config
    }

    /// Get the database pool, if the store runs on `PostgreSQL`.
    #[must_use]
    pub fn pool(&self) -> Option<&PgPool> {
        self.inner.pool.as_ref()
    }

    /// Get the product catalog.
    #[must_use]
    pub fn products(&self) -> &dyn ProductRepository {
        self.inner.products.as_ref()
    }
}
