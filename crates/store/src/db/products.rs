//! Product repositories.
//!
//! Handlers only see [`ProductRepository`]; the concrete store is chosen at
//! startup from configuration.

use async_trait::async_trait;
use rust_decimal::Decimal;
use sqlx::{FromRow, PgPool};
use tokio::sync::RwLock;

use tutorial_core::{Price, ProductDraft, ProductId};

use super::RepositoryError;
use crate::models::Product;

/// The demo catalog: `(name, description, price)`, ids assigned from 1.
pub const DEMO_CATALOG: &[(&str, &str, i64)] = &[
    ("TV", "Best TV", 50),
    ("iPhone", "Best iPhone", 100),
    ("Chromecast", "Best Chromecast", 150),
    ("Glasses", "Best Glasses", 500),
];

/// Read/append access to the catalog.
#[async_trait]
pub trait ProductRepository: Send + Sync {
    /// All products, ordered by id.
    async fn list(&self) -> Result<Vec<Product>, RepositoryError>;

    /// Look up a single product.
    async fn get(&self, id: ProductId) -> Result<Option<Product>, RepositoryError>;

    /// Persist a validated draft and return the stored product.
    async fn create(&self, draft: ProductDraft) -> Result<Product, RepositoryError>;
}

// =============================================================================
// In-memory catalog
// =============================================================================

/// Process-wide catalog held in memory.
///
/// Constructed once at startup; reads take a shared lock, appends an
/// exclusive one.
#[derive(Debug, Default)]
pub struct InMemoryProductRepository {
    products: RwLock<Vec<Product>>,
}

impl InMemoryProductRepository {
    /// Create an empty catalog.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a catalog holding [`DEMO_CATALOG`].
    #[must_use]
    pub fn seeded() -> Self {
        let products = DEMO_CATALOG
            .iter()
            .zip(1..)
            .filter_map(|(&(name, description, units), id)| {
                Some(Product {
                    id: ProductId::new(id),
                    name: name.to_owned(),
                    description: description.to_owned(),
                    price: Price::from_units(units).ok()?,
                })
            })
            .collect();

        Self {
            products: RwLock::new(products),
        }
    }
}

#[async_trait]
impl ProductRepository for InMemoryProductRepository {
    async fn list(&self) -> Result<Vec<Product>, RepositoryError> {
        Ok(self.products.read().await.clone())
    }

    async fn get(&self, id: ProductId) -> Result<Option<Product>, RepositoryError> {
        Ok(self
            .products
            .read()
            .await
            .iter()
            .find(|p| p.id == id)
            .cloned())
    }

    async fn create(&self, draft: ProductDraft) -> Result<Product, RepositoryError> {
        let mut products = self.products.write().await;

        let next_id = products
            .iter()
            .map(|p| p.id.as_i32())
            .max()
            .unwrap_or(0)
            .checked_add(1)
            .ok_or(RepositoryError::Exhausted)?;

        let product = Product::from_draft(ProductId::new(next_id), draft);
        products.push(product.clone());
        Ok(product)
    }
}

// =============================================================================
// PostgreSQL catalog
// =============================================================================

/// Row shape of the `products` table.
#[derive(Debug, FromRow)]
struct ProductRow {
    id: i32,
    name: String,
    description: String,
    price: Decimal,
}

impl TryFrom<ProductRow> for Product {
    type Error = RepositoryError;

    fn try_from(row: ProductRow) -> Result<Self, Self::Error> {
        let price = Price::new(row.price).map_err(|e| {
            RepositoryError::DataCorruption(format!("invalid price for product {}: {e}", row.id))
        })?;

        Ok(Self {
            id: ProductId::new(row.id),
            name: row.name,
            description: row.description,
            price,
        })
    }
}

/// Catalog stored in the `products` table.
#[derive(Debug, Clone)]
pub struct PgProductRepository {
    pool: PgPool,
}

impl PgProductRepository {
    /// Create a new product repository.
    #[must_use]
    pub const fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Insert the demo catalog if the table is empty.
    ///
    /// Returns the number of rows inserted.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if a query fails.
    pub async fn seed_demo_catalog(&self) -> Result<u64, RepositoryError> {
        let mut tx = self.pool.begin().await?;

        let (count,): (i64,) = sqlx::query_as("SELECT COUNT(*) FROM products")
            .fetch_one(&mut *tx)
            .await?;
        if count > 0 {
            return Ok(0);
        }

        let mut inserted = 0;
        for &(name, description, units) in DEMO_CATALOG {
            inserted += sqlx::query(
                "INSERT INTO products (name, description, price) VALUES ($1, $2, $3)",
            )
            .bind(name)
            .bind(description)
            .bind(Decimal::from(units))
            .execute(&mut *tx)
            .await?
            .rows_affected();
        }

        tx.commit().await?;
        Ok(inserted)
    }
}

#[async_trait]
impl ProductRepository for PgProductRepository {
    async fn list(&self) -> Result<Vec<Product>, RepositoryError> {
        let rows: Vec<ProductRow> =
            sqlx::query_as("SELECT id, name, description, price FROM products ORDER BY id")
                .fetch_all(&self.pool)
                .await?;

        rows.into_iter().map(Product::try_from).collect()
    }

    async fn get(&self, id: ProductId) -> Result<Option<Product>, RepositoryError> {
        let row: Option<ProductRow> =
            sqlx::query_as("SELECT id, name, description, price FROM products WHERE id = $1")
                .bind(id)
                .fetch_optional(&self.pool)
                .await?;

        row.map(Product::try_from).transpose()
    }

    async fn create(&self, draft: ProductDraft) -> Result<Product, RepositoryError> {
        let row: ProductRow = sqlx::query_as(
            r"
            INSERT INTO products (name, description, price)
            VALUES ($1, $2, $3)
            RETURNING id, name, description, price
            ",
        )
        .bind(&draft.name)
        .bind(&draft.description)
        .bind(draft.price)
        .fetch_one(&self.pool)
        .await?;

        Product::try_from(row)
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    fn draft(name: &str, price: &str) -> ProductDraft {
        ProductDraft::validate(name, "", price).unwrap()
    }

    #[tokio::test]
    async fn test_seeded_catalog_is_one_based() {
        let repo = InMemoryProductRepository::seeded();
        let products = repo.list().await.unwrap();

        assert_eq!(products.len(), DEMO_CATALOG.len());
        for (index, product) in products.iter().enumerate() {
            assert_eq!(product.id.as_i32(), i32::try_from(index).unwrap() + 1);
        }
        assert_eq!(products[0].name, "TV");
        assert_eq!(products[0].price.to_string(), "50");
    }

    #[tokio::test]
    async fn test_get_missing_returns_none() {
        let repo = InMemoryProductRepository::seeded();
        assert!(repo.get(ProductId::new(0)).await.unwrap().is_none());
        assert!(repo.get(ProductId::new(99)).await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_create_appends_with_next_id() {
        let repo = InMemoryProductRepository::seeded();
        let created = repo.create(draft("Lamp", "20")).await.unwrap();

        assert_eq!(created.id, ProductId::new(5));
        assert_eq!(repo.get(created.id).await.unwrap(), Some(created));
        assert_eq!(repo.list().await.unwrap().len(), 5);
    }

    #[tokio::test]
    async fn test_create_in_empty_catalog_starts_at_one() {
        let repo = InMemoryProductRepository::new();
        let created = repo.create(draft("Lamp", "20")).await.unwrap();
        assert_eq!(created.id, ProductId::new(1));
    }
}
