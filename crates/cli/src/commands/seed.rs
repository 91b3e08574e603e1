//! Seed the store database with the demo catalog.

use tutorial_store::db::{DEMO_CATALOG, PgProductRepository};

use super::database_url;

/// Insert the demo catalog if the products table is empty.
///
/// # Errors
///
/// Returns an error if the database URL is missing or the inserts fail.
pub async fn products() -> Result<(), Box<dyn std::error::Error>> {
    let url = database_url("STORE_DATABASE_URL")?;
    let pool = tutorial_store::db::create_pool(&url).await?;
    tracing::info!("Connected to database");

    let inserted = PgProductRepository::new(pool).seed_demo_catalog().await?;
    if inserted == 0 {
        tracing::info!("Products table already populated, nothing seeded");
    } else {
        tracing::info!(
            inserted,
            catalog = DEMO_CATALOG.len(),
            "Demo catalog seeded"
        );
    }

    Ok(())
}
