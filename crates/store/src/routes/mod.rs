//! HTTP route handlers for the store.
//!
//! # Route Structure
//!
//! ```text
//! GET  /                       - Home page
//! GET  /about/                 - About page
//! GET  /contact/               - Contact page
//! GET  /health                 - Liveness check
//! GET  /health/ready           - Readiness check
//!
//! # Products
//! GET  /products/              - Product listing
//! GET  /products/create/       - Product creation form
//! POST /products/create/       - Create product
//! GET  /products/{id}          - Product detail (redirects home if unknown)
//!
//! # Cart (session)
//! GET  /cart/                  - Cart page
//! POST /cart/                  - Add product from form field `product_id`
//! POST /cart/add/{product_id}  - Add product
//! POST /cart/removeAll         - Empty the cart
//!
//! # Image upload
//! GET  /image/                 - Upload page (injected storage)
//! POST /image/save/            - Store upload
//! GET  /imagenotdi/            - Upload page (local storage)
//! POST /imagenotdi/save        - Store upload
//! ```

pub mod cart;
pub mod health;
pub mod image;
pub mod pages;
pub mod products;

use std::sync::Arc;

use axum::{
    Extension, Router,
    extract::DefaultBodyLimit,
    routing::{get, post},
};

use crate::state::AppState;
use crate::storage::ImageStorage;

/// Create the page routes router.
pub fn page_routes() -> Router<AppState> {
    Router::new()
        .route("/", get(pages::home))
        .route("/about/", get(pages::about))
        .route("/contact/", get(pages::contact))
}

/// Create the product routes router.
pub fn product_routes() -> Router<AppState> {
    Router::new()
        .route("/products/", get(products::index))
        .route(
            "/products/create/",
            get(products::create_form).post(products::create),
        )
        .route("/products/{id}", get(products::show))
}

/// Create the cart routes router.
pub fn cart_routes() -> Router<AppState> {
    Router::new()
        .route("/cart/", get(cart::show).post(cart::add_form))
        .route("/cart/add/{product_id}", post(cart::add_path))
        .route("/cart/removeAll", post(cart::remove_all))
}

/// Create the image upload routes router.
///
/// `storage` backs the `/image/` pages; the `/imagenotdi/` pages build their
/// own local storage. Upload bodies are capped at `max_upload_bytes`.
pub fn image_routes(storage: Arc<dyn ImageStorage>, max_upload_bytes: usize) -> Router<AppState> {
    let injected = Router::new()
        .route("/image/", get(image::index))
        .route("/image/save/", post(image::save))
        .layer(Extension(storage));

    let inline = Router::new()
        .route("/imagenotdi/", get(image::index_inline))
        .route("/imagenotdi/save", post(image::save_inline));

    injected
        .merge(inline)
        .layer(DefaultBodyLimit::max(max_upload_bytes))
}

/// Create the health check routes router.
pub fn health_routes() -> Router<AppState> {
    Router::new()
        .route("/health", get(health::health))
        .route("/health/ready", get(health::readiness))
}

/// Create all store routes.
pub fn routes(storage: Arc<dyn ImageStorage>, max_upload_bytes: usize) -> Router<AppState> {
    Router::new()
        .merge(page_routes())
        .merge(product_routes())
        .merge(cart_routes())
        .merge(image_routes(storage, max_upload_bytes))
        .merge(health_routes())
}
