//! Cart route handlers.
//!
//! The cart is a set of product ids kept in the visitor's session. Adding an
//! id that does not name a catalog product is ignored, and every mutation
//! redirects back to the cart page.

use askama::Template;
use askama_web::WebTemplate;
use axum::{
    Form,
    extract::{Path, State},
    response::{IntoResponse, Redirect},
};
use serde::Deserialize;
use tracing::instrument;

use tutorial_core::ProductId;

use crate::error::{Result, add_breadcrumb};
use crate::filters;
use crate::models::{Product, StoreSession};
use crate::state::AppState;

/// Cart page path, the target of every cart redirect.
pub const CART_PATH: &str = "/cart/";

/// Cart page template.
#[derive(Template, WebTemplate)]
#[template(path = "cart/index.html")]
pub struct CartTemplate {
    pub title: &'static str,
    pub subtitle: &'static str,
    /// Every catalog product, each with an add button.
    pub products: Vec<Product>,
    /// Products currently in the cart.
    pub cart_products: Vec<Product>,
}

/// Add-to-cart form data.
#[derive(Debug, Deserialize)]
pub struct AddToCartForm {
    #[serde(default)]
    pub product_id: String,
}

/// Display the cart page.
///
/// # Errors
///
/// Returns an error if the catalog or the session cannot be read.
#[instrument(skip(state, session))]
pub async fn show(
    State(state): State<AppState>,
    session: StoreSession,
) -> Result<impl IntoResponse> {
    let products = state.products().list().await?;
    let cart = session.cart().await?;

    // Ids whose product has since disappeared are simply not shown
    let cart_products = products
        .iter()
        .filter(|product| cart.contains(product.id))
        .cloned()
        .collect();

    Ok(CartTemplate {
        title: "Cart - Online Store",
        subtitle: "Shopping Cart",
        products,
        cart_products,
    })
}

/// Add the product named in the path to the cart.
///
/// # Errors
///
/// Returns an error if the catalog or the session cannot be accessed.
#[instrument(skip(state, session))]
pub async fn add_path(
    State(state): State<AppState>,
    session: StoreSession,
    Path(product_id): Path<String>,
) -> Result<Redirect> {
    add_product(&state, &session, &product_id).await
}

/// Add the product named in the form body to the cart.
///
/// # Errors
///
/// Returns an error if the catalog or the session cannot be accessed.
#[instrument(skip(state, session, form), fields(product_id = %form.product_id))]
pub async fn add_form(
    State(state): State<AppState>,
    session: StoreSession,
    Form(form): Form<AddToCartForm>,
) -> Result<Redirect> {
    add_product(&state, &session, &form.product_id).await
}

/// Empty the cart.
///
/// # Errors
///
/// Returns an error if the session cannot be written.
#[instrument(skip(session))]
pub async fn remove_all(session: StoreSession) -> Result<Redirect> {
    session.clear_cart().await?;
    add_breadcrumb("cart", "Emptied cart", &[]);
    tracing::debug!("Cart emptied");

    Ok(Redirect::to(CART_PATH))
}

async fn add_product(state: &AppState, session: &StoreSession, raw_id: &str) -> Result<Redirect> {
    let product = match raw_id.parse::<ProductId>() {
        Ok(id) => state.products().get(id).await?,
        Err(_) => None,
    };

    if let Some(product) = product {
        let cart = session.add_to_cart(product.id).await?;
        let id = product.id.to_string();
        add_breadcrumb("cart", "Added product to cart", &[("product_id", id.as_str())]);
        tracing::debug!(product_id = %product.id, items = cart.len(), "Added product to cart");
    } else {
        tracing::warn!(product_id = raw_id, "Ignoring add to cart for unknown product");
    }

    Ok(Redirect::to(CART_PATH))
}
