//! Product route handlers.
//!
//! Detail pages never answer 404: an id that does not parse, is below 1, or
//! names no product redirects to the home page.

use askama::Template;
use askama_web::WebTemplate;
use axum::{
    Form,
    extract::{Path, State},
    http::StatusCode,
    response::{IntoResponse, Redirect, Response},
};
use serde::Deserialize;
use tracing::instrument;

use tutorial_core::{ProductDraft, ProductFieldErrors, ProductId};

use crate::error::{Result, add_breadcrumb};
use crate::filters;
use crate::models::Product;
use crate::state::AppState;

/// Where invalid product ids are sent.
const HOME_PATH: &str = "/";

/// Product listing page template.
#[derive(Template, WebTemplate)]
#[template(path = "products/index.html")]
pub struct ProductsIndexTemplate {
    pub title: &'static str,
    pub subtitle: &'static str,
    pub products: Vec<Product>,
}

/// Product detail page template.
#[derive(Template, WebTemplate)]
#[template(path = "products/show.html")]
pub struct ProductShowTemplate {
    pub title: String,
    pub subtitle: String,
    pub product: Product,
}

/// Product creation form template.
#[derive(Template, WebTemplate)]
#[template(path = "products/create.html")]
pub struct ProductCreateTemplate {
    pub title: &'static str,
    pub subtitle: &'static str,
    pub form: ProductForm,
    pub errors: ProductFieldErrors,
}

impl ProductCreateTemplate {
    fn new(form: ProductForm, errors: ProductFieldErrors) -> Self {
        Self {
            title: "Create product",
            subtitle: "Create product",
            form,
            errors,
        }
    }
}

/// Product created confirmation template.
#[derive(Template, WebTemplate)]
#[template(path = "products/created.html")]
pub struct ProductCreatedTemplate {
    pub title: &'static str,
    pub subtitle: &'static str,
    pub product: Product,
}

/// Product creation form data.
///
/// Every field defaults to empty so a missing field is reported as a
/// validation message rather than a rejected request.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ProductForm {
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub price: String,
}

/// Display product listing page.
///
/// # Errors
///
/// Returns `AppError::Database` if the catalog cannot be read.
#[instrument(skip(state))]
pub async fn index(State(state): State<AppState>) -> Result<impl IntoResponse> {
    let products = state.products().list().await?;

    Ok(ProductsIndexTemplate {
        title: "Products - Online Store",
        subtitle: "List of products",
        products,
    })
}

/// Display product detail page, or redirect home for an invalid id.
///
/// # Errors
///
/// Returns `AppError::Database` if the catalog cannot be read.
#[instrument(skip(state))]
pub async fn show(State(state): State<AppState>, Path(id): Path<String>) -> Result<Response> {
    let Some(id) = parse_product_id(&id) else {
        tracing::debug!(id = %id, "Invalid product id, redirecting home");
        return Ok(Redirect::to(HOME_PATH).into_response());
    };

    let Some(product) = state.products().get(id).await? else {
        tracing::debug!(%id, "Unknown product, redirecting home");
        return Ok(Redirect::to(HOME_PATH).into_response());
    };

    Ok(ProductShowTemplate {
        title: format!("{} - Online Store", product.name),
        subtitle: format!("{} - Product information", product.name),
        product,
    }
    .into_response())
}

/// Display the empty product creation form.
#[instrument]
pub async fn create_form() -> impl IntoResponse {
    ProductCreateTemplate::new(ProductForm::default(), ProductFieldErrors::default())
}

/// Handle product creation form submission.
///
/// Invalid input re-renders the form with messages and the submitted values;
/// nothing is persisted in that case.
///
/// # Errors
///
/// Returns `AppError::Database` if the product cannot be saved.
#[instrument(skip(state, form), fields(name = %form.name))]
pub async fn create(
    State(state): State<AppState>,
    Form(form): Form<ProductForm>,
) -> Result<Response> {
    let draft = match ProductDraft::validate(&form.name, &form.description, &form.price) {
        Ok(draft) => draft,
        Err(errors) => {
            tracing::debug!(?errors, "Product form rejected");
            return Ok((
                StatusCode::UNPROCESSABLE_ENTITY,
                ProductCreateTemplate::new(form, errors),
            )
                .into_response());
        }
    };

    let product = state.products().create(draft).await?;
    tracing::info!(id = %product.id, name = %product.name, "Product created");

    let id = product.id.to_string();
    add_breadcrumb("catalog", "Created product", &[("product_id", id.as_str())]);

    Ok((
        StatusCode::CREATED,
        ProductCreatedTemplate {
            title: "Product created",
            subtitle: "Product created",
            product,
        },
    )
        .into_response())
}

/// Parse a path segment as a 1-based product id.
fn parse_product_id(raw: &str) -> Option<ProductId> {
    raw.parse::<ProductId>()
        .ok()
        .filter(|id| id.as_i32() >= 1)
}
