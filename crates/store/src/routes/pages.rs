//! Static content page route handlers.
//!
//! Home, about and contact pages render fixed text with no external state.

use askama::Template;
use askama_web::WebTemplate;
use axum::response::IntoResponse;
use tracing::instrument;

use crate::filters;

/// Home page template.
#[derive(Template, WebTemplate)]
#[template(path = "pages/home.html")]
pub struct HomeTemplate {
    pub title: &'static str,
    pub subtitle: &'static str,
}

/// About page template.
#[derive(Template, WebTemplate)]
#[template(path = "pages/about.html")]
pub struct AboutTemplate {
    pub title: &'static str,
    pub subtitle: &'static str,
    pub description: &'static str,
    pub author: &'static str,
}

/// Contact page template.
#[derive(Template, WebTemplate)]
#[template(path = "pages/contact.html")]
pub struct ContactTemplate {
    pub title: &'static str,
    pub subtitle: &'static str,
    pub email: &'static str,
    pub address: &'static str,
    pub phone: &'static str,
}

/// Display the home page.
#[instrument]
pub async fn home() -> impl IntoResponse {
    HomeTemplate {
        title: "Home Page - Online Store",
        subtitle: "Welcome to the Online Store",
    }
}

/// Display the about page.
#[instrument]
pub async fn about() -> impl IntoResponse {
    AboutTemplate {
        title: "About us - Online Store",
        subtitle: "About us",
        description: "This is an about page ...",
        author: "Developed by: Your Name",
    }
}

/// Display the contact page.
#[instrument]
pub async fn contact() -> impl IntoResponse {
    ContactTemplate {
        title: "Contact - Online Store",
        subtitle: "Contact Us",
        email: "site@gmail.com",
        address: "Street 1,2,3 New York City",
        phone: "+1 234 567 890",
    }
}
