//! Router tests for the store, run against the in-memory catalog and
//! in-memory sessions.

#![allow(clippy::unwrap_used)]

use std::path::PathBuf;
use std::sync::Arc;

use axum::{
    Router,
    body::Body,
    http::{
        Request, Response, StatusCode,
        header::{CONTENT_TYPE, COOKIE, LOCATION, SET_COOKIE},
    },
};
use tempfile::TempDir;
use tower::ServiceExt;

use tutorial_store::app;
use tutorial_store::config::StoreConfig;
use tutorial_store::middleware::{REQUEST_ID_HEADER, memory_session_layer};
use tutorial_store::state::AppState;
use tutorial_store::storage::{ImageStorage, LocalImageStorage};

const FORM: &str = "application/x-www-form-urlencoded";
const BOUNDARY: &str = "tutorial-store-test-boundary";
const PNG: &[u8] = b"\x89PNG\r\n\x1a\n\0\0\0\rIHDR";

/// A store router plus the cookie jar of a single browser.
struct TestStore {
    router: Router,
    cookie: Option<String>,
    media: TempDir,
}

impl TestStore {
    fn new() -> Self {
        Self::with_config(StoreConfig::default())
    }

    fn with_config(config: StoreConfig) -> Self {
        let media = tempfile::tempdir().unwrap();
        let config = StoreConfig {
            media_root: media.path().to_path_buf(),
            ..config
        };

        let storage: Arc<dyn ImageStorage> = Arc::new(LocalImageStorage::from_config(&config));
        let session_layer = memory_session_layer(&config);
        let router = app(AppState::in_memory(config), storage, session_layer);

        Self {
            router,
            cookie: None,
            media,
        }
    }

    async fn send(&mut self, mut request: Request<Body>) -> Response<Body> {
        if let Some(cookie) = &self.cookie {
            request
                .headers_mut()
                .insert(COOKIE, cookie.parse().unwrap());
        }

        let response = self.router.clone().oneshot(request).await.unwrap();

        if let Some(set_cookie) = response.headers().get(SET_COOKIE) {
            let pair = set_cookie.to_str().unwrap().split(';').next().unwrap();
            self.cookie = Some(pair.to_owned());
        }

        response
    }

    async fn get(&mut self, uri: &str) -> Response<Body> {
        self.send(Request::get(uri).body(Body::empty()).unwrap())
            .await
    }

    async fn post_form(&mut self, uri: &str, body: &str) -> Response<Body> {
        let request = Request::post(uri)
            .header(CONTENT_TYPE, FORM)
            .body(Body::from(body.to_owned()))
            .unwrap();
        self.send(request).await
    }

    async fn post_upload(
        &mut self,
        uri: &str,
        field: &str,
        file_name: &str,
        content_type: &str,
        bytes: &[u8],
    ) -> Response<Body> {
        let mut body = format!(
            "--{BOUNDARY}\r\n\
             Content-Disposition: form-data; name=\"{field}\"; filename=\"{file_name}\"\r\n\
             Content-Type: {content_type}\r\n\r\n"
        )
        .into_bytes();
        body.extend_from_slice(bytes);
        body.extend_from_slice(format!("\r\n--{BOUNDARY}--\r\n").as_bytes());

        let request = Request::post(uri)
            .header(
                CONTENT_TYPE,
                format!("multipart/form-data; boundary={BOUNDARY}"),
            )
            .body(Body::from(body))
            .unwrap();
        self.send(request).await
    }

    fn uploaded_files(&self) -> Vec<PathBuf> {
        let dir = self.media.path().join("uploaded_images");
        let Ok(entries) = std::fs::read_dir(dir) else {
            return Vec::new();
        };
        entries.map(|entry| entry.unwrap().path()).collect()
    }
}

async fn body_text(response: Response<Body>) -> String {
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    String::from_utf8(bytes.to_vec()).unwrap()
}

fn location(response: &Response<Body>) -> &str {
    response.headers().get(LOCATION).unwrap().to_str().unwrap()
}

// =============================================================================
// Pages
// =============================================================================

#[tokio::test]
async fn test_home_page() {
    let mut store = TestStore::new();
    let response = store.get("/").await;

    assert_eq!(response.status(), StatusCode::OK);
    let body = body_text(response).await;
    assert!(body.contains("Home Page - Online Store"));
    assert!(body.contains("Welcome to the Online Store"));
}

#[tokio::test]
async fn test_about_and_contact_pages() {
    let mut store = TestStore::new();

    let about = body_text(store.get("/about/").await).await;
    assert!(about.contains("About us"));
    assert!(about.contains("Developed by: Your Name"));

    let contact = body_text(store.get("/contact/").await).await;
    assert!(contact.contains("site@gmail.com"));
    assert!(contact.contains("+1 234 567 890"));
}

#[tokio::test]
async fn test_health_endpoints() {
    let mut store = TestStore::new();
    assert_eq!(store.get("/health").await.status(), StatusCode::OK);
    assert_eq!(store.get("/health/ready").await.status(), StatusCode::OK);
}

#[tokio::test]
async fn test_request_id_is_echoed() {
    let mut store = TestStore::new();
    let request = Request::get("/")
        .header(REQUEST_ID_HEADER, "req-123")
        .body(Body::empty())
        .unwrap();

    let response = store.send(request).await;
    assert_eq!(
        response.headers().get(REQUEST_ID_HEADER).unwrap(),
        "req-123"
    );
}

// =============================================================================
// Products
// =============================================================================

#[tokio::test]
async fn test_product_index_lists_demo_catalog() {
    let mut store = TestStore::new();
    let response = store.get("/products/").await;

    assert_eq!(response.status(), StatusCode::OK);
    let body = body_text(response).await;
    for name in ["TV", "iPhone", "Chromecast", "Glasses"] {
        assert!(body.contains(name), "missing {name}");
    }
}

#[tokio::test]
async fn test_product_detail() {
    let mut store = TestStore::new();
    let response = store.get("/products/2").await;

    assert_eq!(response.status(), StatusCode::OK);
    let body = body_text(response).await;
    assert!(body.contains("iPhone - Online Store"));
    assert!(body.contains("Best iPhone"));
    assert!(body.contains("100"));
}

#[tokio::test]
async fn test_invalid_product_ids_redirect_home() {
    let mut store = TestStore::new();

    for uri in ["/products/0", "/products/-1", "/products/abc", "/products/999"] {
        let response = store.get(uri).await;
        assert_eq!(response.status(), StatusCode::SEE_OTHER, "{uri}");
        assert_eq!(location(&response), "/", "{uri}");
    }
}

#[tokio::test]
async fn test_create_form_renders() {
    let mut store = TestStore::new();
    let response = store.get("/products/create/").await;

    assert_eq!(response.status(), StatusCode::OK);
    let body = body_text(response).await;
    assert!(body.contains("name=\"price\""));
}

#[tokio::test]
async fn test_create_product_then_view_it() {
    let mut store = TestStore::new();

    let response = store
        .post_form(
            "/products/create/",
            "name=Laptop&description=Fast+laptop&price=1200.50",
        )
        .await;
    assert_eq!(response.status(), StatusCode::CREATED);
    assert!(body_text(response).await.contains("Laptop"));

    let detail = store.get("/products/5").await;
    assert_eq!(detail.status(), StatusCode::OK);
    let body = body_text(detail).await;
    assert!(body.contains("Fast laptop"));
    assert!(body.contains("1200.5"));
}

#[tokio::test]
async fn test_create_product_rejects_invalid_input() {
    let mut store = TestStore::new();

    let response = store
        .post_form("/products/create/", "name=&description=kept&price=-3")
        .await;
    assert_eq!(response.status(), StatusCode::UNPROCESSABLE_ENTITY);

    let body = body_text(response).await;
    assert!(body.contains("This field is required."));
    assert!(body.contains("greater than zero"));
    assert!(body.contains("kept"));
    assert!(body.contains("value=\"-3\""));

    // Nothing was stored
    assert_eq!(store.get("/products/5").await.status(), StatusCode::SEE_OTHER);
}

#[tokio::test]
async fn test_create_product_rejects_price_the_catalog_cannot_store() {
    let mut store = TestStore::new();

    let response = store
        .post_form("/products/create/", "name=Lamp&description=&price=0.001")
        .await;
    assert_eq!(response.status(), StatusCode::UNPROCESSABLE_ENTITY);
    assert!(body_text(response).await.contains("at most 2 decimal places"));

    let response = store
        .post_form("/products/create/", "name=Lamp&description=&price=100000000")
        .await;
    assert_eq!(response.status(), StatusCode::UNPROCESSABLE_ENTITY);
    assert!(body_text(response).await.contains("less than 100000000"));

    assert_eq!(store.get("/products/5").await.status(), StatusCode::SEE_OTHER);
}

#[tokio::test]
async fn test_create_product_with_missing_fields() {
    let mut store = TestStore::new();
    let response = store.post_form("/products/create/", "").await;
    assert_eq!(response.status(), StatusCode::UNPROCESSABLE_ENTITY);
}

// =============================================================================
// Cart
// =============================================================================

#[tokio::test]
async fn test_fresh_cart_is_empty() {
    let mut store = TestStore::new();
    let response = store.get("/cart/").await;

    assert_eq!(response.status(), StatusCode::OK);
    let body = body_text(response).await;
    assert!(body.contains("Your cart is empty."));
    assert!(body.contains("Chromecast"));
}

#[tokio::test]
async fn test_add_to_cart_and_remove_all() {
    let mut store = TestStore::new();

    let response = store.post_form("/cart/add/1", "").await;
    assert_eq!(response.status(), StatusCode::SEE_OTHER);
    assert_eq!(location(&response), "/cart/");

    let response = store.post_form("/cart/", "product_id=3").await;
    assert_eq!(response.status(), StatusCode::SEE_OTHER);

    let body = body_text(store.get("/cart/").await).await;
    assert!(!body.contains("Your cart is empty."));
    assert!(body.contains("data-cart-item=\"1\""));
    assert!(body.contains("data-cart-item=\"3\""));
    assert!(!body.contains("data-cart-item=\"2\""));

    let response = store.post_form("/cart/removeAll", "").await;
    assert_eq!(response.status(), StatusCode::SEE_OTHER);
    assert_eq!(location(&response), "/cart/");

    let body = body_text(store.get("/cart/").await).await;
    assert!(body.contains("Your cart is empty."));
}

#[tokio::test]
async fn test_unknown_products_are_not_added() {
    let mut store = TestStore::new();

    for request in ["/cart/add/999", "/cart/add/abc"] {
        let response = store.post_form(request, "").await;
        assert_eq!(response.status(), StatusCode::SEE_OTHER);
    }
    store.post_form("/cart/", "product_id=0").await;

    let body = body_text(store.get("/cart/").await).await;
    assert!(body.contains("Your cart is empty."));
}

#[tokio::test]
async fn test_carts_are_per_session() {
    let mut alice = TestStore::new();
    alice.post_form("/cart/add/2", "").await;

    let mut bob = TestStore {
        router: alice.router.clone(),
        cookie: None,
        media: tempfile::tempdir().unwrap(),
    };

    let body = body_text(bob.get("/cart/").await).await;
    assert!(body.contains("Your cart is empty."));
}

// =============================================================================
// Image upload
// =============================================================================

#[tokio::test]
async fn test_image_upload_stores_file_and_shows_it() {
    let mut store = TestStore::new();

    let response = store
        .post_upload("/image/save/", "profile_image", "cat.png", "image/png", PNG)
        .await;
    assert_eq!(response.status(), StatusCode::SEE_OTHER);
    assert_eq!(location(&response), "/image/");

    let files = store.uploaded_files();
    assert_eq!(files.len(), 1);
    let stored_name = files[0].file_name().unwrap().to_str().unwrap().to_owned();
    assert!(stored_name.ends_with("-cat.png"));

    let page = body_text(store.get("/image/").await).await;
    assert!(page.contains(&stored_name));

    let served = store
        .get(&format!("/media/uploaded_images/{stored_name}"))
        .await;
    assert_eq!(served.status(), StatusCode::OK);
    let bytes = axum::body::to_bytes(served.into_body(), usize::MAX)
        .await
        .unwrap();
    assert_eq!(bytes.as_ref(), PNG);
}

#[tokio::test]
async fn test_image_upload_rejects_non_image() {
    let mut store = TestStore::new();

    let response = store
        .post_upload("/image/save/", "profile_image", "notes.txt", "text/plain", b"hi")
        .await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    assert!(body_text(response).await.contains("not an image"));
    assert!(store.uploaded_files().is_empty());
}

#[tokio::test]
async fn test_image_upload_without_file() {
    let mut store = TestStore::new();

    let response = store
        .post_upload("/image/save/", "other_field", "cat.png", "image/png", PNG)
        .await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    assert!(body_text(response).await.contains("no image file was uploaded"));
}

#[tokio::test]
async fn test_image_upload_over_limit_reports_the_limit() {
    let mut store = TestStore::with_config(StoreConfig {
        max_upload_bytes: 256,
        ..StoreConfig::default()
    });
    let mut big = PNG.to_vec();
    big.resize(4096, 0);

    for path in ["/image/save/", "/imagenotdi/save"] {
        let response = store
            .post_upload(path, "profile_image", "huge.png", "image/png", &big)
            .await;
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        let page = body_text(response).await;
        assert!(page.contains("larger than the 256 byte upload limit"));
        assert!(!page.contains("no image file was uploaded"));
    }
    assert!(store.uploaded_files().is_empty());
}

#[tokio::test]
async fn test_inline_upload_shares_the_session_slot() {
    let mut store = TestStore::new();

    let response = store
        .post_upload("/imagenotdi/save", "profile_image", "dog.jpg", "image/jpeg", PNG)
        .await;
    assert_eq!(response.status(), StatusCode::SEE_OTHER);
    assert_eq!(location(&response), "/imagenotdi/");

    let files = store.uploaded_files();
    assert_eq!(files.len(), 1);
    let stored_name = files[0].file_name().unwrap().to_str().unwrap().to_owned();

    let inline_page = body_text(store.get("/imagenotdi/").await).await;
    assert!(inline_page.contains(&stored_name));

    let injected_page = body_text(store.get("/image/").await).await;
    assert!(injected_page.contains(&stored_name));
}
