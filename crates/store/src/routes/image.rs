//! Image upload route handlers.
//!
//! Two flavours of the same page. The injected flavour receives its
//! [`ImageStorage`] from the router, so the backend can be swapped without
//! touching the handler. The inline flavour builds a [`LocalImageStorage`]
//! itself on every request. Both remember the last uploaded image in the
//! same session slot.

use std::sync::Arc;

use askama::Template;
use askama_web::WebTemplate;
use axum::{
    Extension,
    extract::{Multipart, State, multipart::MultipartError},
    http::StatusCode,
    response::{IntoResponse, Redirect, Response},
};
use tracing::instrument;

use crate::error::{AppError, Result, add_breadcrumb};
use crate::filters;
use crate::models::StoreSession;
use crate::state::AppState;
use crate::storage::{ImageStorage, ImageUpload, LocalImageStorage, StorageError};

/// Multipart field carrying the uploaded file.
pub const UPLOAD_FIELD: &str = "profile_image";

/// Paths for one flavour of the upload page.
#[derive(Debug, Clone, Copy)]
pub struct UploadPage {
    pub heading: &'static str,
    pub index_path: &'static str,
    pub save_path: &'static str,
}

/// Upload page backed by an injected storage.
pub const INJECTED: UploadPage = UploadPage {
    heading: "Upload an image",
    index_path: "/image/",
    save_path: "/image/save/",
};

/// Upload page that builds its own local storage.
pub const INLINE: UploadPage = UploadPage {
    heading: "Upload an image (local storage)",
    index_path: "/imagenotdi/",
    save_path: "/imagenotdi/save",
};

/// Image upload page template.
#[derive(Template, WebTemplate)]
#[template(path = "images/index.html")]
pub struct ImageTemplate {
    pub title: &'static str,
    pub subtitle: &'static str,
    pub save_path: &'static str,
    pub field: &'static str,
    pub image_url: Option<String>,
    pub error: Option<String>,
}

impl ImageTemplate {
    fn new(page: UploadPage, image_url: Option<String>, error: Option<String>) -> Self {
        Self {
            title: "Image - Online Store",
            subtitle: page.heading,
            save_path: page.save_path,
            field: UPLOAD_FIELD,
            image_url,
            error,
        }
    }
}

/// Display the upload page with the last uploaded image.
///
/// # Errors
///
/// Returns an error if the session cannot be read.
#[instrument(skip(session))]
pub async fn index(session: StoreSession) -> Result<impl IntoResponse> {
    render_page(INJECTED, &session).await
}

/// Store an upload through the injected storage.
///
/// # Errors
///
/// Returns an error if the session cannot be accessed or the storage fails.
#[instrument(skip_all)]
pub async fn save(
    State(state): State<AppState>,
    session: StoreSession,
    Extension(storage): Extension<Arc<dyn ImageStorage>>,
    multipart: Multipart,
) -> Result<Response> {
    store_upload(INJECTED, &state, storage.as_ref(), &session, multipart).await
}

/// Display the inline-storage upload page.
///
/// # Errors
///
/// Returns an error if the session cannot be read.
#[instrument(skip(session))]
pub async fn index_inline(session: StoreSession) -> Result<impl IntoResponse> {
    render_page(INLINE, &session).await
}

/// Store an upload through a storage built for this request.
///
/// # Errors
///
/// Returns an error if the session cannot be accessed or the storage fails.
#[instrument(skip_all)]
pub async fn save_inline(
    State(state): State<AppState>,
    session: StoreSession,
    multipart: Multipart,
) -> Result<Response> {
    let storage = LocalImageStorage::from_config(state.config());
    store_upload(INLINE, &state, &storage, &session, multipart).await
}

async fn render_page(page: UploadPage, session: &StoreSession) -> Result<ImageTemplate> {
    let image_url = session.last_image_url().await?;
    Ok(ImageTemplate::new(page, image_url, None))
}

/// Save the uploaded file and redirect back to the page.
///
/// Client mistakes re-render the page with a message and a 400 status,
/// leaving the session untouched.
async fn store_upload(
    page: UploadPage,
    state: &AppState,
    storage: &dyn ImageStorage,
    session: &StoreSession,
    multipart: Multipart,
) -> Result<Response> {
    let stored = match read_upload(multipart, state.config().max_upload_bytes).await {
        Ok(upload) => storage.store(upload).await,
        Err(err) => Err(err),
    };

    let url = match stored {
        Ok(url) => url,
        Err(err) if err.is_client_error() => {
            tracing::debug!(error = %err, "Rejected image upload");
            let image_url = session.last_image_url().await?;
            let body = ImageTemplate::new(page, image_url, Some(err.to_string()));
            return Ok((StatusCode::BAD_REQUEST, body).into_response());
        }
        Err(err) => return Err(AppError::Storage(err)),
    };

    session.set_last_image_url(url.clone()).await?;
    add_breadcrumb("image", "Uploaded image", &[("url", url.as_str())]);
    tracing::info!(%url, "Image uploaded");

    Ok(Redirect::to(page.index_path).into_response())
}

/// Pull the upload field out of a multipart body.
///
/// A body over `limit` bytes is reported as too large. Any other body that
/// cannot be parsed is treated the same as one without a file.
async fn read_upload(
    mut multipart: Multipart,
    limit: usize,
) -> std::result::Result<ImageUpload, StorageError> {
    loop {
        let field = match multipart.next_field().await {
            Ok(Some(field)) => field,
            Ok(None) => return Err(StorageError::MissingFile),
            Err(err) => {
                tracing::debug!(error = %err, "Malformed multipart body");
                return Err(multipart_error(&err, limit));
            }
        };

        if field.name() != Some(UPLOAD_FIELD) {
            continue;
        }

        let file_name = field.file_name().unwrap_or_default().to_owned();
        let content_type = field.content_type().map(str::to_owned);
        let bytes = field.bytes().await.map_err(|err| {
            tracing::debug!(error = %err, "Failed to read upload field");
            multipart_error(&err, limit)
        })?;

        return Ok(ImageUpload {
            file_name,
            content_type,
            bytes,
        });
    }
}

fn multipart_error(err: &MultipartError, limit: usize) -> StorageError {
    if err.status() == StatusCode::PAYLOAD_TOO_LARGE {
        StorageError::TooLarge { limit }
    } else {
        StorageError::MissingFile
    }
}
