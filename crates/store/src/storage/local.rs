//! Local filesystem image storage.

use std::path::{Path, PathBuf};

use async_trait::async_trait;
use uuid::Uuid;

use super::{ImageStorage, ImageUpload, StorageError};
use crate::config::StoreConfig;

/// Sub-directory of the media root that uploads are written to.
pub const UPLOAD_DIR: &str = "uploaded_images";

/// Stores images as files under a media root.
///
/// Files are written to `<root>/uploaded_images/<uuid>-<name>` and exposed as
/// `<url_prefix>/uploaded_images/<uuid>-<name>`.
#[derive(Debug, Clone)]
pub struct LocalImageStorage {
    root: PathBuf,
    url_prefix: String,
}

impl LocalImageStorage {
    /// Create a storage rooted at `root`, serving files under `url_prefix`.
    #[must_use]
    pub fn new(root: impl Into<PathBuf>, url_prefix: impl Into<String>) -> Self {
        let url_prefix = url_prefix.into().trim_end_matches('/').to_owned();
        Self {
            root: root.into(),
            url_prefix,
        }
    }

    /// Create a storage from the store's media settings.
    #[must_use]
    pub fn from_config(config: &StoreConfig) -> Self {
        Self::new(config.media_root.clone(), config.media_url.clone())
    }

    /// Directory uploads are written to.
    #[must_use]
    pub fn upload_dir(&self) -> PathBuf {
        self.root.join(UPLOAD_DIR)
    }
}

#[async_trait]
impl ImageStorage for LocalImageStorage {
    async fn store(&self, upload: ImageUpload) -> Result<String, StorageError> {
        upload.validate()?;

        let dir = self.upload_dir();
        tokio::fs::create_dir_all(&dir).await?;

        let file_name = format!("{}-{}", Uuid::new_v4().simple(), sanitize(&upload.file_name));
        let path = dir.join(&file_name);
        tokio::fs::write(&path, &upload.bytes).await?;

        tracing::info!(path = %path.display(), bytes = upload.bytes.len(), "Stored uploaded image");

        Ok(format!("{}/{UPLOAD_DIR}/{file_name}", self.url_prefix))
    }
}

/// Reduce a browser-supplied file name to a safe single path component.
fn sanitize(file_name: &str) -> String {
    let base = Path::new(file_name)
        .file_name()
        .and_then(|n| n.to_str())
        .unwrap_or_default();

    // Browsers on Windows may send full paths with backslashes
    let base = base.rsplit('\\').next().unwrap_or_default();

    let cleaned: String = base
        .chars()
        .map(|c| {
            if c.is_ascii_alphanumeric() || matches!(c, '.' | '-' | '_') {
                c
            } else {
                '_'
            }
        })
        .collect();

    let cleaned = cleaned.trim_start_matches('.');
    if cleaned.is_empty() {
        "image".to_owned()
    } else {
        cleaned.to_owned()
    }
}
