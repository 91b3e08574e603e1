//! Image storage strategies.
//!
//! An [`ImageStorage`] persists the bytes of an uploaded image and returns a
//! URL the browser can load it from. Handlers depend on the trait; the
//! concrete strategy is chosen where routes are registered.

mod local;

pub use local::LocalImageStorage;

use async_trait::async_trait;
use axum::body::Bytes;
use thiserror::Error;

/// Errors that can occur while storing an upload.
#[derive(Debug, Error)]
pub enum StorageError {
    /// The request carried no file, or an empty one.
    #[error("no image file was uploaded")]
    MissingFile,

    /// The upload is not an image.
    #[error("uploaded file is not an image ({0})")]
    NotAnImage(String),

    /// The request body exceeded the upload limit.
    #[error("image is larger than the {limit} byte upload limit")]
    TooLarge { limit: usize },

    /// Writing to the backing store failed.
    #[error("failed to write image: {0}")]
    Io(#[from] std::io::Error),
}

impl StorageError {
    /// Whether the error was caused by the request rather than the server.
    #[must_use]
    pub const fn is_client_error(&self) -> bool {
        matches!(
            self,
            Self::MissingFile | Self::NotAnImage(_) | Self::TooLarge { .. }
        )
    }
}

/// An uploaded file taken from a multipart request.
#[derive(Debug, Clone)]
pub struct ImageUpload {
    /// File name as sent by the browser.
    pub file_name: String,
    /// Declared MIME type, if any.
    pub content_type: Option<String>,
    /// File contents.
    pub bytes: Bytes,
}

impl ImageUpload {
    /// Reject uploads that are empty or not declared as images.
    ///
    /// # Errors
    ///
    /// Returns `StorageError::MissingFile` for an empty upload and
    /// `StorageError::NotAnImage` for a non-`image/*` content type.
    pub fn validate(&self) -> Result<(), StorageError> {
        if self.bytes.is_empty() || self.file_name.trim().is_empty() {
            return Err(StorageError::MissingFile);
        }

        match self.content_type.as_deref() {
            Some(ct) if ct.starts_with("image/") => Ok(()),
            Some(ct) => Err(StorageError::NotAnImage(ct.to_owned())),
            None => Err(StorageError::NotAnImage("unknown type".to_owned())),
        }
    }
}

/// Capability to persist an uploaded image and return its URL.
#[async_trait]
pub trait ImageStorage: Send + Sync {
    /// Store the upload and return an addressable reference to it.
    async fn store(&self, upload: ImageUpload) -> Result<String, StorageError>;
}

#[cfg(test)]
mod tests {
    use super::*;

    fn upload(name: &str, content_type: Option<&str>, bytes: &'static [u8]) -> ImageUpload {
        ImageUpload {
            file_name: name.to_owned(),
            content_type: content_type.map(str::to_owned),
            bytes: Bytes::from_static(bytes),
        }
    }

    #[test]
    fn test_validate_accepts_image() {
        assert!(upload("a.png", Some("image/png"), b"\x89PNG").validate().is_ok());
    }

    #[test]
    fn test_validate_rejects_empty() {
        assert!(matches!(
            upload("a.png", Some("image/png"), b"").validate(),
            Err(StorageError::MissingFile)
        ));
        assert!(matches!(
            upload("", Some("image/png"), b"x").validate(),
            Err(StorageError::MissingFile)
        ));
    }

    #[test]
    fn test_validate_rejects_non_image() {
        let err = upload("notes.txt", Some("text/plain"), b"hi")
            .validate()
            .unwrap_err();
        assert!(matches!(err, StorageError::NotAnImage(_)));
        assert!(err.is_client_error());
    }

    #[test]
    fn test_too_large_is_client_error_naming_limit() {
        let err = StorageError::TooLarge { limit: 1024 };
        assert!(err.is_client_error());
        assert!(err.to_string().contains("1024 byte"));
    }

    #[test]
    fn test_io_error_is_server_side() {
        let err = StorageError::Io(std::io::Error::other("disk full"));
        assert!(!err.is_client_error());
    }
}
