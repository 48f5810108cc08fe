//! Listing photo uploads: object naming, content-type checks and a filesystem store.

use std::path::{Path, PathBuf};

use async_trait::async_trait;
use serde::Serialize;
use tracing::info;
use uuid::Uuid;

use crate::config::ImageStoreConfig;
use crate::error::ValidationError;

/// An uploaded object and the URL the public site should use for it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct StoredImage {
    pub name: String,
    pub url: String,
}

#[derive(Debug, thiserror::Error)]
pub enum ImageStoreError {
    #[error(transparent)]
    Validation(#[from] ValidationError),
    #[error("failed to write image `{name}`: {source}")]
    Io {
        name: String,
        #[source]
        source: std::io::Error,
    },
}

/// Object storage for listing images.
#[async_trait]
pub trait ImageStore: Send + Sync {
    async fn put(
        &self,
        object_name: &str,
        bytes: &[u8],
        content_type: &str,
    ) -> Result<StoredImage, ImageStoreError>;

    fn public_url(&self, object_name: &str) -> String;
}

/// Name for a new upload: a fresh UUID plus the original extension, along with the
/// content type guessed from `filename`. Anything that is not an image is rejected.
pub fn object_name_for(filename: &str) -> Result<(String, mime::Mime), ValidationError> {
    let extension = Path::new(filename.trim())
        .extension()
        .and_then(|ext| ext.to_str())
        .filter(|ext| !ext.is_empty())
        .map(str::to_ascii_lowercase)
        .ok_or(ValidationError::Malformed { field: "filename" })?;

    let content_type = mime_guess::from_ext(&extension)
        .first()
        .filter(|guess| guess.type_() == mime::IMAGE)
        .ok_or_else(|| ValidationError::Unrecognised {
            field: "image type",
            value: extension.clone(),
        })?;

    Ok((format!("{}.{extension}", Uuid::new_v4()), content_type))
}

/// Writes objects below a root directory and serves them from a base URL.
#[derive(Debug, Clone)]
pub struct LocalImageStore {
    root: PathBuf,
    public_base_url: String,
}

impl LocalImageStore {
    pub fn new(root: impl Into<PathBuf>, public_base_url: impl Into<String>) -> Self {
        Self {
            root: root.into(),
            public_base_url: public_base_url.into().trim_end_matches('/').to_string(),
        }
    }

    pub fn from_config(config: &ImageStoreConfig) -> Self {
        Self::new(config.root.clone(), config.public_base_url.clone())
    }
}

#[async_trait]
impl ImageStore for LocalImageStore {
    async fn put(
        &self,
        object_name: &str,
        bytes: &[u8],
        content_type: &str,
    ) -> Result<StoredImage, ImageStoreError> {
        // Names are generated by `object_name_for`; refuse anything that could escape the root.
        if object_name.is_empty() || object_name.contains(['/', '\\']) || object_name.starts_with('.')
        {
            return Err(ValidationError::Malformed { field: "object_name" }.into());
        }

        let io_error = |source| ImageStoreError::Io {
            name: object_name.to_string(),
            source,
        };
        tokio::fs::create_dir_all(&self.root).await.map_err(io_error)?;
        tokio::fs::write(self.root.join(object_name), bytes)
            .await
            .map_err(io_error)?;

        info!(
            object = object_name,
            content_type,
            bytes = bytes.len(),
            "image stored"
        );
        Ok(StoredImage {
            name: object_name.to_string(),
            url: self.public_url(object_name),
        })
    }

    fn public_url(&self, object_name: &str) -> String {
        format!("{}/{}", self.public_base_url, object_name)
    }
}
