//! Stored-file persistence for uploaded product images.
//!
//! The service layer stores decoded uploads through [`ImageStore`] and keeps
//! the returned URLs in the database; files are written before the database
//! rows and removed again if the surrounding write fails.

use std::fs;
use std::io::Write;
use std::path::PathBuf;

use thiserror::Error;
use uuid::Uuid;

use crate::domain::types::{ImageUrl, TypeConstraintError};

/// A decoded multipart upload: raw bytes plus client-supplied metadata.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UploadedImage {
    pub file_name: Option<String>,
    pub content_type: Option<String>,
    pub bytes: Vec<u8>,
}

/// Errors produced while persisting or removing stored images.
#[derive(Debug, Error)]
pub enum StorageError {
    #[error("failed to write stored file: {0}")]
    Io(#[from] std::io::Error),
    #[error("stored file produced an invalid url: {0}")]
    InvalidUrl(#[from] TypeConstraintError),
}

/// Persists uploaded images and yields retrievable URLs.
pub trait ImageStore {
    fn store(&self, image: &UploadedImage) -> Result<ImageUrl, StorageError>;
    /// Remove a previously stored image. Missing files are not an error.
    fn remove(&self, url: &ImageUrl) -> Result<(), StorageError>;
}

/// Image store writing files below a local media directory.
///
/// Stored files are served statically under `base_url`, so the URL for a file
/// is simply `{base_url}/{file_name}`.
#[derive(Clone)]
pub struct LocalImageStore {
    root: PathBuf,
    base_url: String,
}

impl LocalImageStore {
    pub fn new(root: impl Into<PathBuf>, base_url: impl Into<String>) -> Self {
        Self {
            root: root.into(),
            base_url: base_url.into().trim_end_matches('/').to_string(),
        }
    }

    fn extension_for(image: &UploadedImage) -> &str {
        image
            .file_name
            .as_deref()
            .and_then(|name| name.rsplit_once('.').map(|(_, ext)| ext))
            .filter(|ext| {
                !ext.is_empty() && ext.len() <= 8 && ext.chars().all(|c| c.is_ascii_alphanumeric())
            })
            .unwrap_or("img")
    }
}

impl ImageStore for LocalImageStore {
    fn store(&self, image: &UploadedImage) -> Result<ImageUrl, StorageError> {
        fs::create_dir_all(&self.root)?;

        let file_name = format!("{}.{}", Uuid::new_v4(), Self::extension_for(image));
        let path = self.root.join(&file_name);

        let mut file = fs::File::create(&path)?;
        file.write_all(&image.bytes)?;

        Ok(ImageUrl::new(format!("{}/{}", self.base_url, file_name))?)
    }

    fn remove(&self, url: &ImageUrl) -> Result<(), StorageError> {
        let Some((_, file_name)) = url.as_str().rsplit_once('/') else {
            return Ok(());
        };

        match fs::remove_file(self.root.join(file_name)) {
            Ok(()) => Ok(()),
            Err(err) if err.kind() == std::io::ErrorKind::NotFound => Ok(()),
            Err(err) => Err(err.into()),
        }
    }
}
