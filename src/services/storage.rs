//! Object storage for published lecture videos.
//!
//! DESIGN
//! ======
//! The store is built once in `main` from [`StorageConfig`], shared through
//! `AppState`, and closed with [`ObjectStore::shutdown`] after the HTTP server
//! has drained. Uploads attempted after shutdown fail with
//! [`StorageError::Closed`] instead of racing process exit.

use std::path::{Component, Path, PathBuf};
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

use tracing::info;

use crate::config::StorageConfig;

const GCS_UPLOAD_BASE: &str = "https://storage.googleapis.com/upload/storage/v1/b";
const GCS_PUBLIC_BASE: &str = "https://storage.googleapis.com";
/// URL prefix under which [`LocalStore`] objects are served.
pub const LOCAL_MEDIA_ROUTE: &str = "/media";

// =============================================================================
// ERROR TYPE
// =============================================================================

#[derive(Debug, thiserror::Error)]
pub enum StorageError {
    #[error("storage io failed: {0}")]
    Io(#[from] std::io::Error),
    #[error("invalid object name: {0}")]
    InvalidName(String),
    #[error("storage request failed: {0}")]
    Request(String),
    #[error("storage responded with status {status}: {body}")]
    Status { status: u16, body: String },
    #[error("storage client is shut down")]
    Closed,
}

// =============================================================================
// TRAIT
// =============================================================================

/// Durable object store returning a public URL for each stored object.
#[async_trait::async_trait]
pub trait ObjectStore: Send + Sync {
    /// Store `bytes` under `name` and return the object's public URL.
    ///
    /// # Errors
    ///
    /// Returns a [`StorageError`] if the name is unsafe, the write fails, or
    /// the store has been shut down.
    async fn put(&self, name: &str, bytes: Vec<u8>, content_type: &str) -> Result<String, StorageError>;

    /// Release the store. Later `put` calls fail with [`StorageError::Closed`].
    async fn shutdown(&self);
}

/// Build the process-wide store for `config`.
///
/// # Errors
///
/// Returns an error if the HTTP client cannot be constructed.
pub fn init_store(config: &StorageConfig) -> Result<Arc<dyn ObjectStore>, StorageError> {
    match config {
        StorageConfig::Local { dir, public_base_url } => {
            info!(dir = %dir.display(), "storage: using local directory");
            Ok(Arc::new(LocalStore::new(dir.clone(), public_base_url.clone())))
        }
        StorageConfig::Gcs { bucket, access_token } => {
            info!(%bucket, "storage: using gcs bucket");
            Ok(Arc::new(GcsStore::new(bucket.clone(), access_token.clone())?))
        }
    }
}

/// Reject names that are empty, absolute, or escape the store root.
pub(crate) fn validate_object_name(name: &str) -> Result<&Path, StorageError> {
    let path = Path::new(name);
    let safe = !name.is_empty() && path.components().all(|c| matches!(c, Component::Normal(_)));
    if safe { Ok(path) } else { Err(StorageError::InvalidName(name.to_owned())) }
}

// =============================================================================
// LOCAL
// =============================================================================

/// Stores objects on the local filesystem.
pub struct LocalStore {
    root: PathBuf,
    public_base_url: String,
    closed: AtomicBool,
}

impl LocalStore {
    #[must_use]
    pub fn new(root: PathBuf, public_base_url: String) -> Self {
        Self { root, public_base_url, closed: AtomicBool::new(false) }
    }
}

#[async_trait::async_trait]
impl ObjectStore for LocalStore {
    async fn put(&self, name: &str, bytes: Vec<u8>, _content_type: &str) -> Result<String, StorageError> {
        if self.closed.load(Ordering::Acquire) {
            return Err(StorageError::Closed);
        }
        let relative = validate_object_name(name)?;
        let target = self.root.join(relative);
        if let Some(parent) = target.parent() {
            tokio::fs::create_dir_all(parent).await?;
        }
        tokio::fs::write(&target, bytes).await?;
        Ok(format!("{}{LOCAL_MEDIA_ROUTE}/{name}", self.public_base_url))
    }

    async fn shutdown(&self) {
        self.closed.store(true, Ordering::Release);
        info!("storage: local store closed");
    }
}

// =============================================================================
// GOOGLE CLOUD STORAGE
// =============================================================================

/// Uploads objects to a GCS bucket with a bearer token.
pub struct GcsStore {
    http: reqwest::Client,
    bucket: String,
    access_token: String,
    closed: AtomicBool,
}

impl GcsStore {
    /// # Errors
    ///
    /// Returns an error if the HTTP client fails to build.
    pub fn new(bucket: String, access_token: String) -> Result<Self, StorageError> {
        let http = reqwest::Client::builder()
            .build()
            .map_err(|e| StorageError::Request(e.to_string()))?;
        Ok(Self { http, bucket, access_token, closed: AtomicBool::new(false) })
    }
}

pub(crate) fn gcs_upload_url(bucket: &str) -> String {
    format!("{GCS_UPLOAD_BASE}/{bucket}/o")
}

pub(crate) fn gcs_public_url(bucket: &str, name: &str) -> String {
    format!("{GCS_PUBLIC_BASE}/{bucket}/{name}")
}

#[async_trait::async_trait]
impl ObjectStore for GcsStore {
    async fn put(&self, name: &str, bytes: Vec<u8>, content_type: &str) -> Result<String, StorageError> {
        if self.closed.load(Ordering::Acquire) {
            return Err(StorageError::Closed);
        }
        validate_object_name(name)?;

        let response = self
            .http
            .post(gcs_upload_url(&self.bucket))
            .query(&[("uploadType", "media"), ("name", name), ("predefinedAcl", "publicRead")])
            .bearer_auth(&self.access_token)
            .header(reqwest::header::CONTENT_TYPE, content_type)
            .body(bytes)
            .send()
            .await
            .map_err(|e| StorageError::Request(e.to_string()))?;

        if !response.status().is_success() {
            let status = response.status().as_u16();
            let body = response.text().await.unwrap_or_default();
            return Err(StorageError::Status { status, body });
        }

        Ok(gcs_public_url(&self.bucket, name))
    }

    async fn shutdown(&self) {
        self.closed.store(true, Ordering::Release);
        info!(bucket = %self.bucket, "storage: gcs store closed");
    }
}

#[cfg(test)]
#[path = "storage_test.rs"]
mod tests;
