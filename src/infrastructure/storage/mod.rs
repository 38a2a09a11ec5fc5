use async_trait::async_trait;
use bytes::Bytes;
use serde::Serialize;
use std::path::Path;

mod s3_storage;

pub use s3_storage::S3ObjectStorage;

/// Error types for object storage operations
#[derive(Debug, thiserror::Error)]
pub enum StorageError {
    #[error("Object not found: {key}")]
    NotFound { key: String },

    #[error("IO error: {message}")]
    IoError { message: String },

    #[error("Object store request failed: {message}")]
    Backend { message: String },
}

impl From<std::io::Error> for StorageError {
    fn from(error: std::io::Error) -> Self {
        StorageError::IoError { message: error.to_string() }
    }
}

/// Summary of one object in the bucket listing
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ObjectSummary {
    pub key: String,
    pub size: i64,
    pub last_modified: Option<String>,
    pub e_tag: Option<String>,
}

/// Trait for object storage operations over a single bucket
#[async_trait]
pub trait ObjectStorage: Send + Sync {
    /// Name of the bucket this storage writes to
    fn bucket(&self) -> &str;

    /// Store bytes under a key, replacing any existing object
    async fn put(&self, key: &str, data: Bytes, content_type: &str) -> Result<(), StorageError>;

    /// Read an object fully into memory
    async fn get(&self, key: &str) -> Result<Bytes, StorageError>;

    /// List every object in the bucket
    async fn list(&self) -> Result<Vec<ObjectSummary>, StorageError>;

    /// Download an object to a local file, returning the number of bytes written
    async fn download(&self, key: &str, destination: &Path) -> Result<u64, StorageError>;

    /// Delete an object. Deleting a missing key succeeds
    async fn delete(&self, key: &str) -> Result<(), StorageError>;

    /// Verify the bucket is reachable
    async fn health_check(&self) -> Result<(), StorageError>;
}

/// Write downloaded bytes to `destination`, creating parent directories
pub async fn write_download(destination: &Path, data: &[u8]) -> Result<u64, StorageError> {
    if let Some(parent) = destination.parent().filter(|p| !p.as_os_str().is_empty()) {
        tokio::fs::create_dir_all(parent).await?;
    }

    tokio::fs::write(destination, data).await?;
    tracing::info!(path = %destination.display(), bytes = data.len(), "Wrote downloaded object");

    Ok(data.len() as u64)
}
