//! Key-addressed object storage for uploaded file bytes.

use async_trait::async_trait;
use chrono::Utc;
use sha2::{Digest, Sha256};
use todo_app_shared::{FileObject, TodoError};

pub mod fs;
pub mod memory;

pub use fs::FsBlobStore;
pub use memory::MemoryBlobStore;

/// An object and its metadata.
#[derive(Clone, Debug)]
pub struct StoredFile {
    pub object: FileObject,
    pub body: Vec<u8>,
}

#[async_trait]
pub trait BlobStore: Send + Sync {
    /// Stores `body` under `key`, replacing whatever was there.
    async fn put(&self, key: &str, content_type: &str, body: Vec<u8>)
        -> Result<FileObject, TodoError>;

    async fn get(&self, key: &str) -> Result<Option<StoredFile>, TodoError>;

    /// Metadata only, the body is never read.
    async fn head(&self, key: &str) -> Result<Option<FileObject>, TodoError>;

    async fn exists(&self, key: &str) -> Result<bool, TodoError> {
        Ok(self.head(key).await?.is_some())
    }

    /// `true` if something was removed.
    async fn delete(&self, key: &str) -> Result<bool, TodoError>;

    /// Every object, sorted by key.
    async fn list(&self) -> Result<Vec<FileObject>, TodoError>;
}

/// Builds the metadata record for a freshly written object.
pub(crate) fn describe(key: &str, content_type: &str, body: &[u8]) -> FileObject {
    FileObject {
        key: key.to_string(),
        size: body.len() as u64,
        uploaded: Utc::now(),
        content_type: content_type.to_string(),
        etag: format!("{:x}", Sha256::digest(body)),
    }
}
