use std::collections::BTreeMap;

use async_trait::async_trait;
use todo_app_shared::{validate_key, FileObject, TodoError};
use tokio::sync::RwLock;

use super::{describe, BlobStore, StoredFile};

/// Keeps objects in process memory. Everything is gone on restart.
#[derive(Default)]
pub struct MemoryBlobStore {
    objects: RwLock<BTreeMap<String, StoredFile>>,
}

impl MemoryBlobStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl BlobStore for MemoryBlobStore {
    async fn put(
        &self,
        key: &str,
        content_type: &str,
        body: Vec<u8>,
    ) -> Result<FileObject, TodoError> {
        validate_key(key)?;
        let object = describe(key, content_type, &body);
        self.objects.write().await.insert(
            key.to_string(),
            StoredFile {
                object: object.clone(),
                body,
            },
        );
        Ok(object)
    }

    async fn get(&self, key: &str) -> Result<Option<StoredFile>, TodoError> {
        validate_key(key)?;
        Ok(self.objects.read().await.get(key).cloned())
    }

    async fn head(&self, key: &str) -> Result<Option<FileObject>, TodoError> {
        validate_key(key)?;
        Ok(self
            .objects
            .read()
            .await
            .get(key)
            .map(|stored| stored.object.clone()))
    }

    async fn delete(&self, key: &str) -> Result<bool, TodoError> {
        validate_key(key)?;
        Ok(self.objects.write().await.remove(key).is_some())
    }

    async fn list(&self) -> Result<Vec<FileObject>, TodoError> {
        Ok(self
            .objects
            .read()
            .await
            .values()
            .map(|stored| stored.object.clone())
            .collect())
    }
}
