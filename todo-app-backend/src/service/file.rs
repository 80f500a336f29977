use std::path::Path;
use std::sync::Arc;

use todo_app_shared::{validate_key, FileObject, TodoError, MAX_FILE_SIZE};
use tracing::debug;
use uuid::Uuid;

use crate::blob::{BlobStore, StoredFile};

#[derive(Clone)]
pub struct FileService {
    store: Arc<dyn BlobStore>,
}

fn check_size(body: &[u8]) -> Result<(), TodoError> {
    if body.len() as u64 > MAX_FILE_SIZE as u64 {
        return Err(TodoError::validation(format!(
            "File size cannot exceed {MAX_FILE_SIZE} bytes"
        )));
    }
    Ok(())
}

/// A fresh key, keeping the extension of the uploaded filename when it is
/// a safe one.
fn generated_key(filename: Option<&str>) -> String {
    let id = Uuid::new_v4();
    let extension = filename
        .and_then(|name| Path::new(name).extension())
        .and_then(|ext| ext.to_str())
        .filter(|ext| !ext.is_empty() && ext.chars().all(|c| c.is_ascii_alphanumeric()));
    match extension {
        Some(ext) => format!("{id}.{}", ext.to_ascii_lowercase()),
        None => id.to_string(),
    }
}

impl FileService {
    pub fn new(store: Arc<dyn BlobStore>) -> Self {
        Self { store }
    }

    pub async fn upload(
        &self,
        key: &str,
        content_type: &str,
        body: Vec<u8>,
    ) -> Result<FileObject, TodoError> {
        validate_key(key)?;
        check_size(&body)?;
        let object = self.store.put(key, content_type, body).await?;
        debug!("Uploaded file {} ({} bytes)", object.key, object.size);
        Ok(object)
    }

    /// Stores the body under a newly generated key.
    pub async fn upload_generated(
        &self,
        filename: Option<&str>,
        content_type: &str,
        body: Vec<u8>,
    ) -> Result<FileObject, TodoError> {
        self.upload(&generated_key(filename), content_type, body)
            .await
    }

    pub async fn get(&self, key: &str) -> Result<Option<StoredFile>, TodoError> {
        validate_key(key)?;
        self.store.get(key).await
    }

    /// `false` when there was no such file.
    pub async fn delete(&self, key: &str) -> Result<bool, TodoError> {
        validate_key(key)?;
        if !self.store.exists(key).await? {
            debug!("File {} not found for deletion", key);
            return Ok(false);
        }
        self.store.delete(key).await
    }

    pub async fn list(&self) -> Result<Vec<FileObject>, TodoError> {
        self.store.list().await
    }
}
