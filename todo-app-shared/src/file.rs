use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::error::TodoError;

/// Metadata for an object in blob storage, as reported by a listing.
#[derive(Clone, Debug, Eq, PartialEq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct FileObject {
    pub key: String,
    pub size: u64,
    pub uploaded: DateTime<Utc>,
    pub content_type: String,
    pub etag: String,
}

/// Checks a blob key before it gets anywhere near a store.
pub fn validate_key(key: &str) -> Result<(), TodoError> {
    if key.trim().is_empty() {
        return Err(TodoError::validation("File key cannot be empty"));
    }
    if key.contains("..") || key.contains('/') || key.contains('\\') {
        return Err(TodoError::validation(format!("Invalid file key: {key}")));
    }
    // keys end up in response headers
    if key.chars().any(|c| c.is_control() || c == '"') {
        return Err(TodoError::validation(format!("Invalid file key: {key:?}")));
    }
    Ok(())
}

#[derive(Clone, Debug, Serialize, Deserialize, ToSchema)]
pub struct FileResponse {
    pub file: FileObject,
}

#[derive(Clone, Debug, Serialize, Deserialize, ToSchema)]
pub struct FileListResponse {
    pub files: Vec<FileObject>,
}
