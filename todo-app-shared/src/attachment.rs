use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::error::TodoError;
use crate::identifier::Identifier;

/// Largest accepted upload, 100 MiB.
pub const MAX_FILE_SIZE: i64 = 100 * 1024 * 1024;
pub const MAX_FILENAME_LENGTH: usize = 255;

/// A reference from a todo to an object in blob storage.
///
/// Only ever exists in a valid state: the constructor rejects bad metadata.
#[derive(Clone, Debug)]
pub struct Attachment {
    id: Identifier,
    todo_id: Identifier,
    file_key: String,
    original_filename: String,
    file_size: i64,
    content_type: String,
    created_at: DateTime<Utc>,
}

impl Attachment {
    pub fn new(
        id: Identifier,
        todo_id: Identifier,
        file_key: String,
        original_filename: String,
        file_size: i64,
        content_type: String,
        created_at: DateTime<Utc>,
    ) -> Result<Self, TodoError> {
        if file_key.trim().is_empty() {
            return Err(TodoError::validation("File key cannot be empty"));
        }
        if original_filename.trim().is_empty() {
            return Err(TodoError::validation("Filename cannot be empty"));
        }
        if original_filename.chars().count() > MAX_FILENAME_LENGTH {
            return Err(TodoError::validation(format!(
                "Filename cannot be longer than {MAX_FILENAME_LENGTH} characters"
            )));
        }
        if file_size < 0 {
            return Err(TodoError::validation("File size cannot be negative"));
        }
        if file_size > MAX_FILE_SIZE {
            return Err(TodoError::validation(format!(
                "File size cannot exceed {MAX_FILE_SIZE} bytes"
            )));
        }
        if content_type.trim().is_empty() {
            return Err(TodoError::validation("Content type cannot be empty"));
        }

        Ok(Self {
            id,
            todo_id,
            file_key,
            original_filename,
            file_size,
            content_type,
            created_at,
        })
    }

    pub fn id(&self) -> &Identifier {
        &self.id
    }

    pub fn todo_id(&self) -> &Identifier {
        &self.todo_id
    }

    pub fn file_key(&self) -> &str {
        &self.file_key
    }

    pub fn original_filename(&self) -> &str {
        &self.original_filename
    }

    pub fn file_size(&self) -> i64 {
        self.file_size
    }

    pub fn content_type(&self) -> &str {
        &self.content_type
    }

    pub fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }
}

impl PartialEq for Attachment {
    fn eq(&self, other: &Self) -> bool {
        self.id == other.id
    }
}

impl Eq for Attachment {}

#[derive(Clone, Debug, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct AttachFileRequest {
    pub file_key: String,
    pub original_filename: String,
    pub file_size: i64,
    pub content_type: String,
}

#[derive(Clone, Debug, Eq, PartialEq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct AttachmentDto {
    pub id: String,
    pub todo_id: String,
    pub file_key: String,
    pub original_filename: String,
    pub file_size: i64,
    pub content_type: String,
    pub created_at: DateTime<Utc>,
}

impl From<&Attachment> for AttachmentDto {
    fn from(attachment: &Attachment) -> Self {
        Self {
            id: attachment.id.to_string(),
            todo_id: attachment.todo_id.to_string(),
            file_key: attachment.file_key.clone(),
            original_filename: attachment.original_filename.clone(),
            file_size: attachment.file_size,
            content_type: attachment.content_type.clone(),
            created_at: attachment.created_at,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn build(filename: &str, size: i64, content_type: &str) -> Result<Attachment, TodoError> {
        Attachment::new(
            Identifier::generate(),
            Identifier::generate(),
            "some-key".to_string(),
            filename.to_string(),
            size,
            content_type.to_string(),
            Utc::now(),
        )
    }

    #[test]
    fn test_size_boundary() {
        assert!(build("a.bin", 0, "application/octet-stream").is_ok());
        assert!(build("a.bin", 104_857_600, "application/octet-stream").is_ok());
        assert!(matches!(
            build("a.bin", 104_857_601, "application/octet-stream"),
            Err(TodoError::Validation(_))
        ));
        assert!(matches!(
            build("a.bin", -1, "application/octet-stream"),
            Err(TodoError::Validation(_))
        ));
    }

    #[test]
    fn test_filename_rules() {
        assert!(build("", 1, "text/plain").is_err());
        assert!(build("   ", 1, "text/plain").is_err());
        assert!(build(&"a".repeat(255), 1, "text/plain").is_ok());
        assert!(build(&"a".repeat(256), 1, "text/plain").is_err());
    }

    #[test]
    fn test_content_type_required() {
        assert!(matches!(
            build("a.txt", 1, ""),
            Err(TodoError::Validation(_))
        ));
    }

    #[test]
    fn test_equality_by_id() {
        let a = build("a.txt", 1, "text/plain").unwrap();
        let mut b = build("b.txt", 2, "text/csv").unwrap();
        assert_ne!(a, b);
        b.id = a.id.clone();
        assert_eq!(a, b);
    }

    #[test]
    fn test_dto_is_camel_case() {
        let a = build("a.txt", 12, "text/plain").unwrap();
        let json = serde_json::to_value(AttachmentDto::from(&a)).unwrap();
        assert_eq!(json["originalFilename"], "a.txt");
        assert_eq!(json["fileSize"], 12);
        assert_eq!(json["todoId"], a.todo_id().to_string());
        assert!(json.get("createdAt").is_some());
    }
}
