use std::sync::Arc;

use chrono::Utc;
use todo_app_shared::{AttachFileRequest, Attachment, Identifier, TodoError};
use tracing::debug;

use crate::repository::{AttachmentRepository, TodoRepository};

#[derive(Clone)]
pub struct AttachmentService {
    attachments: Arc<dyn AttachmentRepository>,
    todos: Arc<dyn TodoRepository>,
}

impl AttachmentService {
    pub fn new(attachments: Arc<dyn AttachmentRepository>, todos: Arc<dyn TodoRepository>) -> Self {
        Self { attachments, todos }
    }

    /// Records that a stored file belongs to a todo.
    ///
    /// The todo must exist before the file metadata is even looked at.
    pub async fn attach(
        &self,
        todo_id: &str,
        request: AttachFileRequest,
    ) -> Result<Attachment, TodoError> {
        let todo_id = Identifier::new(todo_id)?;
        if self.todos.find_by_id(&todo_id).await?.is_none() {
            return Err(TodoError::not_found("Todo not found"));
        }

        let attachment = Attachment::new(
            Identifier::generate(),
            todo_id,
            request.file_key,
            request.original_filename,
            request.file_size,
            request.content_type,
            Utc::now(),
        )?;
        self.attachments.save(&attachment).await?;
        Ok(attachment)
    }

    /// Newest first.
    pub async fn list_for_todo(&self, todo_id: &str) -> Result<Vec<Attachment>, TodoError> {
        let todo_id = Identifier::new(todo_id)?;
        let attachments = self.attachments.find_by_todo_id(&todo_id).await?;
        debug!(
            "Listed {} attachments for todo {}",
            attachments.len(),
            todo_id
        );
        Ok(attachments)
    }

    /// Removes the attachment record. The blob it points at stays in storage.
    ///
    /// An attachment that belongs to some other todo is reported as not found.
    pub async fn detach(&self, todo_id: &str, attachment_id: &str) -> Result<(), TodoError> {
        let todo_id = Identifier::new(todo_id)?;
        let attachment_id = Identifier::new(attachment_id)?;
        match self.attachments.find_by_id(&attachment_id).await? {
            Some(attachment) if attachment.todo_id() == &todo_id => {}
            Some(_) => {
                debug!(
                    "Attachment {} does not belong to todo {}",
                    attachment_id, todo_id
                );
                return Err(TodoError::not_found("Attachment not found"));
            }
            None => return Err(TodoError::not_found("Attachment not found")),
        }
        self.attachments.delete(&attachment_id).await?;
        Ok(())
    }
}
