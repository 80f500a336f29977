//! Persistence contracts for todos and attachments, and their sea-orm implementations.

use async_trait::async_trait;
use todo_app_shared::{Attachment, Identifier, Todo, TodoError};

pub mod attachment;
pub mod todo;

pub use attachment::SeaOrmAttachmentRepository;
pub use todo::SeaOrmTodoRepository;

#[async_trait]
pub trait TodoRepository: Send + Sync {
    async fn save(&self, todo: &Todo) -> Result<(), TodoError>;

    async fn find_by_id(&self, id: &Identifier) -> Result<Option<Todo>, TodoError>;

    /// Newest first.
    async fn find_all(&self) -> Result<Vec<Todo>, TodoError>;

    /// Writes the mutable fields back. `false` if the row is gone.
    async fn update(&self, todo: &Todo) -> Result<bool, TodoError>;

    /// `true` if a row was removed.
    async fn delete(&self, id: &Identifier) -> Result<bool, TodoError>;
}

#[async_trait]
pub trait AttachmentRepository: Send + Sync {
    async fn save(&self, attachment: &Attachment) -> Result<(), TodoError>;

    async fn find_by_id(&self, id: &Identifier) -> Result<Option<Attachment>, TodoError>;

    /// Newest first.
    async fn find_by_todo_id(&self, todo_id: &Identifier) -> Result<Vec<Attachment>, TodoError>;

    async fn delete(&self, id: &Identifier) -> Result<bool, TodoError>;

    /// Removes every attachment row owned by the todo, returning how many went.
    async fn delete_by_todo_id(&self, todo_id: &Identifier) -> Result<u64, TodoError>;
}
