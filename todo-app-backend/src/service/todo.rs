use std::sync::Arc;

use todo_app_shared::{CreateTodoRequest, Identifier, Todo, TodoError, UpdateTodoRequest};
use tracing::debug;

use crate::repository::{AttachmentRepository, TodoRepository};

#[derive(Clone)]
pub struct TodoService {
    todos: Arc<dyn TodoRepository>,
    attachments: Arc<dyn AttachmentRepository>,
}

impl TodoService {
    pub fn new(todos: Arc<dyn TodoRepository>, attachments: Arc<dyn AttachmentRepository>) -> Self {
        Self { todos, attachments }
    }

    pub async fn create(&self, request: CreateTodoRequest) -> Result<Todo, TodoError> {
        let todo = Todo::create(Identifier::generate(), &request.title, request.description)?;
        self.todos.save(&todo).await?;
        debug!("Created todo {}", todo.id());
        Ok(todo)
    }

    pub async fn get(&self, id: &str) -> Result<Option<Todo>, TodoError> {
        let id = Identifier::new(id)?;
        self.todos.find_by_id(&id).await
    }

    pub async fn list(&self) -> Result<Vec<Todo>, TodoError> {
        self.todos.find_all().await
    }

    /// `None` when there is no such todo.
    pub async fn update(
        &self,
        id: &str,
        request: UpdateTodoRequest,
    ) -> Result<Option<Todo>, TodoError> {
        let id = Identifier::new(id)?;
        let Some(mut todo) = self.todos.find_by_id(&id).await? else {
            debug!("Todo {} not found for update", id);
            return Ok(None);
        };

        todo.apply_update(request)?;

        // it can vanish between the read and the write
        if !self.todos.update(&todo).await? {
            debug!("Todo {} was deleted during update", id);
            return Ok(None);
        }
        Ok(Some(todo))
    }

    /// `false` when there was nothing to delete.
    pub async fn delete(&self, id: &str) -> Result<bool, TodoError> {
        let id = Identifier::new(id)?;
        if self.todos.find_by_id(&id).await?.is_none() {
            debug!("Todo {} not found for deletion", id);
            return Ok(false);
        }
        let removed = self.attachments.delete_by_todo_id(&id).await?;
        if removed > 0 {
            debug!("Removed {} attachments of todo {}", removed, id);
        }
        self.todos.delete(&id).await
    }
}
