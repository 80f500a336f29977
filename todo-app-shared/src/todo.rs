use chrono::{DateTime, SecondsFormat, TimeDelta, Utc};
use serde::{Deserialize, Deserializer, Serialize};
use utoipa::ToSchema;

use crate::error::TodoError;
use crate::identifier::Identifier;
use crate::status::Status;

/// A task with a title, an optional description and a completion status.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct Todo {
    id: Identifier,
    title: String,
    description: Option<String>,
    status: Status,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

fn validate_title(title: &str) -> Result<String, TodoError> {
    let title = title.trim();
    if title.is_empty() {
        return Err(TodoError::validation("Title cannot be empty"));
    }
    Ok(title.to_string())
}

/// Timestamps are stored fixed-width so that sorting the text sorts by time.
pub fn format_timestamp(value: &DateTime<Utc>) -> String {
    value.to_rfc3339_opts(SecondsFormat::Nanos, true)
}

pub fn parse_timestamp(value: &str) -> Result<DateTime<Utc>, TodoError> {
    DateTime::parse_from_rfc3339(value)
        .map(|dt| dt.with_timezone(&Utc))
        .map_err(|err| TodoError::DatabaseError(format!("Invalid timestamp {value:?}: {err}")))
}

impl Todo {
    /// Builds a new pending todo. The title is trimmed and must not be empty.
    pub fn create(
        id: Identifier,
        title: &str,
        description: Option<String>,
    ) -> Result<Self, TodoError> {
        let title = validate_title(title)?;
        let now = Utc::now();
        Ok(Self {
            id,
            title,
            description,
            status: Status::Pending,
            created_at: now,
            updated_at: now,
        })
    }

    /// Rebuilds a todo from a stored row without re-running creation checks.
    pub fn from_persisted(row: PersistedTodo) -> Result<Self, TodoError> {
        let id = Identifier::new(row.id).map_err(|err| {
            TodoError::DatabaseError(format!("Stored todo has an invalid id: {err}"))
        })?;
        Ok(Self {
            id,
            title: row.title,
            description: row.description,
            status: Status::from_flag(row.completed),
            created_at: parse_timestamp(&row.created_at)?,
            updated_at: parse_timestamp(&row.updated_at)?,
        })
    }

    pub fn to_persisted(&self) -> PersistedTodo {
        PersistedTodo {
            id: self.id.to_string(),
            title: self.title.clone(),
            description: self.description.clone(),
            completed: self.status.as_flag(),
            created_at: format_timestamp(&self.created_at),
            updated_at: format_timestamp(&self.updated_at),
        }
    }

    pub fn id(&self) -> &Identifier {
        &self.id
    }

    pub fn title(&self) -> &str {
        &self.title
    }

    pub fn description(&self) -> Option<&str> {
        self.description.as_deref()
    }

    pub fn status(&self) -> Status {
        self.status
    }

    pub fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }

    pub fn updated_at(&self) -> DateTime<Utc> {
        self.updated_at
    }

    pub fn update_title(&mut self, title: &str) -> Result<(), TodoError> {
        self.title = validate_title(title)?;
        self.touch();
        Ok(())
    }

    pub fn update_description(&mut self, description: Option<String>) {
        self.description = description;
        self.touch();
    }

    pub fn complete(&mut self) {
        self.status = Status::Completed;
        self.touch();
    }

    pub fn mark_as_pending(&mut self) {
        self.status = Status::Pending;
        self.touch();
    }

    pub fn toggle_status(&mut self) {
        self.status = self.status.toggle();
        self.touch();
    }

    /// Applies the fields present in `request`, leaving the rest alone.
    ///
    /// The title is checked before anything changes, so a rejected update
    /// leaves the todo as it was.
    pub fn apply_update(&mut self, request: UpdateTodoRequest) -> Result<(), TodoError> {
        if let Some(title) = request.title.as_deref() {
            self.update_title(title)?;
        }
        if let Some(description) = request.description {
            self.update_description(description);
        }
        match request.completed {
            Some(true) => self.complete(),
            Some(false) => self.mark_as_pending(),
            None => {}
        }
        Ok(())
    }

    fn touch(&mut self) {
        let now = Utc::now();
        // the clock can hand back the same instant twice
        self.updated_at = if now > self.updated_at {
            now
        } else {
            self.updated_at + TimeDelta::nanoseconds(1)
        };
    }
}

/// Row shape of a todo in the relational store.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct PersistedTodo {
    pub id: String,
    pub title: String,
    pub description: Option<String>,
    /// 0 for pending, 1 for completed
    pub completed: i32,
    pub created_at: String,
    pub updated_at: String,
}

#[derive(Clone, Debug, Eq, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct TodoDto {
    pub id: String,
    pub title: String,
    pub description: Option<String>,
    pub completed: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl From<&Todo> for TodoDto {
    fn from(todo: &Todo) -> Self {
        Self {
            id: todo.id.to_string(),
            title: todo.title.clone(),
            description: todo.description.clone(),
            completed: todo.status.as_bool(),
            created_at: todo.created_at,
            updated_at: todo.updated_at,
        }
    }
}

impl From<Todo> for TodoDto {
    fn from(todo: Todo) -> Self {
        TodoDto::from(&todo)
    }
}

#[derive(Clone, Debug, Default, Serialize, Deserialize, ToSchema)]
pub struct CreateTodoRequest {
    pub title: String,
    #[serde(default)]
    pub description: Option<String>,
}

/// Partial update. Absent fields are left unchanged, `"description": null`
/// clears the description.
#[derive(Clone, Debug, Default, Serialize, Deserialize, ToSchema)]
pub struct UpdateTodoRequest {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(
        default,
        deserialize_with = "present_or_null",
        skip_serializing_if = "Option::is_none"
    )]
    #[schema(value_type = Option<String>)]
    pub description: Option<Option<String>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub completed: Option<bool>,
}

/// Only called when the key is present, so a `null` becomes `Some(None)`.
fn present_or_null<'de, D, T>(deserializer: D) -> Result<Option<Option<T>>, D::Error>
where
    D: Deserializer<'de>,
    T: Deserialize<'de>,
{
    Option::<T>::deserialize(deserializer).map(Some)
}

#[derive(Clone, Debug, Serialize, Deserialize, ToSchema)]
pub struct TodoResponse {
    pub todo: TodoDto,
}

#[derive(Clone, Debug, Serialize, Deserialize, ToSchema)]
pub struct TodoListResponse {
    pub todos: Vec<TodoDto>,
}

#[derive(Clone, Debug, Serialize, Deserialize, ToSchema)]
pub struct MessageResponse {
    pub message: String,
}
