use std::fmt::Display;

#[derive(Debug)]
pub enum TodoError {
    /// Input failed a domain rule, maps to a client error.
    Validation(String),
    NotFound(String),
    DatabaseError(String),
    /// Blob storage failure.
    Storage(String),
    IOError(String),
    Serialization(String),
    Configuration(String),
}

impl TodoError {
    pub fn validation(message: impl Into<String>) -> Self {
        TodoError::Validation(message.into())
    }

    pub fn not_found(message: impl Into<String>) -> Self {
        TodoError::NotFound(message.into())
    }
}

impl Display for TodoError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            TodoError::Validation(msg) => write!(f, "{msg}"),
            TodoError::NotFound(msg) => write!(f, "{msg}"),
            TodoError::DatabaseError(msg) => write!(f, "database error: {msg}"),
            TodoError::Storage(msg) => write!(f, "storage error: {msg}"),
            TodoError::IOError(msg) => write!(f, "io error: {msg}"),
            TodoError::Serialization(msg) => write!(f, "serialization error: {msg}"),
            TodoError::Configuration(msg) => write!(f, "configuration error: {msg}"),
        }
    }
}

impl std::error::Error for TodoError {}

impl From<std::io::Error> for TodoError {
    fn from(err: std::io::Error) -> Self {
        TodoError::IOError(err.to_string())
    }
}

impl From<sea_orm::DbErr> for TodoError {
    fn from(err: sea_orm::DbErr) -> Self {
        TodoError::DatabaseError(err.to_string())
    }
}

impl From<serde_json::Error> for TodoError {
    fn from(err: serde_json::Error) -> Self {
        TodoError::Serialization(err.to_string())
    }
}
