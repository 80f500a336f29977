use std::fmt::Display;

use serde::{Deserialize, Deserializer, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;

use crate::error::TodoError;

/// Opaque identifier for todos and attachments.
///
/// Never empty or whitespace-only. Comparison is on the raw bytes, so
/// `"abc"` and `"ABC "` are different identifiers.
#[derive(Clone, Debug, Eq, PartialEq, Hash, Serialize, ToSchema)]
#[serde(transparent)]
pub struct Identifier(String);

impl Identifier {
    pub fn new(value: impl Into<String>) -> Result<Self, TodoError> {
        let value = value.into();
        if value.trim().is_empty() {
            return Err(TodoError::validation("Identifier cannot be empty"));
        }
        Ok(Self(value))
    }

    /// A fresh random identifier.
    pub fn generate() -> Self {
        Self(Uuid::new_v4().to_string())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn into_inner(self) -> String {
        self.0
    }
}

impl Display for Identifier {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

impl AsRef<str> for Identifier {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl TryFrom<String> for Identifier {
    type Error = TodoError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Identifier::new(value)
    }
}

impl TryFrom<&str> for Identifier {
    type Error = TodoError;

    fn try_from(value: &str) -> Result<Self, Self::Error> {
        Identifier::new(value)
    }
}

impl<'de> Deserialize<'de> for Identifier {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let value = String::deserialize(deserializer)?;
        Identifier::new(value).map_err(serde::de::Error::custom)
    }
}
