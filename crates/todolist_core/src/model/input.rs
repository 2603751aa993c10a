//! Input shapes for the todo handlers.
//!
//! # Responsibility
//! - Describe the wire shape of each operation's input.
//! - Reject malformed input before it reaches storage.
//!
//! # Invariants
//! - Type and presence errors are raised by deserialization.
//! - Content rules (non-empty title) are raised by `validate()`.
//! - In updates, an omitted field means "unchanged" and a `null`
//!   description means "clear". A `null` title or completed flag is a
//!   type error.

use crate::model::todo::{validate_title, TodoId, TodoValidationError};
use serde::{Deserialize, Deserializer, Serialize};

/// Input for `create_todo`.
///
/// `description` must be present on the wire, `null` is allowed.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CreateTodoInput {
    pub title: String,
    #[serde(deserialize_with = "required_nullable")]
    pub description: Option<String>,
}

impl CreateTodoInput {
    pub fn new(title: impl Into<String>, description: Option<String>) -> Self {
        Self {
            title: title.into(),
            description,
        }
    }

    pub fn validate(&self) -> Result<(), TodoValidationError> {
        validate_title(&self.title)
    }
}

/// Input for `update_todo`. Only supplied fields are written.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct UpdateTodoInput {
    pub id: TodoId,
    /// May be omitted but never `null`.
    #[serde(
        default,
        deserialize_with = "present",
        skip_serializing_if = "Option::is_none"
    )]
    pub title: Option<String>,
    /// `None`: unchanged. `Some(None)`: clear. `Some(Some(_))`: replace.
    #[serde(
        default,
        deserialize_with = "present",
        skip_serializing_if = "Option::is_none"
    )]
    pub description: Option<Option<String>>,
    /// May be omitted but never `null`.
    #[serde(
        default,
        deserialize_with = "present",
        skip_serializing_if = "Option::is_none"
    )]
    pub completed: Option<bool>,
}

impl UpdateTodoInput {
    /// Update that touches nothing but `updated_at`.
    pub fn new(id: TodoId) -> Self {
        Self {
            id,
            ..Self::default()
        }
    }

    pub fn with_title(mut self, title: impl Into<String>) -> Self {
        self.title = Some(title.into());
        self
    }

    pub fn with_description(mut self, description: Option<String>) -> Self {
        self.description = Some(description);
        self
    }

    pub fn with_completed(mut self, completed: bool) -> Self {
        self.completed = Some(completed);
        self
    }

    pub fn validate(&self) -> Result<(), TodoValidationError> {
        match self.title.as_deref() {
            Some(title) => validate_title(title),
            None => Ok(()),
        }
    }
}

/// Input for `get_todo`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct GetTodoInput {
    pub id: TodoId,
}

/// Input for `delete_todo`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct DeleteTodoInput {
    pub id: TodoId,
}

fn required_nullable<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    Option::<String>::deserialize(deserializer)
}

fn present<'de, D, T>(deserializer: D) -> Result<Option<T>, D::Error>
where
    D: Deserializer<'de>,
    T: Deserialize<'de>,
{
    T::deserialize(deserializer).map(Some)
}
