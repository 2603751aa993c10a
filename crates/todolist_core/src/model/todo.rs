//! Todo record model.
//!
//! # Responsibility
//! - Define the stored todo record shared by every layer.
//! - Enforce record-level invariants on read and write paths.
//!
//! # Invariants
//! - `id` is assigned by the store and never reused while the row exists.
//! - `title` is never empty.
//! - `updated_at` is never earlier than `created_at`.

use serde::{Deserialize, Serialize};
use std::error::Error;
use std::fmt::{Display, Formatter};

/// Store-assigned record identifier (SQLite rowid).
pub type TodoId = i64;

/// Record-level validation failures.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TodoValidationError {
    /// Title must contain at least one character.
    EmptyTitle,
    /// `updated_at` is earlier than `created_at`.
    InvalidTimestamps { created_at: i64, updated_at: i64 },
}

impl Display for TodoValidationError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::EmptyTitle => write!(f, "title must not be empty"),
            Self::InvalidTimestamps {
                created_at,
                updated_at,
            } => write!(
                f,
                "updated_at ({updated_at}) must be >= created_at ({created_at})"
            ),
        }
    }
}

impl Error for TodoValidationError {}

/// One todo item as stored.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Todo {
    pub id: TodoId,
    pub title: String,
    pub description: Option<String>,
    pub completed: bool,
    /// Unix epoch milliseconds, set once at creation.
    pub created_at: i64,
    /// Unix epoch milliseconds, refreshed on every mutation.
    pub updated_at: i64,
}

impl Todo {
    /// Checks record invariants.
    pub fn validate(&self) -> Result<(), TodoValidationError> {
        validate_title(&self.title)?;
        if self.updated_at < self.created_at {
            return Err(TodoValidationError::InvalidTimestamps {
                created_at: self.created_at,
                updated_at: self.updated_at,
            });
        }
        Ok(())
    }

    /// Whether the record was mutated after creation.
    pub fn was_updated(&self) -> bool {
        self.updated_at != self.created_at
    }
}

/// Shared title rule for records and inputs.
pub fn validate_title(title: &str) -> Result<(), TodoValidationError> {
    if title.is_empty() {
        return Err(TodoValidationError::EmptyTitle);
    }
    Ok(())
}

/// Current wall-clock time in epoch milliseconds.
pub fn now_epoch_ms() -> i64 {
    chrono::Utc::now().timestamp_millis()
}
