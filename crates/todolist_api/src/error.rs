use std::error::Error;
use std::fmt::{Display, Formatter};
use todolist_core::{TodoId, TodoServiceError};

pub type ApiResult<T> = Result<T, ApiError>;

/// Failure reported to presentation-layer callers.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ApiError {
    /// Envelope is not valid JSON or names an unknown procedure.
    InvalidRequest(String),
    /// Input did not satisfy its shape or content rules.
    Validation(String),
    /// Update targeted an id that matches no record.
    NotFound(TodoId),
    /// Store-level fault, passed through as text.
    Storage(String),
}

impl ApiError {
    /// Stable machine-readable code carried in response envelopes.
    pub fn error_code(&self) -> &'static str {
        match self {
            Self::InvalidRequest(_) => "invalid_request",
            Self::Validation(_) => "validation_failed",
            Self::NotFound(_) => "not_found",
            Self::Storage(_) => "storage_error",
        }
    }
}

impl Display for ApiError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::InvalidRequest(message) => write!(f, "invalid request: {message}"),
            Self::Validation(message) => write!(f, "validation failed: {message}"),
            Self::NotFound(id) => write!(f, "Todo with id {id} not found"),
            Self::Storage(message) => write!(f, "storage error: {message}"),
        }
    }
}

impl Error for ApiError {}

impl From<TodoServiceError> for ApiError {
    fn from(value: TodoServiceError) -> Self {
        match value {
            TodoServiceError::Validation(err) => Self::Validation(err.to_string()),
            TodoServiceError::TodoNotFound(id) => Self::NotFound(id),
            other => Self::Storage(other.to_string()),
        }
    }
}
