//! Core domain logic for todolist.
//! This crate owns the record invariants, the store, and the handlers.

pub mod db;
pub mod logging;
pub mod model;
pub mod repo;
pub mod service;

pub use logging::{default_log_level, init_logging, logging_status, LoggingError};
pub use model::input::{CreateTodoInput, DeleteTodoInput, GetTodoInput, UpdateTodoInput};
pub use model::todo::{Todo, TodoId, TodoValidationError};
pub use repo::todo_repo::{RepoError, RepoResult, SqliteTodoRepository, TodoRepository};
pub use service::todo_service::{ServiceResult, TodoService, TodoServiceError};

/// Returns the core crate version.
pub fn core_version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}
