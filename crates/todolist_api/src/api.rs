//! Typed request/response API.
//!
//! # Responsibility
//! - Expose the five todo operations to presentation layers.
//! - Own database path configuration for the process.
//!
//! # Invariants
//! - Every call opens the database, runs one handler, and closes it.
//! - Calls never panic; failures are returned as `ApiError`.

use crate::error::{ApiError, ApiResult};
use log::error;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::sync::OnceLock;
use todolist_core::db::open_db;
use todolist_core::{
    CreateTodoInput, DeleteTodoInput, GetTodoInput, ServiceResult, SqliteTodoRepository, Todo,
    TodoService, UpdateTodoInput,
};

const DB_PATH_ENV: &str = "TODOLIST_DB_PATH";
const DEFAULT_DB_FILE_NAME: &str = "todolist.sqlite3";
static DEFAULT_DB_PATH: OnceLock<PathBuf> = OnceLock::new();

/// Result of the delete operation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct DeleteTodoResponse {
    /// `true` when a record was removed, `false` when none matched.
    pub success: bool,
}

/// Entry point for the todo operations against one database file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TodoApi {
    db_path: PathBuf,
}

impl TodoApi {
    pub fn new(db_path: impl Into<PathBuf>) -> Self {
        Self {
            db_path: db_path.into(),
        }
    }

    /// Uses `TODOLIST_DB_PATH` when set and non-blank, otherwise a file in
    /// the system temp directory. Resolved once per process.
    pub fn from_env() -> Self {
        Self::new(resolve_default_db_path())
    }

    pub fn db_path(&self) -> &Path {
        &self.db_path
    }

    /// All records, newest created first.
    pub fn list_todos(&self) -> ApiResult<Vec<Todo>> {
        self.with_service(|service| service.list_todos())
    }

    /// The record with `input.id`, or `None`.
    pub fn get_todo(&self, input: GetTodoInput) -> ApiResult<Option<Todo>> {
        self.with_service(|service| service.get_todo(input))
    }

    pub fn create_todo(&self, input: &CreateTodoInput) -> ApiResult<Todo> {
        self.with_service(|service| service.create_todo(input))
    }

    /// # Errors
    /// - `ApiError::NotFound` when no record has `input.id`.
    pub fn update_todo(&self, input: &UpdateTodoInput) -> ApiResult<Todo> {
        self.with_service(|service| service.update_todo(input))
    }

    pub fn delete_todo(&self, input: DeleteTodoInput) -> ApiResult<DeleteTodoResponse> {
        self.with_service(|service| service.delete_todo(input))
            .map(|success| DeleteTodoResponse { success })
    }

    fn with_service<T>(
        &self,
        f: impl FnOnce(&TodoService<SqliteTodoRepository<'_>>) -> ServiceResult<T>,
    ) -> ApiResult<T> {
        let conn = open_db(&self.db_path).map_err(|err| {
            error!("event=api_call module=api status=error error_code=db_open_failed");
            ApiError::Storage(format!("todo DB open failed: {err}"))
        })?;
        let repo = SqliteTodoRepository::try_new(&conn)
            .map_err(|err| ApiError::Storage(format!("todo repo init failed: {err}")))?;
        let service = TodoService::new(repo);
        f(&service).map_err(ApiError::from)
    }
}

fn resolve_default_db_path() -> PathBuf {
    DEFAULT_DB_PATH
        .get_or_init(|| {
            if let Ok(raw) = std::env::var(DB_PATH_ENV) {
                let trimmed = raw.trim();
                if !trimmed.is_empty() {
                    return PathBuf::from(trimmed);
                }
            }
            std::env::temp_dir().join(DEFAULT_DB_FILE_NAME)
        })
        .clone()
}
