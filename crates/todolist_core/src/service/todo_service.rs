//! Todo use-case service: the five CRUD handlers.
//!
//! # Responsibility
//! - Validate input, delegate to the repository, and map absence to a
//!   defined result per operation.
//!
//! # Invariants
//! - Validation runs before any repository call.
//! - `get_todo` reports absence as `Ok(None)`.
//! - `update_todo` reports absence as `TodoNotFound`.
//! - `delete_todo` reports absence as `Ok(false)`.
//! - Created and updated records are returned as read back from storage.

use crate::model::input::{CreateTodoInput, DeleteTodoInput, GetTodoInput, UpdateTodoInput};
use crate::model::todo::{Todo, TodoId, TodoValidationError};
use crate::repo::todo_repo::{RepoError, TodoRepository};
use log::{debug, error, info, warn};
use std::error::Error;
use std::fmt::{Display, Formatter};

/// Service error for todo use-cases.
#[derive(Debug)]
pub enum TodoServiceError {
    /// Input failed shape or content rules.
    Validation(TodoValidationError),
    /// Target record does not exist.
    TodoNotFound(TodoId),
    /// Persistence-layer failure, passed through unchanged.
    Repo(RepoError),
    /// Write succeeded but read-back did not find the row.
    InconsistentState(&'static str),
}

impl TodoServiceError {
    /// Stable machine-readable code for logs and response envelopes.
    pub fn error_code(&self) -> &'static str {
        match self {
            Self::Validation(_) => "validation_failed",
            Self::TodoNotFound(_) => "not_found",
            Self::Repo(_) | Self::InconsistentState(_) => "storage_error",
        }
    }
}

impl Display for TodoServiceError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Validation(err) => write!(f, "{err}"),
            Self::TodoNotFound(id) => write!(f, "Todo with id {id} not found"),
            Self::Repo(err) => write!(f, "{err}"),
            Self::InconsistentState(details) => write!(f, "inconsistent todo state: {details}"),
        }
    }
}

impl Error for TodoServiceError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Validation(err) => Some(err),
            Self::Repo(err) => Some(err),
            _ => None,
        }
    }
}

impl From<RepoError> for TodoServiceError {
    fn from(value: RepoError) -> Self {
        match value {
            RepoError::NotFound(id) => Self::TodoNotFound(id),
            RepoError::Validation(err) => Self::Validation(err),
            other => Self::Repo(other),
        }
    }
}

impl From<TodoValidationError> for TodoServiceError {
    fn from(value: TodoValidationError) -> Self {
        Self::Validation(value)
    }
}

pub type ServiceResult<T> = Result<T, TodoServiceError>;

/// Handler facade over a todo repository.
pub struct TodoService<R: TodoRepository> {
    repo: R,
}

impl<R: TodoRepository> TodoService<R> {
    pub fn new(repo: R) -> Self {
        Self { repo }
    }

    /// Returns every record, newest created first.
    pub fn list_todos(&self) -> ServiceResult<Vec<Todo>> {
        let todos = self
            .repo
            .list_todos()
            .map_err(|err| log_failure("todo_list", None, err.into()))?;
        debug!(
            "event=todo_list module=service status=ok count={}",
            todos.len()
        );
        Ok(todos)
    }

    /// Returns the matching record, or `None` when no record has the id.
    pub fn get_todo(&self, input: GetTodoInput) -> ServiceResult<Option<Todo>> {
        let todo = self
            .repo
            .get_todo(input.id)
            .map_err(|err| log_failure("todo_get", Some(input.id), err.into()))?;
        debug!(
            "event=todo_get module=service status=ok id={} found={}",
            input.id,
            todo.is_some()
        );
        Ok(todo)
    }

    /// Inserts a new incomplete record and returns it with its assigned id.
    pub fn create_todo(&self, input: &CreateTodoInput) -> ServiceResult<Todo> {
        input
            .validate()
            .map_err(|err| log_failure("todo_create", None, err.into()))?;

        let id = self
            .repo
            .insert_todo(input)
            .map_err(|err| log_failure("todo_create", None, err.into()))?;
        let created = self.read_back(id, "created todo not found in read-back")?;

        info!("event=todo_create module=service status=ok id={id}");
        Ok(created)
    }

    /// Applies the supplied fields and returns the full updated record.
    ///
    /// # Errors
    /// - `TodoNotFound` when no record has `input.id`.
    pub fn update_todo(&self, input: &UpdateTodoInput) -> ServiceResult<Todo> {
        input
            .validate()
            .map_err(|err| log_failure("todo_update", Some(input.id), err.into()))?;

        self.repo
            .update_todo(input)
            .map_err(|err| log_failure("todo_update", Some(input.id), err.into()))?;
        let updated = self.read_back(input.id, "updated todo not found in read-back")?;

        info!(
            "event=todo_update module=service status=ok id={} title={} description={} completed={}",
            input.id,
            input.title.is_some(),
            input.description.is_some(),
            input.completed.is_some()
        );
        Ok(updated)
    }

    /// Removes the record. Returns `false` when nothing matched.
    pub fn delete_todo(&self, input: DeleteTodoInput) -> ServiceResult<bool> {
        let removed = self
            .repo
            .delete_todo(input.id)
            .map_err(|err| log_failure("todo_delete", Some(input.id), err.into()))?;
        info!(
            "event=todo_delete module=service status=ok id={} removed={}",
            input.id, removed
        );
        Ok(removed)
    }

    fn read_back(&self, id: TodoId, details: &'static str) -> ServiceResult<Todo> {
        match self.repo.get_todo(id) {
            Ok(Some(todo)) => Ok(todo),
            Ok(None) => Err(log_failure(
                "todo_read_back",
                Some(id),
                TodoServiceError::InconsistentState(details),
            )),
            Err(err) => Err(log_failure("todo_read_back", Some(id), err.into())),
        }
    }
}

fn log_failure(event: &str, id: Option<TodoId>, err: TodoServiceError) -> TodoServiceError {
    let id = id.map_or_else(|| "none".to_string(), |id| id.to_string());
    match &err {
        TodoServiceError::Validation(_) | TodoServiceError::TodoNotFound(_) => warn!(
            "event={} module=service status=rejected id={} error_code={}",
            event,
            id,
            err.error_code()
        ),
        TodoServiceError::Repo(_) | TodoServiceError::InconsistentState(_) => error!(
            "event={} module=service status=error id={} error_code={} error={}",
            event,
            id,
            err.error_code(),
            err
        ),
    }
    err
}

#[cfg(test)]
mod tests {
    use super::{TodoService, TodoServiceError};
    use crate::model::input::{CreateTodoInput, DeleteTodoInput, GetTodoInput, UpdateTodoInput};
    use crate::model::todo::{Todo, TodoId};
    use crate::repo::todo_repo::{RepoResult, TodoRepository};
    use std::cell::Cell;

    /// Repository that counts calls and never stores anything.
    #[derive(Default)]
    struct CountingRepo {
        calls: Cell<u32>,
    }

    impl CountingRepo {
        fn touch(&self) {
            self.calls.set(self.calls.get() + 1);
        }
    }

    impl TodoRepository for CountingRepo {
        fn insert_todo(&self, _input: &CreateTodoInput) -> RepoResult<TodoId> {
            self.touch();
            Ok(7)
        }

        fn update_todo(&self, _input: &UpdateTodoInput) -> RepoResult<()> {
            self.touch();
            Ok(())
        }

        fn get_todo(&self, _id: TodoId) -> RepoResult<Option<Todo>> {
            self.touch();
            Ok(None)
        }

        fn list_todos(&self) -> RepoResult<Vec<Todo>> {
            self.touch();
            Ok(Vec::new())
        }

        fn delete_todo(&self, _id: TodoId) -> RepoResult<bool> {
            self.touch();
            Ok(false)
        }
    }

    #[test]
    fn empty_title_is_rejected_before_repository_access() {
        let service = TodoService::new(CountingRepo::default());

        let create = service.create_todo(&CreateTodoInput::new("", None));
        assert!(matches!(create, Err(TodoServiceError::Validation(_))));

        let update = service.update_todo(&UpdateTodoInput::new(1).with_title(""));
        assert!(matches!(update, Err(TodoServiceError::Validation(_))));

        assert_eq!(service.repo.calls.get(), 0);
    }

    #[test]
    fn missing_read_back_is_reported_as_inconsistent_state() {
        let service = TodoService::new(CountingRepo::default());

        let err = service
            .create_todo(&CreateTodoInput::new("ghost", None))
            .unwrap_err();
        assert!(matches!(err, TodoServiceError::InconsistentState(_)));
        assert_eq!(err.error_code(), "storage_error");
    }

    #[test]
    fn absence_maps_to_none_and_false() {
        let service = TodoService::new(CountingRepo::default());

        assert_eq!(service.get_todo(GetTodoInput { id: 3 }).unwrap(), None);
        assert!(!service.delete_todo(DeleteTodoInput { id: 3 }).unwrap());
    }

    #[test]
    fn not_found_message_names_the_id() {
        let err = TodoServiceError::TodoNotFound(42);
        assert_eq!(err.to_string(), "Todo with id 42 not found");
        assert_eq!(err.error_code(), "not_found");
    }
}
