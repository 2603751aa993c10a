//! Request/response surface over the todo handlers.
//!
//! UI layers talk to the store only through this crate: typed calls on
//! [`TodoApi`] or JSON procedure calls through [`TodoApi::dispatch`].

mod api;
mod envelope;
mod error;

pub use api::{DeleteTodoResponse, TodoApi};
pub use envelope::{Procedure, ProcedureCall, ResponseEnvelope};
pub use error::{ApiError, ApiResult};
pub use todolist_core::{CreateTodoInput, DeleteTodoInput, GetTodoInput, Todo, TodoId, UpdateTodoInput};
