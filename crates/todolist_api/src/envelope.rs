//! JSON procedure endpoint.
//!
//! Request: `{"procedure": "<name>", "input": {...}}`.
//! Success: `{"ok": true, "data": ...}`.
//! Failure: `{"ok": false, "error_code": "...", "message": "..."}`.

use crate::api::TodoApi;
use crate::error::{ApiError, ApiResult};
use log::debug;
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use todolist_core::{CreateTodoInput, DeleteTodoInput, GetTodoInput, UpdateTodoInput};

/// Operations reachable through [`TodoApi::dispatch`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Procedure {
    #[serde(rename = "getTodos")]
    List,
    #[serde(rename = "getTodo")]
    Get,
    #[serde(rename = "createTodo")]
    Create,
    #[serde(rename = "updateTodo")]
    Update,
    #[serde(rename = "deleteTodo")]
    Delete,
}

impl Procedure {
    fn label(self) -> &'static str {
        match self {
            Self::List => "getTodos",
            Self::Get => "getTodo",
            Self::Create => "createTodo",
            Self::Update => "updateTodo",
            Self::Delete => "deleteTodo",
        }
    }
}

/// One procedure call as sent by a client.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProcedureCall {
    pub procedure: Procedure,
    #[serde(default)]
    pub input: Value,
}

/// Response wrapper returned by [`TodoApi::dispatch`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum ResponseEnvelope {
    Success {
        ok: bool,
        data: Value,
    },
    Failure {
        ok: bool,
        error_code: String,
        message: String,
    },
}

impl ResponseEnvelope {
    fn success(data: Value) -> Self {
        Self::Success { ok: true, data }
    }

    fn failure(err: &ApiError) -> Self {
        Self::Failure {
            ok: false,
            error_code: err.error_code().to_string(),
            message: err.to_string(),
        }
    }

    pub fn is_ok(&self) -> bool {
        matches!(self, Self::Success { .. })
    }
}

impl TodoApi {
    /// Runs one JSON procedure call and returns the JSON response envelope.
    ///
    /// Never panics. Malformed envelopes yield `invalid_request`; inputs that
    /// do not match the operation's shape yield `validation_failed`.
    pub fn dispatch(&self, request: &str) -> String {
        let envelope = self.dispatch_envelope(request);
        serde_json::to_string(&envelope).unwrap_or_else(|err| {
            format!(
                r#"{{"ok":false,"error_code":"storage_error","message":"response encoding failed: {}"}}"#,
                err.to_string().replace('"', "'")
            )
        })
    }

    /// Like [`TodoApi::dispatch`] but returns the envelope unencoded.
    pub fn dispatch_envelope(&self, request: &str) -> ResponseEnvelope {
        let outcome = serde_json::from_str::<ProcedureCall>(request)
            .map_err(|err| ApiError::InvalidRequest(err.to_string()))
            .and_then(|call| {
                let procedure = call.procedure;
                let result = self.call(call);
                debug!(
                    "event=api_dispatch module=api procedure={} status={}",
                    procedure.label(),
                    if result.is_ok() { "ok" } else { "error" }
                );
                result
            });

        match outcome {
            Ok(data) => ResponseEnvelope::success(data),
            Err(err) => ResponseEnvelope::failure(&err),
        }
    }

    fn call(&self, call: ProcedureCall) -> ApiResult<Value> {
        match call.procedure {
            Procedure::List => to_data(self.list_todos()?),
            Procedure::Get => {
                let input: GetTodoInput = parse_input(call.input)?;
                to_data(self.get_todo(input)?)
            }
            Procedure::Create => {
                let input: CreateTodoInput = parse_input(call.input)?;
                to_data(self.create_todo(&input)?)
            }
            Procedure::Update => {
                let input: UpdateTodoInput = parse_input(call.input)?;
                to_data(self.update_todo(&input)?)
            }
            Procedure::Delete => {
                let input: DeleteTodoInput = parse_input(call.input)?;
                to_data(self.delete_todo(input)?)
            }
        }
    }
}

fn parse_input<T: DeserializeOwned>(input: Value) -> ApiResult<T> {
    serde_json::from_value(input).map_err(|err| ApiError::Validation(err.to_string()))
}

fn to_data<T: Serialize>(value: T) -> ApiResult<Value> {
    serde_json::to_value(value)
        .map_err(|err| ApiError::Storage(format!("response encoding failed: {err}")))
}
