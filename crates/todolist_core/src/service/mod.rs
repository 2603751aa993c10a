//! Core use-case services.
//!
//! # Responsibility
//! - Expose the todo handlers as use-case level APIs.
//! - Keep request/response and UI layers decoupled from storage details.

pub mod todo_service;
