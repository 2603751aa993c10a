//! Repository layer abstractions and persistence implementations.
//!
//! # Responsibility
//! - Define the data access contract used by the todo handlers.
//! - Keep SQLite query details out of the service layer.
//!
//! # Invariants
//! - Write paths validate input before any SQL mutation.
//! - Repository APIs return semantic errors (`NotFound`) in addition to DB
//!   transport errors.

pub mod todo_repo;
