//! Todo domain model and input shapes.
//!
//! # Responsibility
//! - Define the canonical stored record (`Todo`).
//! - Define the validated input shapes accepted by the handlers.
//!
//! # Invariants
//! - Every record is identified by a store-assigned `TodoId`.
//! - Deletion is permanent removal, there is no tombstone state.

pub mod input;
pub mod todo;
