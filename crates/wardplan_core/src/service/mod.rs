//! Repository and query/mutation services over the project tree.
//!
//! # Responsibility
//! - Own the single current project and its persistence.
//! - Orchestrate model mutations into use-case level APIs.
//!
//! # Invariants
//! - Read-path lookups return `Option`/empty on miss, never an error.
//! - Write paths with existence preconditions return typed errors.
//! - Store failures never propagate above the repository boundary.

pub mod item_service;
pub mod project_service;
