//! Persistence boundary abstractions and store implementations.
//!
//! # Responsibility
//! - Define the key-value store contract used for project persistence.
//! - Isolate SQLite details from the repository/service layers.
//!
//! # Invariants
//! - Store APIs speak plain string keys and values; callers own the
//!   serialization format.

pub mod kv_repo;
