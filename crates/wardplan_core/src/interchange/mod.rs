//! Project data interchange: JSON codec, schema validation, merge,
//! and file import/export.
//!
//! # Responsibility
//! - Keep codec and filesystem details out of the model and services.
//! - Re-raise codec failures as domain errors with the original message.
//!
//! # Invariants
//! - Merge is additive only: no deletion, no conflict resolution beyond
//!   name matching.

pub mod file;
pub mod json;
