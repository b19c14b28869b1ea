//! Core domain logic for hospital construction project tracking.
//! This crate is the single source of truth for business invariants.

pub mod db;
pub mod interchange;
pub mod logging;
pub mod model;
pub mod repo;
pub mod service;
pub mod templates;

pub use interchange::file::{generate_file_name, read_from_file, write_to_file, FileError};
pub use interchange::json::{
    merge_project_data, validate_project_data, ParseError, SerializeError, ValidationReport,
};
pub use logging::{default_log_level, init_logging, logging_status};
pub use model::item::{Item, ItemDraft, ItemPriority, ItemStatus};
pub use model::project::{
    Link, LinkDraft, Project, ProjectDraft, ProjectStage, StageDraft, DEFAULT_LINKS,
    DEFAULT_STAGES,
};
pub use repo::kv_repo::{
    KeyValueStore, MemoryKeyValueStore, SqliteKeyValueStore, StoreError, StoreResult,
};
pub use service::item_service::{
    validate_item, ItemRef, ItemService, ItemServiceError, ItemStatistics, LinkStatistics,
    PriorityCounts, StageStatistics, StatusCounts,
};
pub use service::project_service::{ProjectService, ProjectServiceError, STORAGE_KEY};
pub use templates::{build_template, default_project, ProjectTemplate};

/// Returns the core crate version.
pub fn core_version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}

#[cfg(test)]
mod tests {
    use super::core_version;

    #[test]
    fn version_is_not_empty() {
        assert!(!core_version().is_empty());
    }
}
