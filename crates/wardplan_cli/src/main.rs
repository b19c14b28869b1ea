//! CLI smoke entry point.
//!
//! # Responsibility
//! - Provide a minimal executable to verify `wardplan_core` linkage.
//! - Keep output deterministic for quick local sanity checks.

use wardplan_core::{ItemService, MemoryKeyValueStore, ProjectService};

fn main() {
    println!("wardplan_core version={}", wardplan_core::core_version());

    let mut projects = ProjectService::new(MemoryKeyValueStore::new());
    let stage_count = projects.current_project().stages.len();
    let stats = ItemService::new(&mut projects).item_statistics();
    println!("default_project stages={stage_count} items={}", stats.total);
}
