//! Project tree domain model: links, stages and the root aggregate.
//!
//! # Responsibility
//! - Define the owning hierarchy above items.
//! - Provide child CRUD with replace-by-id update semantics.
//! - Fix the default stage/link vocabulary for hospital construction.
//!
//! # Invariants
//! - Link and stage names are merge/match keys and should stay stable
//!   once created; uniqueness is not enforced.
//! - `remove_*` is a no-op for unknown ids; `update_*` silently skips
//!   unknown ids — callers fetch before updating.
//! - Every `Project` mutator bumps `updated_at`.

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

use crate::model::ident;
use crate::model::item::Item;

/// Lifecycle stage names seeded into a default project.
pub const DEFAULT_STAGES: [&str; 9] = [
    "Approval & feasibility",
    "Pre-design",
    "Schematic & preliminary design",
    "Construction documents",
    "Construction tendering",
    "Construction",
    "Completion & acceptance",
    "Pre-opening fit-out",
    "Operations & maintenance",
];

/// The six fixed management threads with their responsible-owner labels.
pub const DEFAULT_LINKS: [(&str, &str); 6] = [
    ("Requirement generation", "Hospital lead"),
    ("Design conversion", "Delegated builder lead"),
    ("Procurement integration", "Hospital lead"),
    ("Construction control", "Delegated builder lead"),
    ("Operations handoff", "Hospital lead"),
    ("Continuous improvement", "Management center lead"),
];

/// Display palette cycled by [`default_link_color`].
pub const LINK_COLOR_PALETTE: [&str; 6] = [
    "#3B82F6", "#10B981", "#F59E0B", "#EF4444", "#8B5CF6", "#06B6D4",
];

/// Deterministic palette pick derived from the link name.
pub fn default_link_color(name: &str) -> &'static str {
    let sum: usize = name.bytes().map(usize::from).sum();
    LINK_COLOR_PALETTE[sum % LINK_COLOR_PALETTE.len()]
}

fn default_stage_status() -> String {
    "planned".to_string()
}

fn default_project_name() -> String {
    "Hospital construction project".to_string()
}

/// One of the fixed cross-cutting management threads within a stage.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Link {
    /// Opaque stable identifier (`link-<millis>-<suffix>`).
    #[serde(default = "ident::new_link_id")]
    pub id: String,
    /// Merge/match key across imports; stable once created.
    #[serde(default)]
    pub name: String,
    /// Responsible-owner label for this thread.
    #[serde(default)]
    pub owner: String,
    /// Display color as `#RRGGBB`. Empty when imported data omits it.
    #[serde(default)]
    pub color: String,
    #[serde(default)]
    pub items: Vec<Item>,
}

/// Partial input record for creating a link.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct LinkDraft {
    pub id: Option<String>,
    pub name: String,
    pub owner: Option<String>,
    pub color: Option<String>,
    pub items: Vec<Item>,
}

impl Link {
    /// Builds a link from a partial record. A missing color gets a
    /// deterministic palette pick derived from the name.
    pub fn new(draft: LinkDraft) -> Self {
        let color = draft
            .color
            .unwrap_or_else(|| default_link_color(&draft.name).to_string());
        Self {
            id: draft.id.unwrap_or_else(ident::new_link_id),
            name: draft.name,
            owner: draft.owner.unwrap_or_default(),
            color,
            items: draft.items,
        }
    }

    pub fn add_item(&mut self, item: Item) {
        self.items.push(item);
    }

    /// Removes the item with the given id; no error when absent.
    pub fn remove_item(&mut self, item_id: &str) {
        self.items.retain(|item| item.id != item_id);
    }

    pub fn item(&self, item_id: &str) -> Option<&Item> {
        self.items.iter().find(|item| item.id == item_id)
    }

    pub fn item_mut(&mut self, item_id: &str) -> Option<&mut Item> {
        self.items.iter_mut().find(|item| item.id == item_id)
    }

    /// Replaces the item carrying the same id; silent no-op when the id
    /// is unknown.
    pub fn update_item(&mut self, updated: Item) {
        if let Some(slot) = self.item_mut(&updated.id) {
            *slot = updated;
        }
    }
}

/// One phase of the project lifecycle, containing its management links.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProjectStage {
    /// Opaque stable identifier (`stage-<millis>-<suffix>`).
    #[serde(default = "ident::new_stage_id")]
    pub id: String,
    /// Merge/match key across imports; stable once created.
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub start_date: Option<NaiveDate>,
    #[serde(default)]
    pub end_date: Option<NaiveDate>,
    #[serde(default)]
    pub description: String,
    /// Free-form status label.
    #[serde(default = "default_stage_status")]
    pub status: String,
    #[serde(default)]
    pub links: Vec<Link>,
}

/// Partial input record for creating a stage.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct StageDraft {
    pub id: Option<String>,
    pub name: String,
    pub start_date: Option<NaiveDate>,
    pub end_date: Option<NaiveDate>,
    pub description: Option<String>,
    pub status: Option<String>,
    pub links: Vec<Link>,
}

impl ProjectStage {
    /// Builds a stage from a partial record, defaulting status to `planned`.
    pub fn new(draft: StageDraft) -> Self {
        Self {
            id: draft.id.unwrap_or_else(ident::new_stage_id),
            name: draft.name,
            start_date: draft.start_date,
            end_date: draft.end_date,
            description: draft.description.unwrap_or_default(),
            status: draft.status.unwrap_or_else(default_stage_status),
            links: draft.links,
        }
    }

    pub fn add_link(&mut self, link: Link) {
        self.links.push(link);
    }

    /// Removes the link with the given id; no error when absent.
    pub fn remove_link(&mut self, link_id: &str) {
        self.links.retain(|link| link.id != link_id);
    }

    pub fn link(&self, link_id: &str) -> Option<&Link> {
        self.links.iter().find(|link| link.id == link_id)
    }

    pub fn link_mut(&mut self, link_id: &str) -> Option<&mut Link> {
        self.links.iter_mut().find(|link| link.id == link_id)
    }

    /// Replaces the link carrying the same id; silent no-op when the id
    /// is unknown.
    pub fn update_link(&mut self, updated: Link) {
        if let Some(slot) = self.link_mut(&updated.id) {
            *slot = updated;
        }
    }

    /// All items under this stage in link-then-item order.
    pub fn items(&self) -> impl Iterator<Item = &Item> {
        self.links.iter().flat_map(|link| link.items.iter())
    }
}

/// Root aggregate: the single current working document.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Project {
    /// Opaque stable identifier (`project-<millis>-<suffix>`).
    #[serde(default = "ident::new_project_id")]
    pub id: String,
    #[serde(default = "default_project_name")]
    pub name: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub start_date: Option<NaiveDate>,
    #[serde(default)]
    pub end_date: Option<NaiveDate>,
    #[serde(default = "Utc::now")]
    pub created_at: DateTime<Utc>,
    #[serde(default = "Utc::now")]
    pub updated_at: DateTime<Utc>,
    #[serde(default)]
    pub stages: Vec<ProjectStage>,
}

/// Partial input record for creating a project.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ProjectDraft {
    pub id: Option<String>,
    pub name: Option<String>,
    pub description: Option<String>,
    pub start_date: Option<NaiveDate>,
    pub end_date: Option<NaiveDate>,
    pub stages: Vec<ProjectStage>,
}

impl Project {
    /// Builds a project from a partial record with fresh timestamps.
    pub fn new(draft: ProjectDraft) -> Self {
        let now = Utc::now();
        Self {
            id: draft.id.unwrap_or_else(ident::new_project_id),
            name: draft.name.unwrap_or_else(default_project_name),
            description: draft.description.unwrap_or_default(),
            start_date: draft.start_date,
            end_date: draft.end_date,
            created_at: now,
            updated_at: now,
            stages: draft.stages,
        }
    }

    /// Bumps `updated_at`. Called by every mutator that changes the tree.
    pub fn touch(&mut self) {
        self.updated_at = Utc::now();
    }

    pub fn add_stage(&mut self, stage: ProjectStage) {
        self.stages.push(stage);
        self.touch();
    }

    /// Removes the stage with the given id; no error when absent.
    pub fn remove_stage(&mut self, stage_id: &str) {
        self.stages.retain(|stage| stage.id != stage_id);
        self.touch();
    }

    pub fn stage(&self, stage_id: &str) -> Option<&ProjectStage> {
        self.stages.iter().find(|stage| stage.id == stage_id)
    }

    pub fn stage_mut(&mut self, stage_id: &str) -> Option<&mut ProjectStage> {
        self.stages.iter_mut().find(|stage| stage.id == stage_id)
    }

    /// Replaces the stage carrying the same id and bumps `updated_at`;
    /// silent no-op when the id is unknown.
    pub fn update_stage(&mut self, updated: ProjectStage) {
        if let Some(slot) = self.stage_mut(&updated.id) {
            *slot = updated;
            self.touch();
        }
    }

    /// All items in stage-then-link-then-item order.
    pub fn items(&self) -> impl Iterator<Item = &Item> {
        self.stages.iter().flat_map(ProjectStage::items)
    }
}
