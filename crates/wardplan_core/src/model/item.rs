//! Work item domain model.
//!
//! # Responsibility
//! - Define the leaf unit of work tracked inside a management link.
//! - Fix the wire vocabulary for item status and priority.
//!
//! # Invariants
//! - `id` is stable once assigned and never reused for another item.
//! - `participants` order is caller-controlled and preserved.
//! - `start_date <= end_date` is expected when both are set; the check
//!   is advisory (`ItemService::validate_item`), not enforced on mutation.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::model::ident;

/// Lifecycle state of a work item.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum ItemStatus {
    /// Created but not started.
    #[default]
    Todo,
    /// Work is underway.
    InProgress,
    /// Completed.
    Done,
}

impl ItemStatus {
    /// All states in display order.
    pub const ALL: [Self; 3] = [Self::Todo, Self::InProgress, Self::Done];

    /// Wire token for this status.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Todo => "todo",
            Self::InProgress => "in-progress",
            Self::Done => "done",
        }
    }

    /// Parses a wire token. Returns `None` for anything outside the set.
    pub fn parse(value: &str) -> Option<Self> {
        match value {
            "todo" => Some(Self::Todo),
            "in-progress" => Some(Self::InProgress),
            "done" => Some(Self::Done),
            _ => None,
        }
    }
}

/// Scheduling priority of a work item.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ItemPriority {
    Low,
    #[default]
    Medium,
    High,
}

impl ItemPriority {
    /// All priorities in ascending order.
    pub const ALL: [Self; 3] = [Self::Low, Self::Medium, Self::High];

    /// Wire token for this priority.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Low => "low",
            Self::Medium => "medium",
            Self::High => "high",
        }
    }

    /// Parses a wire token. Returns `None` for anything outside the set.
    pub fn parse(value: &str) -> Option<Self> {
        match value {
            "low" => Some(Self::Low),
            "medium" => Some(Self::Medium),
            "high" => Some(Self::High),
            _ => None,
        }
    }
}

/// Leaf unit of work, owned by exactly one link.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Item {
    /// Opaque stable identifier (`item-<millis>-<suffix>`).
    #[serde(default = "ident::new_item_id")]
    pub id: String,
    #[serde(default)]
    pub description: String,
    /// Free-text participant names.
    #[serde(default)]
    pub participants: Vec<String>,
    #[serde(default)]
    pub status: ItemStatus,
    #[serde(default)]
    pub start_date: Option<NaiveDate>,
    #[serde(default)]
    pub end_date: Option<NaiveDate>,
    #[serde(default)]
    pub priority: ItemPriority,
    #[serde(default)]
    pub notes: String,
}

/// Partial input record for creating an item. Missing fields default.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ItemDraft {
    pub id: Option<String>,
    pub description: String,
    pub participants: Vec<String>,
    pub status: Option<ItemStatus>,
    pub start_date: Option<NaiveDate>,
    pub end_date: Option<NaiveDate>,
    pub priority: Option<ItemPriority>,
    pub notes: Option<String>,
}

impl Item {
    /// Builds an item from a partial record, generating an id when absent.
    pub fn new(draft: ItemDraft) -> Self {
        Self {
            id: draft.id.unwrap_or_else(ident::new_item_id),
            description: draft.description,
            participants: draft.participants,
            status: draft.status.unwrap_or_default(),
            start_date: draft.start_date,
            end_date: draft.end_date,
            priority: draft.priority.unwrap_or_default(),
            notes: draft.notes.unwrap_or_default(),
        }
    }

    /// Field-for-field duplicate under a freshly generated identifier.
    pub fn duplicate(&self) -> Self {
        Self {
            id: ident::new_item_id(),
            ..self.clone()
        }
    }

    /// Case-insensitive substring match over description, participants
    /// and notes.
    pub fn matches_keyword(&self, keyword_lower: &str) -> bool {
        self.description.to_lowercase().contains(keyword_lower)
            || self
                .participants
                .iter()
                .any(|participant| participant.to_lowercase().contains(keyword_lower))
            || self.notes.to_lowercase().contains(keyword_lower)
    }
}
