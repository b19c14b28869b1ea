//! Item query/mutation service.
//!
//! # Responsibility
//! - Route item CRUD through the project repository.
//! - Provide cross-cutting search, filter, statistics, copy and move
//!   operations over the whole tree.
//!
//! # Invariants
//! - Item mutations require the owning link to exist (`LinkNotFound`);
//!   repository lookups stay `Option`-based.
//! - Batch updates isolate per-item failures and report partial success.
//! - `move_item` never deletes the source when the copy failed.

use std::error::Error;
use std::fmt::{Display, Formatter};

use log::error;

use crate::interchange::json::ValidationReport;
use crate::model::item::{Item, ItemDraft, ItemPriority, ItemStatus};
use crate::repo::kv_repo::KeyValueStore;
use crate::service::project_service::ProjectService;

/// Errors from item-level write paths.
#[derive(Debug)]
pub enum ItemServiceError {
    /// The owning link does not resolve.
    LinkNotFound { stage_id: String, link_id: String },
    /// The item does not resolve inside its link.
    ItemNotFound { link_id: String, item_id: String },
    /// Status text outside the allowed wire tokens.
    InvalidStatus(String),
}

impl Display for ItemServiceError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::LinkNotFound { stage_id, link_id } => {
                write!(f, "link not found: {link_id} in stage {stage_id}")
            }
            Self::ItemNotFound { link_id, item_id } => {
                write!(f, "item not found: {item_id} in link {link_id}")
            }
            Self::InvalidStatus(value) => write!(f, "invalid item status: `{value}`"),
        }
    }
}

impl Error for ItemServiceError {}

/// Address of one item inside the tree, used by batch operations.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ItemRef {
    pub stage_id: String,
    pub link_id: String,
    pub item_id: String,
}

/// Status bucket counts, zero-initialized.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct StatusCounts {
    pub todo: usize,
    pub in_progress: usize,
    pub done: usize,
}

impl StatusCounts {
    fn record(&mut self, status: ItemStatus) {
        match status {
            ItemStatus::Todo => self.todo += 1,
            ItemStatus::InProgress => self.in_progress += 1,
            ItemStatus::Done => self.done += 1,
        }
    }

    pub fn sum(&self) -> usize {
        self.todo + self.in_progress + self.done
    }
}

/// Priority bucket counts, zero-initialized.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct PriorityCounts {
    pub low: usize,
    pub medium: usize,
    pub high: usize,
}

impl PriorityCounts {
    fn record(&mut self, priority: ItemPriority) {
        match priority {
            ItemPriority::Low => self.low += 1,
            ItemPriority::Medium => self.medium += 1,
            ItemPriority::High => self.high += 1,
        }
    }

    pub fn sum(&self) -> usize {
        self.low + self.medium + self.high
    }
}

/// Whole-project item statistics.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ItemStatistics {
    pub total: usize,
    pub by_status: StatusCounts,
    pub by_priority: PriorityCounts,
}

/// Per-stage progress statistics.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StageStatistics {
    pub name: String,
    pub total: usize,
    pub by_status: StatusCounts,
    /// Completed share in whole percent, rounded; 0 for empty stages.
    pub progress: usize,
}

/// Per-link statistics aggregated across stages by link name.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LinkStatistics {
    pub name: String,
    /// Owner label carried from the first occurrence of the link name.
    pub owner: String,
    pub total: usize,
    pub by_status: StatusCounts,
}

/// Item facade borrowing the project repository (explicit context, no
/// global state; construct one per use).
pub struct ItemService<'a, S: KeyValueStore> {
    projects: &'a mut ProjectService<S>,
}

impl<'a, S: KeyValueStore> ItemService<'a, S> {
    pub fn new(projects: &'a mut ProjectService<S>) -> Self {
        Self { projects }
    }

    /// Appends an item built from the draft to the link and persists.
    pub fn add_item(
        &mut self,
        stage_id: &str,
        link_id: &str,
        draft: ItemDraft,
    ) -> Result<Item, ItemServiceError> {
        let link = self
            .projects
            .link_mut(stage_id, link_id)
            .ok_or_else(|| link_not_found(stage_id, link_id))?;
        let item = Item::new(draft);
        let snapshot = item.clone();
        link.add_item(item);
        self.projects.commit();
        Ok(snapshot)
    }

    /// Replace-by-id item update. Requires the item to exist.
    pub fn update_item(
        &mut self,
        stage_id: &str,
        link_id: &str,
        item: Item,
    ) -> Result<Item, ItemServiceError> {
        let link = self
            .projects
            .link_mut(stage_id, link_id)
            .ok_or_else(|| link_not_found(stage_id, link_id))?;
        if link.item(&item.id).is_none() {
            return Err(ItemServiceError::ItemNotFound {
                link_id: link_id.to_string(),
                item_id: item.id.clone(),
            });
        }
        let snapshot = item.clone();
        link.update_item(item);
        self.projects.commit();
        Ok(snapshot)
    }

    /// Removes an item from its link and persists. An unknown item id
    /// is a no-op; only the link must exist.
    pub fn delete_item(
        &mut self,
        stage_id: &str,
        link_id: &str,
        item_id: &str,
    ) -> Result<(), ItemServiceError> {
        let link = self
            .projects
            .link_mut(stage_id, link_id)
            .ok_or_else(|| link_not_found(stage_id, link_id))?;
        link.remove_item(item_id);
        self.projects.commit();
        Ok(())
    }

    /// Read-path item lookup; `None` on miss at any level.
    pub fn item(&self, stage_id: &str, link_id: &str, item_id: &str) -> Option<&Item> {
        self.projects.link(stage_id, link_id)?.item(item_id)
    }

    /// Items of one link; empty when the link does not resolve.
    pub fn items_by_link(&self, stage_id: &str, link_id: &str) -> Vec<Item> {
        self.projects
            .link(stage_id, link_id)
            .map(|link| link.items.clone())
            .unwrap_or_default()
    }

    /// Items of one stage in link-then-item order; empty on miss.
    pub fn items_by_stage(&self, stage_id: &str) -> Vec<Item> {
        self.projects
            .stage(stage_id)
            .map(|stage| stage.items().cloned().collect())
            .unwrap_or_default()
    }

    /// Every item of the current project in stage-then-link-then-item
    /// order.
    pub fn all_items(&mut self) -> Vec<Item> {
        self.projects.current_project().items().cloned().collect()
    }

    /// Case-insensitive substring search over description, participants
    /// and notes. A blank keyword applies no filter.
    pub fn search_items(&mut self, keyword: &str) -> Vec<Item> {
        let keyword = keyword.trim().to_lowercase();
        let project = self.projects.current_project();
        if keyword.is_empty() {
            return project.items().cloned().collect();
        }
        project
            .items()
            .filter(|item| item.matches_keyword(&keyword))
            .cloned()
            .collect()
    }

    pub fn items_with_status(&mut self, status: ItemStatus) -> Vec<Item> {
        self.projects
            .current_project()
            .items()
            .filter(|item| item.status == status)
            .cloned()
            .collect()
    }

    pub fn items_with_priority(&mut self, priority: ItemPriority) -> Vec<Item> {
        self.projects
            .current_project()
            .items()
            .filter(|item| item.priority == priority)
            .cloned()
            .collect()
    }

    /// Single pass over all items: total plus status and priority
    /// buckets, all zero-initialized.
    pub fn item_statistics(&mut self) -> ItemStatistics {
        let mut stats = ItemStatistics::default();
        for item in self.projects.current_project().items() {
            stats.total += 1;
            stats.by_status.record(item.status);
            stats.by_priority.record(item.priority);
        }
        stats
    }

    /// Per-stage counts with a rounded completion percentage.
    pub fn stage_statistics(&mut self) -> Vec<StageStatistics> {
        self.projects
            .current_project()
            .stages
            .iter()
            .map(|stage| {
                let mut by_status = StatusCounts::default();
                let mut total = 0;
                for item in stage.items() {
                    total += 1;
                    by_status.record(item.status);
                }
                let progress = if total > 0 {
                    (by_status.done * 100 + total / 2) / total
                } else {
                    0
                };
                StageStatistics {
                    name: stage.name.clone(),
                    total,
                    by_status,
                    progress,
                }
            })
            .collect()
    }

    /// Per-link counts aggregated across all stages by link name, in
    /// first-encounter order.
    pub fn link_statistics(&mut self) -> Vec<LinkStatistics> {
        let mut ordered: Vec<LinkStatistics> = Vec::new();
        for stage in &self.projects.current_project().stages {
            for link in &stage.links {
                let position = match ordered.iter().position(|entry| entry.name == link.name) {
                    Some(position) => position,
                    None => {
                        ordered.push(LinkStatistics {
                            name: link.name.clone(),
                            owner: link.owner.clone(),
                            total: 0,
                            by_status: StatusCounts::default(),
                        });
                        ordered.len() - 1
                    }
                };
                let entry = &mut ordered[position];
                for item in &link.items {
                    entry.total += 1;
                    entry.by_status.record(item.status);
                }
            }
        }
        ordered
    }

    /// Sets an item's status from its wire token. `InvalidStatus` for
    /// unknown tokens, leaving the item unmodified.
    pub fn update_item_status(
        &mut self,
        stage_id: &str,
        link_id: &str,
        item_id: &str,
        new_status: &str,
    ) -> Result<Item, ItemServiceError> {
        let status = ItemStatus::parse(new_status)
            .ok_or_else(|| ItemServiceError::InvalidStatus(new_status.to_string()))?;
        let link = self
            .projects
            .link_mut(stage_id, link_id)
            .ok_or_else(|| link_not_found(stage_id, link_id))?;
        let item = link
            .item_mut(item_id)
            .ok_or_else(|| ItemServiceError::ItemNotFound {
                link_id: link_id.to_string(),
                item_id: item_id.to_string(),
            })?;
        item.status = status;
        let snapshot = item.clone();
        self.projects.commit();
        Ok(snapshot)
    }

    /// Applies `update_item_status` per reference. One item's failure is
    /// logged and skipped; returns the items that succeeded.
    pub fn batch_update_item_status(
        &mut self,
        refs: &[ItemRef],
        new_status: &str,
    ) -> Result<Vec<Item>, ItemServiceError> {
        if ItemStatus::parse(new_status).is_none() {
            return Err(ItemServiceError::InvalidStatus(new_status.to_string()));
        }

        let mut updated = Vec::new();
        for item_ref in refs {
            match self.update_item_status(
                &item_ref.stage_id,
                &item_ref.link_id,
                &item_ref.item_id,
                new_status,
            ) {
                Ok(item) => updated.push(item),
                Err(err) => {
                    error!(
                        "event=batch_status module=item_service status=error item_id={} error={err}",
                        item_ref.item_id
                    );
                }
            }
        }
        Ok(updated)
    }

    /// Duplicates an item's field values under a fresh id into the
    /// target link.
    pub fn copy_item(
        &mut self,
        source_stage_id: &str,
        source_link_id: &str,
        item_id: &str,
        target_stage_id: &str,
        target_link_id: &str,
    ) -> Result<Item, ItemServiceError> {
        let copy = self
            .item(source_stage_id, source_link_id, item_id)
            .ok_or_else(|| ItemServiceError::ItemNotFound {
                link_id: source_link_id.to_string(),
                item_id: item_id.to_string(),
            })?
            .duplicate();

        let target = self
            .projects
            .link_mut(target_stage_id, target_link_id)
            .ok_or_else(|| link_not_found(target_stage_id, target_link_id))?;
        let snapshot = copy.clone();
        target.add_item(copy);
        self.projects.commit();
        Ok(snapshot)
    }

    /// Copy then delete-original. The delete only runs when the copy
    /// succeeded, so a failed move leaves the source in place.
    pub fn move_item(
        &mut self,
        source_stage_id: &str,
        source_link_id: &str,
        item_id: &str,
        target_stage_id: &str,
        target_link_id: &str,
    ) -> Result<Item, ItemServiceError> {
        let copied = self.copy_item(
            source_stage_id,
            source_link_id,
            item_id,
            target_stage_id,
            target_link_id,
        )?;
        self.delete_item(source_stage_id, source_link_id, item_id)?;
        Ok(copied)
    }
}

/// Advisory structural check for item input; never an error. Enum
/// membership is checked at the string boundary instead
/// (`update_item_status`), since drafts are typed.
pub fn validate_item(draft: &ItemDraft) -> ValidationReport {
    let mut errors = Vec::new();

    if draft.description.trim().is_empty() {
        errors.push("item description must not be blank".to_string());
    }
    if draft.participants.is_empty() {
        errors.push("item must name at least one participant".to_string());
    }
    if let (Some(start), Some(end)) = (draft.start_date, draft.end_date) {
        if start > end {
            errors.push(format!("item start date {start} is after end date {end}"));
        }
    }

    ValidationReport::from_errors(errors)
}

fn link_not_found(stage_id: &str, link_id: &str) -> ItemServiceError {
    ItemServiceError::LinkNotFound {
        stage_id: stage_id.to_string(),
        link_id: link_id.to_string(),
    }
}
