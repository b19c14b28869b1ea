//! Current-project repository service.
//!
//! # Responsibility
//! - Single source of truth for the current project.
//! - Persist every mutation under one fixed store key.
//! - Provide stage/link navigation for the item layer and presentation.
//!
//! # Invariants
//! - `current_project` never yields an absent project: it loads from the
//!   store or falls back to the default project.
//! - Store failures are caught and logged here; an in-memory session
//!   stays usable when storage is denied.
//! - `load_project_data` leaves prior state untouched on parse failure.

use std::error::Error;
use std::fmt::{Display, Formatter};

use log::{error, info};

use crate::interchange::json::{self, ParseError, SerializeError};
use crate::model::project::{Link, LinkDraft, Project, ProjectStage, StageDraft};
use crate::repo::kv_repo::KeyValueStore;
use crate::templates;

/// Fixed key the current project is persisted under.
pub const STORAGE_KEY: &str = "wardplan-project-data";

/// Errors surfaced by project import/export.
#[derive(Debug)]
pub enum ProjectServiceError {
    /// Malformed project JSON on the import path.
    InvalidProjectData(ParseError),
    /// Export requested while no project is loaded.
    NoCurrentProject,
    /// Export serialization failed.
    Serialize(SerializeError),
}

impl Display for ProjectServiceError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::InvalidProjectData(err) => write!(f, "invalid project data: {err}"),
            Self::NoCurrentProject => write!(f, "no project loaded to export"),
            Self::Serialize(err) => write!(f, "{err}"),
        }
    }
}

impl Error for ProjectServiceError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::InvalidProjectData(err) => Some(err),
            Self::NoCurrentProject => None,
            Self::Serialize(err) => Some(err),
        }
    }
}

/// Repository owning the current project and its store.
pub struct ProjectService<S: KeyValueStore> {
    store: S,
    current: Option<Project>,
}

impl<S: KeyValueStore> ProjectService<S> {
    pub fn new(store: S) -> Self {
        Self {
            store,
            current: None,
        }
    }

    /// Returns the current project, loading it from the store or
    /// building the default project when nothing is persisted.
    pub fn current_project(&mut self) -> &Project {
        self.current_mut()
    }

    /// Stage list of the current project.
    pub fn stages(&mut self) -> &[ProjectStage] {
        &self.current_mut().stages
    }

    /// Parses and installs a project wholesale, then persists it.
    /// Prior state is untouched when parsing fails.
    pub fn load_project_data(&mut self, json_text: &str) -> Result<&Project, ProjectServiceError> {
        let project = json::parse_project(json_text).map_err(|err| {
            error!("event=project_import module=project_service status=error error={err}");
            ProjectServiceError::InvalidProjectData(err)
        })?;
        info!(
            "event=project_import module=project_service status=ok stages={}",
            project.stages.len()
        );
        Ok(self.install_project(project))
    }

    /// Typed replacement entrypoint, used for template application.
    pub fn load_project(&mut self, project: Project) -> &Project {
        self.install_project(project)
    }

    /// Serializes the current project to pretty JSON. Does not fall back
    /// to the store or the default project.
    pub fn export_project_data(&self) -> Result<String, ProjectServiceError> {
        let project = self
            .current
            .as_ref()
            .ok_or(ProjectServiceError::NoCurrentProject)?;
        json::stringify(project, true).map_err(ProjectServiceError::Serialize)
    }

    /// Appends a stage built from the draft and persists. Ensures a
    /// current project first.
    pub fn add_stage(&mut self, draft: StageDraft) -> ProjectStage {
        let stage = ProjectStage::new(draft);
        let snapshot = stage.clone();
        self.current_mut().add_stage(stage);
        self.save_to_store();
        snapshot
    }

    /// Removes a stage by id. `false` when no project is loaded; an
    /// unknown id is a no-op, not an error.
    pub fn remove_stage(&mut self, stage_id: &str) -> bool {
        let Some(project) = self.current.as_mut() else {
            return false;
        };
        project.remove_stage(stage_id);
        self.save_to_store();
        true
    }

    /// Replace-by-id stage update. `false` when no project is loaded.
    pub fn update_stage(&mut self, updated: ProjectStage) -> bool {
        let Some(project) = self.current.as_mut() else {
            return false;
        };
        project.update_stage(updated);
        self.save_to_store();
        true
    }

    /// Read-path stage lookup; `None` on miss.
    pub fn stage(&self, stage_id: &str) -> Option<&ProjectStage> {
        self.current.as_ref()?.stage(stage_id)
    }

    /// Appends a link built from the draft to the stage and persists.
    /// `None` when the stage is not found.
    pub fn add_link(&mut self, stage_id: &str, draft: LinkDraft) -> Option<Link> {
        let project = self.current.as_mut()?;
        let stage = project.stage_mut(stage_id)?;
        let link = Link::new(draft);
        let snapshot = link.clone();
        stage.add_link(link);
        project.touch();
        self.save_to_store();
        Some(snapshot)
    }

    /// Removes a link by id. `false` when the stage is not found.
    pub fn remove_link(&mut self, stage_id: &str, link_id: &str) -> bool {
        let Some(project) = self.current.as_mut() else {
            return false;
        };
        let Some(stage) = project.stage_mut(stage_id) else {
            return false;
        };
        stage.remove_link(link_id);
        project.touch();
        self.save_to_store();
        true
    }

    /// Replace-by-id link update. `false` when the stage is not found.
    pub fn update_link(&mut self, stage_id: &str, updated: Link) -> bool {
        let Some(project) = self.current.as_mut() else {
            return false;
        };
        let Some(stage) = project.stage_mut(stage_id) else {
            return false;
        };
        stage.update_link(updated);
        project.touch();
        self.save_to_store();
        true
    }

    /// Read-path link lookup; `None` on miss at either level.
    pub fn link(&self, stage_id: &str, link_id: &str) -> Option<&Link> {
        self.stage(stage_id)?.link(link_id)
    }

    /// Persists the current project under the fixed key. Failures are
    /// logged, never propagated.
    pub fn save_to_store(&self) {
        let Some(project) = &self.current else {
            return;
        };
        let payload = match json::stringify(project, true) {
            Ok(payload) => payload,
            Err(err) => {
                error!("event=store_save module=project_service status=error error={err}");
                return;
            }
        };
        if let Err(err) = self.store.set_item(STORAGE_KEY, &payload) {
            error!("event=store_save module=project_service status=error error={err}");
        }
    }

    /// Loads the persisted project into memory. Store and parse failures
    /// are logged and yield `None`, leaving the in-memory state as-is.
    pub fn load_from_store(&mut self) -> Option<&Project> {
        let project = self.read_stored_project()?;
        self.current = Some(project);
        self.current.as_ref()
    }

    /// Removes the persisted project. Failures are logged, never
    /// propagated.
    pub fn clear_store(&self) {
        if let Err(err) = self.store.remove_item(STORAGE_KEY) {
            error!("event=store_clear module=project_service status=error error={err}");
        }
    }

    /// Clears persisted state and rebuilds the default project
    /// unconditionally.
    pub fn reset_project(&mut self) -> &Project {
        self.clear_store();
        self.current = None;
        self.install_project(templates::default_project())
    }

    pub(crate) fn link_mut(&mut self, stage_id: &str, link_id: &str) -> Option<&mut Link> {
        self.current.as_mut()?.stage_mut(stage_id)?.link_mut(link_id)
    }

    /// Bumps the project timestamp and persists. Used by the item layer
    /// after tree mutations.
    pub(crate) fn commit(&mut self) {
        if let Some(project) = self.current.as_mut() {
            project.touch();
        }
        self.save_to_store();
    }

    pub(crate) fn current_mut(&mut self) -> &mut Project {
        if self.current.is_none() {
            match self.read_stored_project() {
                Some(project) => self.current = Some(project),
                None => {
                    self.current = Some(templates::default_project());
                    self.save_to_store();
                    info!("event=default_project module=project_service status=ok");
                }
            }
        }
        self.current
            .as_mut()
            .expect("current project is initialized above")
    }

    fn install_project(&mut self, project: Project) -> &Project {
        self.current = Some(project);
        self.save_to_store();
        self.current
            .as_ref()
            .expect("project was just installed")
    }

    fn read_stored_project(&self) -> Option<Project> {
        let raw = match self.store.get_item(STORAGE_KEY) {
            Ok(value) => value?,
            Err(err) => {
                error!("event=store_load module=project_service status=error error={err}");
                return None;
            }
        };
        match json::parse_project(&raw) {
            Ok(project) => Some(project),
            Err(err) => {
                error!(
                    "event=store_load module=project_service status=error \
                     error_code=corrupt_value error={err}"
                );
                None
            }
        }
    }
}
