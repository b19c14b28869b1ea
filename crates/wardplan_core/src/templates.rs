//! Built-in project templates.
//!
//! # Responsibility
//! - Build the default project seeded on first run.
//! - Provide the fixed template catalog for quick project starts.
//!
//! # Invariants
//! - Every template project passes structural validation as-is.
//! - The default project is 9 stages × 6 links with one sample item on
//!   the first stage's first link.

use chrono::Utc;

use crate::model::item::{Item, ItemDraft, ItemPriority};
use crate::model::project::{
    Link, LinkDraft, Project, ProjectDraft, ProjectStage, StageDraft, DEFAULT_LINKS,
    DEFAULT_STAGES,
};

/// Fixed template catalog for new projects.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ProjectTemplate {
    /// Large general hospital with the full medical process scope.
    Comprehensive,
    /// Specialized hospital (oncology, cardiovascular, ...).
    Specialized,
    /// Community health center; reduced stage and link set.
    Community,
    /// Renovation/extension of an existing hospital.
    Renovation,
}

const COMMUNITY_STAGES: [&str; 6] = [
    "Project approval",
    "Schematic design",
    "Construction documents",
    "Construction",
    "Completion & acceptance",
    "Operations & maintenance",
];

const RENOVATION_STAGES: [&str; 7] = [
    "Condition survey",
    "Renovation scheme",
    "Construction documents",
    "Phased construction",
    "Systems commissioning",
    "Acceptance & handover",
    "Operations & maintenance",
];

impl ProjectTemplate {
    pub const ALL: [Self; 4] = [
        Self::Comprehensive,
        Self::Specialized,
        Self::Community,
        Self::Renovation,
    ];

    pub fn display_name(self) -> &'static str {
        match self {
            Self::Comprehensive => "General hospital construction project",
            Self::Specialized => "Specialized hospital construction project",
            Self::Community => "Community hospital construction project",
            Self::Renovation => "Hospital renovation & extension project",
        }
    }

    pub fn description(self) -> &'static str {
        match self {
            Self::Comprehensive => {
                "Large general hospital build with full medical process and equipment scope"
            }
            Self::Specialized => {
                "Specialized hospital build with discipline-specific process requirements"
            }
            Self::Community => "Community health center build with a reduced management scope",
            Self::Renovation => "Renovation and extension of an operating hospital",
        }
    }

    fn stage_names(self) -> &'static [&'static str] {
        match self {
            Self::Comprehensive | Self::Specialized => &DEFAULT_STAGES,
            Self::Community => &COMMUNITY_STAGES,
            Self::Renovation => &RENOVATION_STAGES,
        }
    }

    /// Community projects carry only the first five management threads.
    fn link_count(self) -> usize {
        match self {
            Self::Community => 5,
            _ => DEFAULT_LINKS.len(),
        }
    }
}

/// Builds the default project: the 9 default stages, each with the six
/// default links, one sample item on the first stage's first link.
pub fn default_project() -> Project {
    let mut project = Project::new(ProjectDraft {
        name: None,
        description: Some("Full lifecycle tracking for a hospital construction program".to_string()),
        start_date: Some(Utc::now().date_naive()),
        ..ProjectDraft::default()
    });

    for stage_name in DEFAULT_STAGES {
        let mut stage = new_stage(stage_name);
        for (link_name, owner) in DEFAULT_LINKS {
            stage.add_link(new_link(link_name, owner));
        }
        project.add_stage(stage);
    }

    if let Some(link) = project
        .stages
        .first_mut()
        .and_then(|stage| stage.links.first_mut())
    {
        link.add_item(Item::new(requirements_seed_item()));
    }

    project
}

/// Builds a template project: stage list and link count vary per
/// template, sample items are seeded per stage/link combination.
pub fn build_template(template: ProjectTemplate) -> Project {
    let mut project = Project::new(ProjectDraft {
        name: Some(template.display_name().to_string()),
        description: Some(template.description().to_string()),
        ..ProjectDraft::default()
    });

    for (stage_index, stage_name) in template.stage_names().iter().enumerate() {
        let mut stage = new_stage(stage_name);
        for (link_name, owner) in DEFAULT_LINKS.iter().take(template.link_count()) {
            let mut link = new_link(link_name, owner);
            for draft in sample_items(template, stage_index, stage_name, link_name) {
                link.add_item(Item::new(draft));
            }
            stage.add_link(link);
        }
        project.add_stage(stage);
    }

    project
}

fn new_stage(name: &str) -> ProjectStage {
    ProjectStage::new(StageDraft {
        name: name.to_string(),
        description: Some(format!("Work tracked during the {name} phase")),
        ..StageDraft::default()
    })
}

fn new_link(name: &str, owner: &str) -> Link {
    Link::new(LinkDraft {
        name: name.to_string(),
        owner: Some(owner.to_string()),
        ..LinkDraft::default()
    })
}

fn requirements_seed_item() -> ItemDraft {
    ItemDraft {
        description: "Front-load medical process requirements".to_string(),
        participants: vec![
            "Planning".to_string(),
            "Architecture".to_string(),
            "Medical process consultant".to_string(),
        ],
        priority: Some(ItemPriority::High),
        notes: Some("Pin down functional requirements and clinical workflows".to_string()),
        ..ItemDraft::default()
    }
}

fn sample_items(
    template: ProjectTemplate,
    stage_index: usize,
    stage_name: &str,
    link_name: &str,
) -> Vec<ItemDraft> {
    let mut drafts = Vec::new();

    if stage_index == 0 && link_name == "Requirement generation" {
        drafts.push(requirements_seed_item());
        if template == ProjectTemplate::Comprehensive {
            drafts.push(ItemDraft {
                description: "Survey specialist department requirements".to_string(),
                participants: vec![
                    "Medical process consultant".to_string(),
                    "Clinical experts".to_string(),
                    "Hospital representatives".to_string(),
                ],
                priority: Some(ItemPriority::High),
                notes: Some("Collect special requirements per clinical department".to_string()),
                ..ItemDraft::default()
            });
        }
    }

    if stage_name == "Construction documents" && link_name == "Design conversion" {
        drafts.push(ItemDraft {
            description: "Medical gas system design".to_string(),
            participants: vec![
                "MEP".to_string(),
                "Medical process".to_string(),
                "Equipment supplier".to_string(),
            ],
            notes: Some("Central oxygen supply and vacuum suction systems".to_string()),
            ..ItemDraft::default()
        });
        if template != ProjectTemplate::Community {
            drafts.push(ItemDraft {
                description: "Cleanroom operating suite design".to_string(),
                participants: vec![
                    "Architecture".to_string(),
                    "MEP".to_string(),
                    "Cleanroom specialist".to_string(),
                ],
                priority: Some(ItemPriority::High),
                notes: Some("Operating suites to cleanliness class requirements".to_string()),
                ..ItemDraft::default()
            });
        }
    }

    if matches!(stage_name, "Construction" | "Phased construction")
        && link_name == "Construction control"
    {
        drafts.push(ItemDraft {
            description: "Site quality and safety inspections".to_string(),
            participants: vec!["Site supervision".to_string(), "Safety officer".to_string()],
            ..ItemDraft::default()
        });
    }

    drafts
}
