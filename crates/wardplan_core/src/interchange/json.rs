//! JSON codec wrappers, structural validation and additive merge.
//!
//! # Responsibility
//! - Wrap serde_json behind domain `ParseError`/`SerializeError`.
//! - Validate the stages→links→items wire shape, reporting every defect.
//! - Merge two project trees by stage/link name.
//!
//! # Invariants
//! - Validation reports one error string per missing field per entity,
//!   not just the first.
//! - Merge preserves base items before incoming items within a link.

use std::error::Error;
use std::fmt::{Display, Formatter};

use serde::Serialize;
use serde_json::Value;

use crate::model::project::Project;

/// Malformed JSON text.
#[derive(Debug)]
pub struct ParseError(serde_json::Error);

impl Display for ParseError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "failed to parse JSON: {}", self.0)
    }
}

impl Error for ParseError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        Some(&self.0)
    }
}

/// JSON serialization failure.
#[derive(Debug)]
pub struct SerializeError(serde_json::Error);

impl Display for SerializeError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "failed to serialize JSON: {}", self.0)
    }
}

impl Error for SerializeError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        Some(&self.0)
    }
}

/// Advisory structural check result.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidationReport {
    pub is_valid: bool,
    pub errors: Vec<String>,
}

impl ValidationReport {
    pub fn from_errors(errors: Vec<String>) -> Self {
        Self {
            is_valid: errors.is_empty(),
            errors,
        }
    }
}

/// Parses JSON text into a generic value.
pub fn parse(text: &str) -> Result<Value, ParseError> {
    serde_json::from_str(text).map_err(ParseError)
}

/// Parses JSON text into a project, defaulting missing optional fields.
pub fn parse_project(text: &str) -> Result<Project, ParseError> {
    serde_json::from_str(text).map_err(ParseError)
}

/// Serializes a value to JSON text, pretty-printed when requested.
pub fn stringify<T: Serialize>(value: &T, pretty: bool) -> Result<String, SerializeError> {
    let result = if pretty {
        serde_json::to_string_pretty(value)
    } else {
        serde_json::to_string(value)
    };
    result.map_err(SerializeError)
}

/// Returns whether the text is well-formed JSON.
pub fn is_valid_json(text: &str) -> bool {
    parse(text).is_ok()
}

/// Minified serialization.
pub fn compress<T: Serialize>(value: &T) -> Result<String, SerializeError> {
    stringify(value, false)
}

/// Re-indents JSON text.
pub fn prettify(text: &str) -> Result<String, ParseError> {
    let value = parse(text)?;
    serde_json::to_string_pretty(&value).map_err(ParseError)
}

/// Structural schema check over the stages→links→items shape.
///
/// Collects every defect in one pass; an empty child list is valid.
pub fn validate_project_data(data: &Value) -> ValidationReport {
    let mut errors = Vec::new();

    let Some(root) = data.as_object() else {
        errors.push("project data must be a JSON object".to_string());
        return ValidationReport::from_errors(errors);
    };

    match root.get("stages") {
        Some(Value::Array(stages)) => {
            for (stage_index, stage) in stages.iter().enumerate() {
                validate_stage(stage, stage_index + 1, &mut errors);
            }
        }
        Some(_) => errors.push("`stages` must be an array".to_string()),
        None => errors.push("missing required field `stages`".to_string()),
    }

    ValidationReport::from_errors(errors)
}

fn validate_stage(stage: &Value, stage_no: usize, errors: &mut Vec<String>) {
    require_string_field(stage, "id", &format!("stage {stage_no}"), errors);
    require_string_field(stage, "name", &format!("stage {stage_no}"), errors);

    match stage.get("links") {
        Some(Value::Array(links)) => {
            for (link_index, link) in links.iter().enumerate() {
                validate_link(link, stage_no, link_index + 1, errors);
            }
        }
        _ => errors.push(format!(
            "stage {stage_no} is missing required field `links` or it is not an array"
        )),
    }
}

fn validate_link(link: &Value, stage_no: usize, link_no: usize, errors: &mut Vec<String>) {
    let context = format!("stage {stage_no} link {link_no}");
    require_string_field(link, "id", &context, errors);
    require_string_field(link, "name", &context, errors);

    match link.get("items") {
        Some(Value::Array(items)) => {
            for (item_index, item) in items.iter().enumerate() {
                let item_context = format!("{context} item {}", item_index + 1);
                require_string_field(item, "id", &item_context, errors);
                require_string_field(item, "description", &item_context, errors);
            }
        }
        _ => errors.push(format!(
            "{context} is missing required field `items` or it is not an array"
        )),
    }
}

fn require_string_field(entity: &Value, field: &str, context: &str, errors: &mut Vec<String>) {
    let present = entity
        .get(field)
        .and_then(Value::as_str)
        .is_some_and(|value| !value.is_empty());
    if !present {
        errors.push(format!("{context} is missing required field `{field}`"));
    }
}

/// Additive merge of two project trees by stage/link name.
///
/// Matched stage + matched link: incoming items are appended after the
/// base items, no deduplication. Unmatched links and stages are appended
/// whole. Duplicate names target the first match.
pub fn merge_project_data(base: &Project, incoming: &Project) -> Project {
    let mut merged = base.clone();

    for incoming_stage in &incoming.stages {
        match merged
            .stages
            .iter_mut()
            .find(|stage| stage.name == incoming_stage.name)
        {
            Some(stage) => {
                for incoming_link in &incoming_stage.links {
                    match stage
                        .links
                        .iter_mut()
                        .find(|link| link.name == incoming_link.name)
                    {
                        Some(link) => {
                            link.items.extend(incoming_link.items.iter().cloned());
                        }
                        None => stage.links.push(incoming_link.clone()),
                    }
                }
            }
            None => merged.stages.push(incoming_stage.clone()),
        }
    }

    merged
}
