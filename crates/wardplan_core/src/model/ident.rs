//! Opaque entity identifier generation.
//!
//! Identifiers are `<prefix>-<millis>-<suffix>`: creation time in Unix
//! milliseconds plus a random hex suffix. Unique enough for practical
//! purposes; collisions are a latent risk, not defended against.

use chrono::Utc;
use uuid::Uuid;

const SUFFIX_LEN: usize = 9;

/// Generates a prefixed opaque identifier.
pub fn generate(prefix: &str) -> String {
    let millis = Utc::now().timestamp_millis();
    let hex = Uuid::new_v4().simple().to_string();
    format!("{prefix}-{millis}-{}", &hex[..SUFFIX_LEN])
}

pub(crate) fn new_item_id() -> String {
    generate("item")
}

pub(crate) fn new_link_id() -> String {
    generate("link")
}

pub(crate) fn new_stage_id() -> String {
    generate("stage")
}

pub(crate) fn new_project_id() -> String {
    generate("project")
}

#[cfg(test)]
mod tests {
    use super::generate;

    #[test]
    fn generated_ids_carry_prefix_and_differ() {
        let first = generate("item");
        let second = generate("item");

        assert!(first.starts_with("item-"));
        assert!(second.starts_with("item-"));
        assert_ne!(first, second);
    }
}
