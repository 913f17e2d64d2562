//! Workflow classification
//!
//! A workflow instance is structurally identified by a fixed two-hop
//! fingerprint: a genesis revision, then immediately a `link` revision
//! pointing at the matching system template. Classification is a local
//! lookup against the tree's own `file_index`, with no deep-link resolution
//! and no graph search.

use serde::{Deserialize, Serialize};

use crate::tree::{order_revisions, AquaTree, RevisionType};

/// Result of matching a tree against the known workflow templates
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WorkflowClassification {
    /// Whether the tree is an instance of a known workflow
    pub is_workflow: bool,

    /// The matched template name with any `.json` suffix stripped;
    /// empty when not a workflow
    pub workflow: String,
}

impl WorkflowClassification {
    /// The negative classification
    pub fn none() -> Self {
        Self {
            is_workflow: false,
            workflow: String::new(),
        }
    }

    fn matched(name: &str) -> Self {
        Self {
            is_workflow: true,
            workflow: name.to_string(),
        }
    }
}

/// Strip a trailing `.json` from a template or file name
fn strip_json_suffix(name: &str) -> &str {
    name.strip_suffix(".json").unwrap_or(name)
}

/// Classify a tree against a catalog of known template names
///
/// After ordering, the revision at index 1 must be a `link` whose first
/// target resolves through the tree's own `file_index` to a name matching
/// one of `known_templates` (both sides compared with `.json` stripped).
/// Trees with one or zero revisions are never workflows.
pub fn classify_workflow(
    tree: &AquaTree,
    known_templates: &[String],
) -> WorkflowClassification {
    let ordered = order_revisions(tree);
    if ordered.revisions.len() <= 1 {
        return WorkflowClassification::none();
    }

    let Some((_, second_revision)) = ordered.revisions.get_index(1) else {
        return WorkflowClassification::none();
    };
    if second_revision.kind() != Some(RevisionType::Link) {
        return WorkflowClassification::none();
    }
    let Some(target) = second_revision.link_target() else {
        return WorkflowClassification::none();
    };
    let Some(name) = ordered.file_index.get(target) else {
        return WorkflowClassification::none();
    };

    let stripped = strip_json_suffix(name);
    let is_known = known_templates
        .iter()
        .any(|template| strip_json_suffix(template) == stripped);

    if is_known {
        WorkflowClassification::matched(stripped)
    } else {
        WorkflowClassification::none()
    }
}
