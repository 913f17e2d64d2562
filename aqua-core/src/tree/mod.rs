//! AquaTree: hash-linked revision chains
//!
//! An AquaTree is a tamper-evident, content-addressed revision chain
//! describing a document's edit and attestation history:
//!
//! - **Content-addressed**: revisions are keyed by their verification hash
//! - **Hash-linked**: each revision names its parent via
//!   `previous_verification_hash`; the genesis revision has an empty parent
//! - **Append-only**: a tree grows by appending to the current tail, or by
//!   attaching a `link` revision that references another tree
//! - **Open-world**: unknown fields are preserved, never rejected
//!
//! Map insertion order is *not* semantically meaningful; the canonical
//! order is reconstructed from parent pointers by [`order_revisions`]. The
//! maps still preserve encounter order (via `IndexMap`) because the orderer
//! falls back to it for disconnected revisions.

mod compare;
mod order;
mod revision;
mod validate;

pub use compare::{compare_revision_sequences, Divergence, RevisionComparison};
pub use order::{
    file_name, genesis_hash, last_revision_hash, order_revisions, ordered_hashes,
};
pub use revision::{Revision, RevisionType};
pub use validate::{validate_aqua_tree, TreeValidation};

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::error::{AquaError, Result};

/// `chrono` format string for `local_timestamp` (`YYYYMMDDHHMMSS`)
pub const TIMESTAMP_FORMAT: &str = "%Y%m%d%H%M%S";

/// The root aggregate: a revision chain plus its file-name index
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AquaTree {
    /// Revision hash → revision
    pub revisions: IndexMap<String, Revision>,

    /// Revision hash → human-readable file name
    pub file_index: IndexMap<String, String>,
}

impl AquaTree {
    /// Parse and validate a tree from a JSON value
    ///
    /// This is the strict API boundary: untrusted input is decoded once,
    /// checked against the structural invariants, and only a valid tree is
    /// returned. Downstream components may then assume a well-formed tree.
    pub fn from_value(value: Value) -> Result<Self> {
        let Some(object) = value.as_object() else {
            return Err(AquaError::InvalidTree {
                reason: "an aqua tree must be a JSON object".to_string(),
            });
        };
        if !object.contains_key("revisions") || !object.contains_key("file_index") {
            return Err(AquaError::InvalidTree {
                reason: "an aqua tree must contain revisions and file_index".to_string(),
            });
        }

        let tree: AquaTree =
            serde_json::from_value(value).map_err(|e| AquaError::InvalidTree {
                reason: e.to_string(),
            })?;

        let validation = validate_aqua_tree(&tree);
        if !validation.is_valid {
            return Err(AquaError::InvalidTree {
                reason: validation.reason,
            });
        }
        Ok(tree)
    }

    /// Parse and validate a tree from JSON text
    pub fn parse(text: &str) -> Result<Self> {
        let value: Value = serde_json::from_str(text)?;
        Self::from_value(value)
    }

    /// Look up a revision by hash
    pub fn revision(&self, hash: &str) -> Option<&Revision> {
        self.revisions.get(hash)
    }

    /// Look up a revision by hash, failing with [`AquaError::RevisionNotFound`]
    pub fn require_revision(&self, hash: &str) -> Result<&Revision> {
        self.revisions
            .get(hash)
            .ok_or_else(|| AquaError::RevisionNotFound {
                hash: hash.to_string(),
            })
    }

    /// The genesis revision hash, failing with [`AquaError::MissingGenesis`]
    pub fn require_genesis(&self) -> Result<&str> {
        genesis_hash(self).ok_or(AquaError::MissingGenesis)
    }

    /// The genesis revision hash, or `None` for a malformed tree
    pub fn genesis_hash(&self) -> Option<&str> {
        genesis_hash(self)
    }

    /// The tree's primary file name: `file_index` at the genesis hash
    pub fn file_name(&self) -> Option<&str> {
        file_name(self)
    }

    /// Number of revisions
    pub fn len(&self) -> usize {
        self.revisions.len()
    }

    /// Whether the tree holds no revisions
    pub fn is_empty(&self) -> bool {
        self.revisions.is_empty()
    }

    /// Hashes of all `link`-type revisions, in encounter order
    pub fn link_revision_hashes(&self) -> Vec<String> {
        self.revisions
            .iter()
            .filter(|(_, revision)| revision.kind() == Some(RevisionType::Link))
            .map(|(hash, _)| hash.clone())
            .collect()
    }
}

/// Structural duck-check: does this JSON value look like an AquaTree?
///
/// Checks only for the presence of the `revisions` and `file_index` keys.
/// Use [`AquaTree::from_value`] when the full invariants matter.
pub fn is_aqua_tree_value(value: &Value) -> bool {
    value
        .as_object()
        .is_some_and(|object| object.contains_key("revisions") && object.contains_key("file_index"))
}

/// A file name paired with its raw content and declared size
///
/// A workflow instance is physically a small constellation of linked trees
/// (a document, a signature image, a system template) held as separate
/// `FileObject`s; the link resolver scans these to resolve hashes across
/// tree boundaries.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FileObject {
    pub file_name: String,
    pub file_content: FileContent,
    pub file_size: u64,
}

impl FileObject {
    /// Decode this file's content as a nested AquaTree, if it is one
    pub fn as_aqua_tree(&self) -> Option<AquaTree> {
        self.file_content.as_aqua_tree()
    }

    /// Content hash of the raw bytes (text or binary content only)
    pub fn content_hash(&self) -> Option<String> {
        match &self.file_content {
            FileContent::Text(text) => Some(crate::digest::file_hash(text.as_bytes())),
            FileContent::Bytes(bytes) => Some(crate::digest::file_hash(bytes)),
            _ => None,
        }
    }
}

/// File content: a nested tree, text, raw bytes, or arbitrary JSON
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(untagged)]
pub enum FileContent {
    /// Content that decoded as a nested AquaTree
    Tree(AquaTree),
    /// Text content, possibly JSON-encoded
    Text(String),
    /// Binary content
    Bytes(Vec<u8>),
    /// Any other JSON content
    Other(Value),
}

impl FileContent {
    /// Whether this content is (or parses as) a nested AquaTree
    pub fn is_aqua_tree(&self) -> bool {
        match self {
            FileContent::Tree(_) => true,
            FileContent::Text(text) => serde_json::from_str::<Value>(text)
                .map(|value| is_aqua_tree_value(&value))
                .unwrap_or(false),
            FileContent::Bytes(_) => false,
            FileContent::Other(value) => is_aqua_tree_value(value),
        }
    }

    /// Decode this content as a nested AquaTree
    ///
    /// `Tree` content is returned directly; text and loose JSON content go
    /// through the structural check first and are decoded leniently (the
    /// deep-link scanner must tolerate partially-synced trees, so this does
    /// not run the full validator).
    pub fn as_aqua_tree(&self) -> Option<AquaTree> {
        match self {
            FileContent::Tree(tree) => Some(tree.clone()),
            FileContent::Text(text) => {
                let value: Value = serde_json::from_str(text).ok()?;
                if !is_aqua_tree_value(&value) {
                    return None;
                }
                serde_json::from_value(value).ok()
            }
            FileContent::Bytes(_) => None,
            FileContent::Other(value) => {
                if !is_aqua_tree_value(value) {
                    return None;
                }
                serde_json::from_value(value.clone()).ok()
            }
        }
    }
}

/// Find the FileObject carrying the tree's primary file
///
/// Matches [`AquaTree::file_name`] (the genesis entry of `file_index`)
/// against the available file objects by name.
pub fn genesis_file_object<'a>(
    tree: &AquaTree,
    file_objects: &'a [FileObject],
) -> Option<&'a FileObject> {
    let name = file_name(tree)?;
    file_objects.iter().find(|file| file.file_name == name)
}

/// Render a `local_timestamp` for display
///
/// `"20250123170100"` becomes `"23 January 2025"`, or
/// `"23 January 2025, 17:01:00"` with `show_time`. Unparseable or missing
/// input renders as `"-"`.
pub fn human_timestamp(timestamp: &str, show_time: bool) -> String {
    match chrono::NaiveDateTime::parse_from_str(timestamp, TIMESTAMP_FORMAT) {
        Ok(parsed) if show_time => parsed.format("%-d %B %Y, %H:%M:%S").to_string(),
        Ok(parsed) => parsed.format("%-d %B %Y").to_string(),
        Err(_) => "-".to_string(),
    }
}

/// Index of the tree holding the most recent revision
///
/// Scans every revision's `local_timestamp` (lexicographic comparison works
/// for the `YYYYMMDDHHMMSS` format) and returns the index of the tree that
/// contains the greatest one. `None` when no tree carries a timestamp.
pub fn latest_tree(trees: &[AquaTree]) -> Option<usize> {
    let mut latest: Option<(usize, &str)> = None;
    for (index, tree) in trees.iter().enumerate() {
        for revision in tree.revisions.values() {
            if let Some(timestamp) = revision.local_timestamp.as_deref() {
                if latest.map_or(true, |(_, best)| timestamp > best) {
                    latest = Some((index, timestamp));
                }
            }
        }
    }
    latest.map(|(index, _)| index)
}
