//! Link and deep-link resolution
//!
//! A `link` revision references another revision by hash instead of
//! carrying content itself. Resolution is two-tier:
//!
//! - **Direct link**: the target hash appears in the same tree's
//!   `file_index`; the associated name is returned directly.
//! - **Deep link**: the target is not known locally. The available
//!   [`FileObject`]s are scanned for nested AquaTrees whose `revisions` map
//!   contains the target; the first match resolves to that tree's own
//!   genesis file name.
//!
//! Outcomes are data, never exceptions, so display code can render a
//! placeholder instead of crashing. The legacy sentinel strings remain part
//! of the observable contract at the display edge ([`LinkResolution::display_name`]);
//! internally the three-way distinction is a proper enum.

use serde::{Deserialize, Serialize};

use crate::error::{AquaError, Result};
use crate::tree::{genesis_hash, AquaTree, FileObject, Revision, RevisionType};

/// Sentinel returned where a link target is definitively unresolvable
pub const ERROR_TEXT: &str = "--error--";

/// Sentinel returned where link classification itself is indeterminate
pub const ERROR_UNKNOWN: &str = "--unknown--";

/// Outcome of resolving a link revision to a file name
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LinkResolution {
    /// The target resolved to a file name
    Resolved(String),
    /// The target is definitively not resolvable in any available tree
    NotFound,
    /// Classification was indeterminate (e.g. the revision is missing or
    /// carries no link targets)
    Unknown,
}

impl LinkResolution {
    /// The resolved name, or the legacy sentinel string
    ///
    /// `NotFound` maps to [`ERROR_TEXT`] and `Unknown` to [`ERROR_UNKNOWN`],
    /// byte-compatible with callers that still expect the sentinels.
    pub fn display_name(&self) -> &str {
        match self {
            LinkResolution::Resolved(name) => name,
            LinkResolution::NotFound => ERROR_TEXT,
            LinkResolution::Unknown => ERROR_UNKNOWN,
        }
    }

    /// The resolved name, if any
    pub fn resolved(self) -> Option<String> {
        match self {
            LinkResolution::Resolved(name) => Some(name),
            _ => None,
        }
    }

    /// Convert to a strict result, attributing failures to `hash`
    pub fn into_result(self, hash: &str) -> Result<String> {
        match self {
            LinkResolution::Resolved(name) => Ok(name),
            LinkResolution::NotFound => Err(AquaError::UnresolvedLink {
                hash: hash.to_string(),
            }),
            LinkResolution::Unknown => Err(AquaError::RevisionNotFound {
                hash: hash.to_string(),
            }),
        }
    }
}

/// Classify a link revision as direct or deep
///
/// - `Some(false)`: the target hash is present in this tree's `file_index`
///   (direct link)
/// - `Some(true)`: the target must be resolved in a different tree (deep
///   link)
/// - `None`: indeterminate; the revision is absent, or carries no link
///   targets
pub fn is_deep_link_revision(tree: &AquaTree, revision_hash: &str) -> Option<bool> {
    let revision = tree.revisions.get(revision_hash)?;
    let target = revision.link_target()?;
    Some(!tree.file_index.contains_key(target))
}

/// Resolve a link revision through this tree's own `file_index` only
pub fn fetch_linked_file_name(tree: &AquaTree, revision: &Revision) -> LinkResolution {
    let Some(target) = revision.link_target() else {
        return LinkResolution::NotFound;
    };
    match tree.file_index.get(target) {
        Some(name) => LinkResolution::Resolved(name.clone()),
        None => LinkResolution::NotFound,
    }
}

/// Resolve the file name a revision points at, across tree boundaries
///
/// For the genesis revision the tree's own `file_index` entry is returned.
/// For a `link` revision, direct links resolve locally and deep links are
/// resolved by scanning `file_objects` for a nested tree containing the
/// target hash, recursing into that tree's genesis file name. Any other
/// revision type is not resolvable.
pub fn resolve_linked_file_name(
    tree: &AquaTree,
    revision_hash: &str,
    file_objects: &[FileObject],
) -> LinkResolution {
    let Some(revision) = tree.revisions.get(revision_hash) else {
        return LinkResolution::Unknown;
    };

    if revision.is_genesis() {
        return match tree.file_index.get(revision_hash) {
            Some(name) => LinkResolution::Resolved(name.clone()),
            None => LinkResolution::NotFound,
        };
    }

    if revision.kind() != Some(RevisionType::Link) {
        return LinkResolution::NotFound;
    }

    match is_deep_link_revision(tree, revision_hash) {
        None => LinkResolution::Unknown,
        Some(false) => fetch_linked_file_name(tree, revision),
        Some(true) => {
            let Some(target) = revision.link_target() else {
                return LinkResolution::Unknown;
            };
            resolve_in_nested_trees(target, file_objects)
        }
    }
}

/// Scan the available file objects for a nested tree containing `target`
fn resolve_in_nested_trees(target: &str, file_objects: &[FileObject]) -> LinkResolution {
    for file in file_objects {
        let Some(nested) = file.as_aqua_tree() else {
            continue;
        };
        if !nested.revisions.contains_key(target) {
            continue;
        }
        if let Some(genesis) = genesis_hash(&nested) {
            if let Some(name) = nested.file_index.get(genesis) {
                return LinkResolution::Resolved(name.clone());
            }
        }
    }
    LinkResolution::NotFound
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tree::FileContent;
    use serde_json::json;

    /// Tree A: genesis file + link whose target lives in tree B
    fn tree_with_deep_link() -> AquaTree {
        serde_json::from_value(json!({
            "revisions": {
                "0xgen_a": {
                    "previous_verification_hash": "",
                    "local_timestamp": "20250101120000",
                    "revision_type": "file",
                    "file_hash": "hash-a",
                    "file_nonce": "n-a"
                },
                "0xlink_a": {
                    "previous_verification_hash": "0xgen_a",
                    "local_timestamp": "20250101120100",
                    "revision_type": "link",
                    "link_type": "aqua",
                    "link_verification_hashes": ["0xgen_b"]
                }
            },
            "file_index": { "0xgen_a": "contract.json" }
        }))
        .unwrap()
    }

    /// Tree B: holds the deep-link target, genesis file name "doc.pdf"
    fn tree_b() -> AquaTree {
        serde_json::from_value(json!({
            "revisions": {
                "0xgen_b": {
                    "previous_verification_hash": "",
                    "local_timestamp": "20250101110000",
                    "revision_type": "file",
                    "file_hash": "hash-b",
                    "file_nonce": "n-b"
                }
            },
            "file_index": { "0xgen_b": "doc.pdf" }
        }))
        .unwrap()
    }

    fn file_objects() -> Vec<FileObject> {
        vec![
            FileObject {
                file_name: "contract.json".to_string(),
                file_content: FileContent::Tree(tree_with_deep_link()),
                file_size: 0,
            },
            FileObject {
                file_name: "doc.pdf.aqua.json".to_string(),
                file_content: FileContent::Tree(tree_b()),
                file_size: 0,
            },
        ]
    }

    #[test]
    fn test_deep_link_resolves_through_nested_tree() {
        let tree = tree_with_deep_link();
        let result = resolve_linked_file_name(&tree, "0xlink_a", &file_objects());
        assert_eq!(result, LinkResolution::Resolved("doc.pdf".to_string()));
    }

    #[test]
    fn test_deep_link_without_matching_tree_is_not_found() {
        let tree = tree_with_deep_link();
        let result = resolve_linked_file_name(&tree, "0xlink_a", &[]);
        assert_eq!(result, LinkResolution::NotFound);
        assert_eq!(result.display_name(), ERROR_TEXT);
    }

    #[test]
    fn test_direct_link_resolves_locally() {
        let tree: AquaTree = serde_json::from_value(json!({
            "revisions": {
                "0xgen": {
                    "previous_verification_hash": "",
                    "local_timestamp": "20250101120000",
                    "revision_type": "file",
                    "file_hash": "h",
                    "file_nonce": "n"
                },
                "0xlink": {
                    "previous_verification_hash": "0xgen",
                    "local_timestamp": "20250101120100",
                    "revision_type": "link",
                    "link_type": "aqua",
                    "link_verification_hashes": ["0xtemplate"]
                }
            },
            "file_index": {
                "0xgen": "form.json",
                "0xtemplate": "aqua_sign.json"
            }
        }))
        .unwrap();

        assert_eq!(is_deep_link_revision(&tree, "0xlink"), Some(false));
        let result = resolve_linked_file_name(&tree, "0xlink", &[]);
        assert_eq!(
            result,
            LinkResolution::Resolved("aqua_sign.json".to_string())
        );
    }

    #[test]
    fn test_missing_revision_is_unknown() {
        let tree = tree_with_deep_link();
        let result = resolve_linked_file_name(&tree, "0xnope", &[]);
        assert_eq!(result, LinkResolution::Unknown);
        assert_eq!(result.display_name(), ERROR_UNKNOWN);
    }

    #[test]
    fn test_genesis_resolves_to_own_index_entry() {
        let tree = tree_with_deep_link();
        let result = resolve_linked_file_name(&tree, "0xgen_a", &[]);
        assert_eq!(
            result,
            LinkResolution::Resolved("contract.json".to_string())
        );
    }

    #[test]
    fn test_non_link_revision_is_not_found() {
        let tree: AquaTree = serde_json::from_value(json!({
            "revisions": {
                "0xgen": {
                    "previous_verification_hash": "",
                    "local_timestamp": "20250101120000",
                    "revision_type": "file",
                    "file_hash": "h",
                    "file_nonce": "n"
                },
                "0xsig": {
                    "previous_verification_hash": "0xgen",
                    "local_timestamp": "20250101120100",
                    "revision_type": "signature",
                    "signature": "0xsig",
                    "signature_public_key": "0xkey",
                    "signature_type": "ethereum:eip-191"
                }
            },
            "file_index": { "0xgen": "doc.pdf" }
        }))
        .unwrap();

        let result = resolve_linked_file_name(&tree, "0xsig", &[]);
        assert_eq!(result, LinkResolution::NotFound);
    }

    #[test]
    fn test_is_deep_link_revision_indeterminate_cases() {
        let tree = tree_with_deep_link();
        assert_eq!(is_deep_link_revision(&tree, "0xmissing"), None);
        // 0xgen_a is not a link revision and has no link targets
        assert_eq!(is_deep_link_revision(&tree, "0xgen_a"), None);
        assert_eq!(is_deep_link_revision(&tree, "0xlink_a"), Some(true));
    }

    #[test]
    fn test_into_result() {
        assert_eq!(
            LinkResolution::Resolved("doc.pdf".to_string())
                .into_result("0xh")
                .unwrap(),
            "doc.pdf"
        );
        assert!(LinkResolution::NotFound.into_result("0xh").is_err());
        assert!(LinkResolution::Unknown.into_result("0xh").is_err());
    }

    #[test]
    fn test_deep_link_through_serialized_text_content() {
        // Tree B arrives as JSON text rather than a parsed tree
        let tree = tree_with_deep_link();
        let files = vec![FileObject {
            file_name: "doc.pdf.aqua.json".to_string(),
            file_content: FileContent::Text(
                serde_json::to_string(&tree_b()).unwrap(),
            ),
            file_size: 0,
        }];

        let result = resolve_linked_file_name(&tree, "0xlink_a", &files);
        assert_eq!(result, LinkResolution::Resolved("doc.pdf".to_string()));
    }
}
