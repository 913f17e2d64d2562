//! Chain ordering
//!
//! Reconstructs the canonical linear order of a revision chain from its
//! parent-hash pointers. The walk starts at the genesis revision and
//! repeatedly looks for the revision whose `previous_verification_hash`
//! equals the current hash. A visited set guards against cycles so an
//! untrusted tree can never induce an infinite walk.
//!
//! Ordering degrades gracefully rather than erroring:
//! - no genesis found ⇒ the original encounter order is returned, and
//!   callers must treat that as "ordering not possible", not as a verified
//!   chain prefix
//! - revisions not reached by the walk (disconnected or forked branches)
//!   are appended at the end in encounter order

use std::collections::HashSet;

use super::AquaTree;

/// The genesis revision hash: the unique revision with an empty parent hash
///
/// Returns `None` when no revision qualifies (malformed tree). When more
/// than one qualifies the first in encounter order wins; such a tree is
/// ambiguous and ordering is best-effort.
pub fn genesis_hash(tree: &AquaTree) -> Option<&str> {
    tree.revisions
        .iter()
        .find(|(_, revision)| revision.is_genesis())
        .map(|(hash, _)| hash.as_str())
}

/// The tree's primary file name: `file_index` at the genesis hash
pub fn file_name(tree: &AquaTree) -> Option<&str> {
    let genesis = genesis_hash(tree)?;
    tree.file_index.get(genesis).map(String::as_str)
}

/// Revision hashes in canonical chain order
///
/// Deterministic for a given input map, and a fixed point: ordering an
/// already-ordered tree changes nothing.
pub fn ordered_hashes(tree: &AquaTree) -> Vec<String> {
    if tree.revisions.is_empty() {
        return Vec::new();
    }

    let Some(genesis) = genesis_hash(tree) else {
        return tree.revisions.keys().cloned().collect();
    };

    let mut ordered: Vec<String> = Vec::with_capacity(tree.revisions.len());
    let mut visited: HashSet<&str> = HashSet::with_capacity(tree.revisions.len());

    let mut current: Option<&str> = Some(genesis);
    while let Some(hash) = current {
        if !visited.insert(hash) {
            break;
        }
        ordered.push(hash.to_string());

        current = tree
            .revisions
            .iter()
            .find(|(successor, revision)| {
                revision.previous_verification_hash.as_deref() == Some(hash)
                    && !visited.contains(successor.as_str())
            })
            .map(|(successor, _)| successor.as_str());
    }

    // Disconnected revisions keep their encounter order at the end
    for hash in tree.revisions.keys() {
        if !visited.contains(hash.as_str()) {
            ordered.push(hash.clone());
        }
    }

    ordered
}

/// Rebuild the tree with its revisions in canonical chain order
///
/// The `file_index` is carried over unchanged; only the iteration order of
/// `revisions` differs. Consumers that iterate "in order" (the classifier
/// and the extractors) rely on this.
pub fn order_revisions(tree: &AquaTree) -> AquaTree {
    let mut ordered = AquaTree {
        revisions: indexmap::IndexMap::with_capacity(tree.revisions.len()),
        file_index: tree.file_index.clone(),
    };
    for hash in ordered_hashes(tree) {
        if let Some(revision) = tree.revisions.get(&hash) {
            ordered.revisions.insert(hash, revision.clone());
        }
    }
    ordered
}

/// Hash of the latest revision: the tail of the canonical order
pub fn last_revision_hash(tree: &AquaTree) -> Option<String> {
    ordered_hashes(tree).pop()
}
