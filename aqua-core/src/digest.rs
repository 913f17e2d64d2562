//! Content hashing helpers
//!
//! File revisions carry a `file_hash` over the raw file content. These
//! helpers compute the same digest locally so callers can detect duplicate
//! uploads and associate loose file content with the revision that recorded
//! it, without a round trip to the notarization service.

use sha2::{Digest, Sha256};

use crate::tree::{AquaTree, RevisionType};

/// SHA-256 digest of `bytes`, hex-encoded
pub fn sha256_hex(bytes: &[u8]) -> String {
    let mut hasher = Sha256::new();
    hasher.update(bytes);
    hex::encode(hasher.finalize())
}

/// Content hash of a file, as recorded in a file revision's `file_hash`
pub fn file_hash(bytes: &[u8]) -> String {
    sha256_hex(bytes)
}

/// Whether any `file` revision in any tree records this content hash
///
/// Used to answer "has this file already been notarized?" before starting
/// a new chain for it.
pub fn contains_file_hash(trees: &[AquaTree], hash: &str) -> bool {
    trees.iter().any(|tree| {
        tree.revisions.values().any(|revision| {
            revision.kind() == Some(RevisionType::File)
                && revision.file_hash.as_deref() == Some(hash)
        })
    })
}
