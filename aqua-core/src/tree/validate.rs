//! AquaTree structural validation
//!
//! Enforces the per-type required-field invariants of the revision model.
//! Validation is pure inspection: it reports findings as data and never
//! panics or throws, so callers can decide between aborting and best-effort
//! processing. Unknown fields are tolerated everywhere (open-world).

use serde::{Deserialize, Serialize};

use super::revision::{Revision, RevisionType};
use super::AquaTree;

/// Result of validating an AquaTree's structure
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TreeValidation {
    /// Whether the tree satisfies all structural invariants
    pub is_valid: bool,

    /// Human-readable reason; names the offending field when invalid
    pub reason: String,
}

impl TreeValidation {
    /// Create a valid result
    pub fn valid() -> Self {
        Self {
            is_valid: true,
            reason: "valid aqua tree".to_string(),
        }
    }

    /// Create an invalid result with a specific reason
    pub fn invalid(reason: impl Into<String>) -> Self {
        Self {
            is_valid: false,
            reason: reason.into(),
        }
    }
}

/// Validate an AquaTree's structure
///
/// Checks, in order:
/// 1. The tree holds at least one revision
/// 2. Every revision carries `previous_verification_hash`,
///    `local_timestamp`, and a known `revision_type`
/// 3. Type-specific required fields are present (file, witness, signature,
///    link; form revisions have no fixed schema beyond the `forms_` prefix)
/// 4. `file_index` holds at least one entry
///
/// Runs before any other component is entitled to trust the tree's shape.
pub fn validate_aqua_tree(tree: &AquaTree) -> TreeValidation {
    if tree.revisions.is_empty() {
        return TreeValidation::invalid("aqua tree has no revisions");
    }

    for revision in tree.revisions.values() {
        if let Some(finding) = validate_revision(revision) {
            return finding;
        }
    }

    if tree.file_index.is_empty() {
        return TreeValidation::invalid("file_index is empty");
    }

    TreeValidation::valid()
}

fn validate_revision(revision: &Revision) -> Option<TreeValidation> {
    if revision.previous_verification_hash.is_none() {
        return Some(TreeValidation::invalid(
            "a revision must contain previous_verification_hash",
        ));
    }
    if revision.local_timestamp.is_none() {
        return Some(TreeValidation::invalid(
            "a revision must contain local_timestamp",
        ));
    }
    let Some(type_name) = revision.revision_type.as_deref() else {
        return Some(TreeValidation::invalid(
            "a revision must contain revision_type",
        ));
    };
    let Ok(kind) = type_name.parse::<RevisionType>() else {
        return Some(TreeValidation::invalid(format!(
            "unknown revision type {}",
            type_name
        )));
    };

    let required: Vec<(&str, bool)> = match kind {
        RevisionType::File => vec![
            ("file_hash", revision.file_hash.is_some()),
            ("file_nonce", revision.file_nonce.is_some()),
        ],
        RevisionType::Witness => vec![
            ("witness_merkle_root", revision.witness_merkle_root.is_some()),
            ("witness_timestamp", revision.witness_timestamp.is_some()),
            ("witness_network", revision.witness_network.is_some()),
            (
                "witness_smart_contract_address",
                revision.witness_smart_contract_address.is_some(),
            ),
            (
                "witness_transaction_hash",
                revision.witness_transaction_hash.is_some(),
            ),
            (
                "witness_sender_account_address",
                revision.witness_sender_account_address.is_some(),
            ),
        ],
        RevisionType::Signature => vec![
            ("signature", revision.signature.is_some()),
            (
                "signature_public_key",
                revision.signature_public_key.is_some(),
            ),
            ("signature_type", revision.signature_type.is_some()),
        ],
        RevisionType::Link => vec![
            ("link_type", revision.link_type.is_some()),
            (
                "link_verification_hashes",
                revision.link_verification_hashes.is_some(),
            ),
        ],
        // Form revisions have no fixed schema beyond the forms_ prefix
        RevisionType::Form => vec![],
    };

    for (field, present) in required {
        if !present {
            return Some(TreeValidation::invalid(format!(
                "{} revision must contain {}",
                kind, field
            )));
        }
    }

    if kind == RevisionType::Link
        && revision
            .link_verification_hashes
            .as_ref()
            .is_some_and(Vec::is_empty)
    {
        return Some(TreeValidation::invalid(
            "link revision's link_verification_hashes must not be empty",
        ));
    }

    None
}
