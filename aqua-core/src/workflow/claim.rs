//! Claim extraction
//!
//! Identity-style workflows (simple claim, identity claim, email claim …)
//! carry their payload as `forms_*` fields on the genesis revision. The
//! extractor pulls those out into an ordered projection; it never fails on
//! missing optional fields and leaves the validity decision to the caller.

use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::BTreeMap;

use super::classify_workflow;
use crate::tree::{ordered_hashes, AquaTree};

/// Workflow names whose instances represent a claim owned by a wallet
pub const CLAIM_WORKFLOWS: [&str; 4] = [
    "simple_claim",
    "identity_claim",
    "user_signature",
    "email_claim",
];

/// Projection of a claim workflow's genesis form data
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ClaimInformation {
    /// Whether the genesis revision carries a recognised claim marker
    /// (`forms_type`, or `forms_ens_name` for ENS claims)
    pub is_claim_valid: bool,

    /// All `forms_*` fields of the genesis revision, keys in ascending
    /// order
    pub claim_information: BTreeMap<String, Value>,

    /// The claimant's wallet address (`forms_wallet_address`)
    pub wallet_address: Option<String>,

    /// Hash of the chain's latest revision
    pub latest_revision_hash: Option<String>,

    /// Hash of the chain's genesis revision
    pub genesis_hash: Option<String>,
}

impl ClaimInformation {
    fn invalid() -> Self {
        Self {
            is_claim_valid: false,
            claim_information: BTreeMap::new(),
            wallet_address: None,
            latest_revision_hash: None,
            genesis_hash: None,
        }
    }
}

/// Extract the claim projection from a tree's genesis revision
///
/// Orders the chain, reads the genesis revision's `forms_*` fields into an
/// alphabetically-sorted map, and surfaces the claimant identity plus the
/// chain endpoints. A tree without a claim marker (or without revisions)
/// yields `is_claim_valid: false` and empty fields.
pub fn extract_simple_claim(tree: &AquaTree) -> ClaimInformation {
    let hashes = ordered_hashes(tree);
    let Some(first_hash) = hashes.first() else {
        return ClaimInformation::invalid();
    };
    let Some(first_revision) = tree.revisions.get(first_hash) else {
        return ClaimInformation::invalid();
    };

    let is_claim_valid = first_revision.form_field("forms_type").is_some()
        || first_revision.form_field("forms_ens_name").is_some();
    if !is_claim_valid {
        return ClaimInformation::invalid();
    }

    ClaimInformation {
        is_claim_valid,
        claim_information: first_revision.forms_fields(),
        wallet_address: first_revision
            .form_str("forms_wallet_address")
            .map(str::to_string),
        latest_revision_hash: hashes.last().cloned(),
        genesis_hash: Some(first_hash.clone()),
    }
}

/// Identity details recovered from a wallet's claim tree
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct IdentityClaimDetails {
    /// Display name: `forms_name`, falling back to `forms_email`
    pub name: String,
}

/// Find the identity claim belonging to a wallet address
///
/// Scans `trees` for the first claim-shaped workflow instance (per
/// [`CLAIM_WORKFLOWS`]) whose genesis `forms_wallet_address` equals
/// `wallet_address`, and returns its display name.
pub fn find_identity_claim(
    trees: &[AquaTree],
    known_templates: &[String],
    wallet_address: &str,
) -> Option<IdentityClaimDetails> {
    let claim = trees.iter().find(|tree| {
        let classification = classify_workflow(tree, known_templates);
        if !classification.is_workflow
            || !CLAIM_WORKFLOWS.contains(&classification.workflow.as_str())
        {
            return false;
        }
        genesis_form_str(tree, "forms_wallet_address") == Some(wallet_address)
    })?;

    let name = genesis_form_str(claim, "forms_name")
        .or_else(|| genesis_form_str(claim, "forms_email"))
        .unwrap_or_default()
        .to_string();

    Some(IdentityClaimDetails { name })
}

/// Label → wallet address pairs recovered from claim workflows
///
/// Feeds recipient auto-completion: every claim tree contributes the pair
/// its workflow kind defines (name, attested context, phone number, domain
/// or email, each mapped to the claiming wallet address).
pub fn claim_recommendations(
    trees: &[AquaTree],
    known_templates: &[String],
) -> BTreeMap<String, String> {
    let mut recommended = BTreeMap::new();

    for tree in trees {
        let classification = classify_workflow(tree, known_templates);
        if !classification.is_workflow {
            continue;
        }

        let pair = match classification.workflow.as_str() {
            "identity_claim" => (
                genesis_form_str(tree, "forms_name"),
                genesis_form_str(tree, "forms_wallet_address"),
            ),
            "identity_attestation" => {
                // key spelling matches the template wire format
                if genesis_form_str(tree, "forms_attestion_type") != Some("user") {
                    continue;
                }
                (
                    genesis_form_str(tree, "forms_context"),
                    genesis_form_str(tree, "forms_claim_wallet_address"),
                )
            }
            "phone_number_claim" => (
                genesis_form_str(tree, "forms_phone_number"),
                genesis_form_str(tree, "forms_wallet_address"),
            ),
            "domain_claim" => (
                genesis_form_str(tree, "forms_domain"),
                genesis_form_str(tree, "forms_wallet_address"),
            ),
            "email_claim" => (
                genesis_form_str(tree, "forms_email"),
                genesis_form_str(tree, "forms_wallet_address"),
            ),
            _ => continue,
        };

        if let (Some(label), Some(address)) = pair {
            recommended.insert(label.to_string(), address.to_string());
        }
    }

    recommended
}

/// Form field of the genesis revision, in chain order
fn genesis_form_str<'a>(tree: &'a AquaTree, key: &str) -> Option<&'a str> {
    let hashes = ordered_hashes(tree);
    let first = hashes.first()?;
    tree.revisions.get(first)?.form_str(key)
}
