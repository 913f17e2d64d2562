//! Workflow semantics over revision chains
//!
//! A *workflow* is a named template shape (e.g. `aqua_sign`,
//! `identity_claim`) that a tree's early link-chain is fingerprinted
//! against to classify its purpose:
//!
//! - **Classification**: does this tree instantiate a known template?
//! - **Claim extraction**: pull the `forms_*` payload out of identity-style
//!   workflows
//! - **Contract extraction**: decode the multi-signer `aqua_sign` shape,
//!   including which expected signers are still outstanding
//!
//! The catalog of known template names is always an explicit parameter;
//! where it comes from (a backend endpoint, a local cache) is the caller's
//! concern, which keeps everything here pure and testable.

mod classify;
mod claim;
mod contract;

pub use classify::{classify_workflow, WorkflowClassification};
pub use claim::{
    claim_recommendations, extract_simple_claim, find_identity_claim, ClaimInformation,
    IdentityClaimDetails, CLAIM_WORKFLOWS,
};
pub use contract::{
    extract_contract_info, highest_form_index, signature_revision_hashes,
    ContractInformation, SignatureEvent,
};

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tree::AquaTree;
    use serde_json::json;

    #[test]
    fn test_classify_then_extract_claim() {
        let tree: AquaTree = serde_json::from_value(json!({
            "revisions": {
                "0xgen": {
                    "previous_verification_hash": "",
                    "local_timestamp": "20250101120000",
                    "revision_type": "form",
                    "forms_type": "identity_claim",
                    "forms_name": "Alice",
                    "forms_wallet_address": "0xabc"
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
                "0xgen": "claim.json",
                "0xtemplate": "identity_claim.json"
            }
        }))
        .unwrap();

        let templates = vec!["identity_claim".to_string()];
        let classification = classify_workflow(&tree, &templates);
        assert!(classification.is_workflow);
        assert_eq!(classification.workflow, "identity_claim");

        let claim = extract_simple_claim(&tree);
        assert!(claim.is_claim_valid);
        assert_eq!(claim.wallet_address.as_deref(), Some("0xabc"));
    }
}
