//! # Aqua Core - AquaTree revision-graph processing
//!
//! Aqua Core interprets, validates, orders and semantically classifies
//! **AquaTrees**: hash-linked, tamper-evident revision chains produced by a
//! document-notarization protocol.
//!
//! - **Validation**: per-type structural invariants, reported as data
//! - **Ordering**: canonical chain order reconstructed from parent-hash
//!   pointers, with an explicit cycle guard
//! - **Link resolution**: direct and deep links, resolved across a
//!   constellation of in-memory trees
//! - **Classification**: template fingerprinting ("is this tree an
//!   `aqua_sign` instance?")
//! - **Comparison**: positional diff/merge of revision histories for
//!   divergence detection
//! - **Extraction**: claim and multi-signer contract projections
//!
//! ## Core Principle
//!
//! Every function is synchronous, side-effect-free and operates on
//! fully-materialized in-memory values. I/O (fetching trees, template
//! catalogs, file content) belongs to the caller and is injected as
//! parameters.
//!
//! ## Example
//!
//! ```rust
//! use aqua_core::{classify_workflow, order_revisions, AquaTree};
//! use serde_json::json;
//!
//! let tree = AquaTree::from_value(json!({
//!     "revisions": {
//!         "0xgen": {
//!             "previous_verification_hash": "",
//!             "local_timestamp": "20250101120000",
//!             "revision_type": "form",
//!             "forms_type": "aqua_sign",
//!             "forms_signers": "0xaaa"
//!         },
//!         "0xlink": {
//!             "previous_verification_hash": "0xgen",
//!             "local_timestamp": "20250101120100",
//!             "revision_type": "link",
//!             "link_type": "aqua",
//!             "link_verification_hashes": ["0xtemplate"]
//!         }
//!     },
//!     "file_index": {
//!         "0xgen": "contract.json",
//!         "0xtemplate": "aqua_sign.json"
//!     }
//! })).unwrap();
//!
//! let ordered = order_revisions(&tree);
//! assert_eq!(ordered.genesis_hash(), Some("0xgen"));
//!
//! let templates = vec!["aqua_sign".to_string()];
//! let classification = classify_workflow(&tree, &templates);
//! assert!(classification.is_workflow);
//! assert_eq!(classification.workflow, "aqua_sign");
//! ```

pub mod digest;
pub mod error;
pub mod resolve;
pub mod tree;
pub mod workflow;

// Re-export main types
pub use error::{AquaError, ErrorCategory, ErrorDetail, ErrorResponse, Result};
pub use resolve::{
    fetch_linked_file_name, is_deep_link_revision, resolve_linked_file_name, LinkResolution,
    ERROR_TEXT, ERROR_UNKNOWN,
};
pub use tree::{
    compare_revision_sequences, file_name, genesis_file_object, genesis_hash, human_timestamp,
    is_aqua_tree_value, last_revision_hash, latest_tree, order_revisions, ordered_hashes,
    validate_aqua_tree, AquaTree, Divergence, FileContent, FileObject, Revision,
    RevisionComparison, RevisionType, TreeValidation, TIMESTAMP_FORMAT,
};
pub use workflow::{
    claim_recommendations, classify_workflow, extract_contract_info, extract_simple_claim,
    find_identity_claim, highest_form_index, signature_revision_hashes, ClaimInformation,
    ContractInformation, IdentityClaimDetails, SignatureEvent, WorkflowClassification,
    CLAIM_WORKFLOWS,
};
