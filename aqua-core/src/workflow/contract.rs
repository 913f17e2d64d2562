//! Multi-signer contract extraction
//!
//! Contract workflows (e.g. `aqua_sign`) have a fixed chain prefix:
//!
//! ```text
//! index 0   genesis form (forms_signers, contract metadata)
//! index 1   link → system template
//! index 2   link → the document under signature
//! index 3   creator's signature
//! index 4   witness of the creator's state
//! index 5+  signature events, three revisions each:
//!           [position link, signature revision, attribution revision]
//! ```
//!
//! The extractor recovers the expected signer list, the linked document's
//! file name, the creator identity, and one decoded event per signature
//! triple. Signers minus attributed wallet addresses gives the outstanding
//! signers; an empty list means the contract is fully executed.

use regex::Regex;
use serde::{Deserialize, Serialize};
use std::sync::OnceLock;

use crate::resolve::ERROR_TEXT;
use crate::tree::{ordered_hashes, AquaTree, FileObject, Revision, RevisionType};

/// Chain index of the link to the document under signature
const DOCUMENT_LINK_INDEX: usize = 2;

/// Chain index of the contract creator's signature
const CREATOR_SIGNATURE_INDEX: usize = 3;

/// First chain index of the signature-event triples
const SIGNATURE_EVENTS_OFFSET: usize = 5;

/// One decoded signature event: a position-marker link, the signature
/// itself, and the revision attributing it to a wallet
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SignatureEvent {
    /// Zero-based signature slot: number of prior form entries at the
    /// linked position
    pub position_count: usize,

    /// Hash of the position-marker link revision; empty when the triple is
    /// incomplete
    pub position_hash: String,

    /// Hash of the signature revision
    pub signature_revision_hash: String,

    /// Hash of the wallet-attribution revision
    pub attribution_hash: String,

    /// Signer wallet address from the attribution revision; empty when
    /// unattributed
    pub wallet_address: String,
}

/// Projection of a multi-signer contract workflow
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ContractInformation {
    /// The genesis revision carrying the contract form data
    pub first_revision: Option<Revision>,

    /// File name of the linked document under signature; empty when the
    /// document link is unresolvable
    pub file_name: String,

    /// The revision at the creator-signature position, whatever its type
    pub creator_signature: Option<Revision>,

    /// The creator's wallet address, or the error sentinel when the
    /// creator-signature position holds no attributable signature
    pub contract_creator_address: String,

    /// Expected signers that have not yet produced a matching signature
    /// event; empty means the contract is fully executed
    pub remaining_signers: Vec<String>,

    /// All decoded signature events, in chain order
    pub signature_events: Vec<SignatureEvent>,
}

/// Extract the contract projection from an ordered chain
///
/// Never fails: missing positions and fields degrade to empty values or
/// the error sentinel, and the caller decides whether that constitutes an
/// application-level error. A chain too short to hold signature events
/// reports every expected signer as outstanding.
pub fn extract_contract_info(
    tree: &AquaTree,
    file_objects: &[FileObject],
) -> ContractInformation {
    let hashes = ordered_hashes(tree);

    let first_revision = hashes
        .first()
        .and_then(|hash| tree.revisions.get(hash))
        .cloned();

    let file_name = hashes
        .get(DOCUMENT_LINK_INDEX)
        .and_then(|hash| tree.revisions.get(hash))
        .and_then(Revision::link_target)
        .and_then(|target| tree.file_index.get(target))
        .cloned()
        .unwrap_or_default();

    let creator_signature = hashes
        .get(CREATOR_SIGNATURE_INDEX)
        .and_then(|hash| tree.revisions.get(hash))
        .cloned();
    let contract_creator_address = creator_signature
        .as_ref()
        .filter(|revision| revision.kind() == Some(RevisionType::Signature))
        .and_then(|revision| revision.signature_wallet_address.clone())
        .unwrap_or_else(|| ERROR_TEXT.to_string());

    let signers: Vec<String> = first_revision
        .as_ref()
        .and_then(|revision| revision.form_str("forms_signers"))
        .map(|raw| raw.split(',').map(|part| part.trim().to_string()).collect())
        .unwrap_or_default();

    if hashes.len() > SIGNATURE_EVENTS_OFFSET {
        let signature_events =
            signature_revision_hashes(&hashes[SIGNATURE_EVENTS_OFFSET..], tree, file_objects);

        let signed: Vec<&str> = signature_events
            .iter()
            .map(|event| event.wallet_address.as_str())
            .collect();
        let remaining_signers = signers
            .into_iter()
            .filter(|signer| !signed.contains(&signer.as_str()))
            .collect();

        ContractInformation {
            first_revision,
            file_name,
            creator_signature,
            contract_creator_address,
            remaining_signers,
            signature_events,
        }
    } else {
        // No signature events yet: every expected signer is outstanding
        ContractInformation {
            first_revision,
            file_name,
            creator_signature,
            contract_creator_address,
            remaining_signers: signers,
            signature_events: Vec::new(),
        }
    }
}

/// Decode a flat hash list into signature events
///
/// Batches `hashes` into groups of three. For each group the position
/// link's target is resolved through the available nested trees to count
/// prior form entries at that position (the zero-based signature slot),
/// and the attribution revision contributes the signer wallet address.
pub fn signature_revision_hashes(
    hashes: &[String],
    tree: &AquaTree,
    file_objects: &[FileObject],
) -> Vec<SignatureEvent> {
    let mut events = Vec::with_capacity(hashes.len() / 3 + 1);

    for batch in hashes.chunks(3) {
        let position_hash = batch.first().cloned().unwrap_or_default();
        let signature_revision_hash = batch.get(1).cloned().unwrap_or_default();
        let attribution_hash = batch.get(2).cloned().unwrap_or_default();

        let mut position_count = 0usize;
        if !position_hash.is_empty() {
            if let Some(target) = tree
                .revisions
                .get(&position_hash)
                .and_then(Revision::link_target)
            {
                for file in file_objects {
                    let Some(nested) = file.as_aqua_tree() else {
                        continue;
                    };
                    if let Some(position_revision) = nested.revisions.get(target) {
                        // the slot index is 0-based
                        position_count = (highest_form_index(position_revision) + 1) as usize;
                        break;
                    }
                }
            }
        }

        let wallet_address = tree
            .revisions
            .get(&attribution_hash)
            .and_then(|revision| revision.signature_wallet_address.clone())
            .unwrap_or_default();

        events.push(SignatureEvent {
            position_count,
            position_hash,
            signature_revision_hash,
            attribution_hash,
            wallet_address,
        });
    }

    events
}

/// Highest `N` over keys matching `forms_*_N`, or −1 when none match
pub fn highest_form_index(revision: &Revision) -> i64 {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    let pattern = PATTERN.get_or_init(|| {
        Regex::new(r"^forms_[^_]+_(\d+)$").expect("form index pattern is valid")
    });

    let mut highest = -1;
    for key in revision.extras.keys() {
        if let Some(captures) = pattern.captures(key) {
            if let Ok(index) = captures[1].parse::<i64>() {
                highest = highest.max(index);
            }
        }
    }
    highest
}
