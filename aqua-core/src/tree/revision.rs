//! Revision types

use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::collections::BTreeMap;

use super::TIMESTAMP_FORMAT;

/// A single revision in an AquaTree
///
/// Revisions are immutable once created: they are content-addressed by the
/// hash under which they appear in [`crate::AquaTree::revisions`]. The wire
/// format is a flat JSON object; which fields are required depends on
/// `revision_type` and is enforced by [`crate::tree::validate_aqua_tree`],
/// not by deserialization, so that a malformed revision still produces a
/// readable validation reason instead of a serde error.
///
/// Fields outside the known set (most importantly the `forms_*` family on
/// form revisions) are preserved in [`Revision::extras`]: the format is
/// open-world and unknown fields are tolerated everywhere.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Revision {
    /// Hash of the preceding revision; empty only for the genesis revision
    #[serde(skip_serializing_if = "Option::is_none")]
    pub previous_verification_hash: Option<String>,

    /// Creation time in `YYYYMMDDHHMMSS` form, lexicographically sortable
    #[serde(skip_serializing_if = "Option::is_none")]
    pub local_timestamp: Option<String>,

    /// One of `file | witness | signature | form | link`
    ///
    /// Kept as the raw wire string; use [`Revision::kind`] for the parsed
    /// [`RevisionType`].
    #[serde(skip_serializing_if = "Option::is_none")]
    pub revision_type: Option<String>,

    // file revisions
    #[serde(skip_serializing_if = "Option::is_none")]
    pub file_hash: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub file_nonce: Option<String>,

    // witness revisions
    #[serde(skip_serializing_if = "Option::is_none")]
    pub witness_merkle_root: Option<String>,
    /// Anchoring time as reported by the witness network; number or string
    /// depending on the producing client
    #[serde(skip_serializing_if = "Option::is_none")]
    pub witness_timestamp: Option<Value>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub witness_network: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub witness_smart_contract_address: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub witness_transaction_hash: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub witness_sender_account_address: Option<String>,

    // signature revisions
    /// Signature payload; a hex string for wallet signatures, an object for
    /// DID-based schemes
    #[serde(skip_serializing_if = "Option::is_none")]
    pub signature: Option<Value>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub signature_public_key: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub signature_type: Option<String>,
    /// Signer's wallet address, used for authorship attribution
    #[serde(skip_serializing_if = "Option::is_none")]
    pub signature_wallet_address: Option<String>,

    // link revisions
    #[serde(skip_serializing_if = "Option::is_none")]
    pub link_type: Option<String>,
    /// Referenced revision hashes; the first entry is the link target
    #[serde(skip_serializing_if = "Option::is_none")]
    pub link_verification_hashes: Option<Vec<String>>,

    /// All remaining fields, including the `forms_*` family
    #[serde(flatten)]
    pub extras: Map<String, Value>,
}

impl Revision {
    /// Parse the `revision_type` field into a [`RevisionType`]
    ///
    /// Returns `None` when the field is absent or unknown; the validator
    /// turns that into a reason string.
    pub fn kind(&self) -> Option<RevisionType> {
        self.revision_type.as_deref()?.parse().ok()
    }

    /// Whether this revision is a chain genesis (empty or absent parent hash)
    pub fn is_genesis(&self) -> bool {
        self.previous_verification_hash
            .as_deref()
            .map_or(true, str::is_empty)
    }

    /// The link target: first entry of `link_verification_hashes`
    pub fn link_target(&self) -> Option<&str> {
        self.link_verification_hashes
            .as_ref()?
            .first()
            .map(String::as_str)
    }

    /// Look up an extra field by its full key (e.g. `"forms_name"`)
    pub fn form_field(&self, key: &str) -> Option<&Value> {
        self.extras.get(key)
    }

    /// Look up an extra field and coerce it to a string slice
    pub fn form_str(&self, key: &str) -> Option<&str> {
        self.extras.get(key).and_then(Value::as_str)
    }

    /// All `forms_*` fields, sorted alphabetically by key
    pub fn forms_fields(&self) -> BTreeMap<String, Value> {
        self.extras
            .iter()
            .filter(|(key, _)| key.starts_with("forms_"))
            .map(|(key, value)| (key.clone(), value.clone()))
            .collect()
    }

    /// Parse `local_timestamp` into a [`NaiveDateTime`]
    pub fn parsed_timestamp(&self) -> Option<NaiveDateTime> {
        let raw = self.local_timestamp.as_deref()?;
        NaiveDateTime::parse_from_str(raw, TIMESTAMP_FORMAT).ok()
    }
}

/// Revision types defined by the AquaTree format
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RevisionType {
    /// Carries file content metadata (`file_hash`, `file_nonce`)
    File,
    /// Records an external blockchain anchoring event
    Witness,
    /// Records an authorship signature over the chain state
    Signature,
    /// Carries user-submitted `forms_*` key/value data
    Form,
    /// References another revision, in this tree or a different one
    Link,
}

impl RevisionType {
    /// Get the string representation
    pub fn as_str(&self) -> &'static str {
        match self {
            RevisionType::File => "file",
            RevisionType::Witness => "witness",
            RevisionType::Signature => "signature",
            RevisionType::Form => "form",
            RevisionType::Link => "link",
        }
    }

    /// All known revision type names
    pub fn all() -> [&'static str; 5] {
        ["file", "witness", "signature", "form", "link"]
    }
}

impl std::fmt::Display for RevisionType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl std::str::FromStr for RevisionType {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s {
            "file" => Ok(RevisionType::File),
            "witness" => Ok(RevisionType::Witness),
            "signature" => Ok(RevisionType::Signature),
            "form" => Ok(RevisionType::Form),
            "link" => Ok(RevisionType::Link),
            _ => Err(format!("Unknown revision type: {}", s)),
        }
    }
}
