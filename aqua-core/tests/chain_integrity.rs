//! Integration tests for chain ordering and history comparison.
//!
//! Exercises the orderer and comparator over fixture chains the way the
//! sync layer uses them: order a freshly-fetched tree, diff it against the
//! locally-held copy, locate the last common ancestor.

use aqua_core::{
    compare_revision_sequences, genesis_hash, last_revision_hash, order_revisions,
    ordered_hashes, validate_aqua_tree, AquaTree,
};
use serde_json::{json, Value};

/// Build a linear chain of `length` form revisions, inserted in reverse so
/// the map order disagrees with the chain order.
fn reversed_chain(length: usize) -> AquaTree {
    let mut revisions = serde_json::Map::new();
    for index in (0..length).rev() {
        let prev = if index == 0 {
            String::new()
        } else {
            format!("0xh{}", index - 1)
        };
        revisions.insert(
            format!("0xh{}", index),
            json!({
                "previous_verification_hash": prev,
                "local_timestamp": format!("202501011200{:02}", index),
                "revision_type": "form",
                "forms_step": index
            }),
        );
    }

    serde_json::from_value(json!({
        "revisions": Value::Object(revisions),
        "file_index": { "0xh0": "doc.pdf" }
    }))
    .unwrap()
}

#[test]
fn test_orderer_recovers_chain_from_scrambled_map() {
    let tree = reversed_chain(8);
    assert!(validate_aqua_tree(&tree).is_valid);

    // Map order is reversed relative to the chain
    let encounter: Vec<&String> = tree.revisions.keys().collect();
    assert_eq!(encounter.first().map(|h| h.as_str()), Some("0xh7"));

    let ordered = ordered_hashes(&tree);
    let expected: Vec<String> = (0..8).map(|i| format!("0xh{}", i)).collect();
    assert_eq!(ordered, expected);

    assert_eq!(genesis_hash(&tree), Some("0xh0"));
    assert_eq!(last_revision_hash(&tree), Some("0xh7".to_string()));
}

#[test]
fn test_ordering_is_a_fixed_point() {
    let tree = reversed_chain(5);
    let once = order_revisions(&tree);
    let twice = order_revisions(&once);

    let first: Vec<&String> = once.revisions.keys().collect();
    let second: Vec<&String> = twice.revisions.keys().collect();
    assert_eq!(first, second);
}

#[test]
fn test_ordering_produces_a_permutation() {
    let tree = reversed_chain(6);
    let ordered = ordered_hashes(&tree);

    assert_eq!(ordered.len(), tree.revisions.len());
    for hash in tree.revisions.keys() {
        assert!(ordered.contains(hash), "missing {}", hash);
    }
}

#[test]
fn test_local_copy_behind_server_copy() {
    let server = reversed_chain(6);
    let server_hashes = ordered_hashes(&server);
    let local_hashes: Vec<String> = server_hashes[..4].to_vec();

    let comparison = compare_revision_sequences(&local_hashes, &server_hashes);

    assert!(!comparison.identical);
    assert!(!comparison.same_length);
    assert_eq!(comparison.existing_len, 4);
    assert_eq!(comparison.upcoming_len, 6);
    // The local copy is a strict prefix: divergences only past its end
    assert_eq!(comparison.divergences.len(), 2);
    assert_eq!(comparison.divergences[0].index, 4);
    assert_eq!(comparison.divergences[0].existing_hash, None);
    assert_eq!(
        comparison.last_identical_revision_hash,
        Some("0xh3".to_string())
    );
    // The merged view equals the longer history
    assert_eq!(comparison.merged, server_hashes);
}

#[test]
fn test_forked_histories() {
    let base = reversed_chain(4);
    let base_hashes = ordered_hashes(&base);

    // Both sides extended the same ancestor differently
    let mut local = base_hashes.clone();
    local.push("0xlocal_edit".to_string());
    let mut server = base_hashes.clone();
    server.push("0xserver_edit".to_string());

    let comparison = compare_revision_sequences(&local, &server);

    assert!(!comparison.identical);
    assert!(comparison.same_length);
    assert_eq!(comparison.divergences.len(), 1);
    assert_eq!(comparison.divergences[0].index, 4);
    assert_eq!(
        comparison.last_identical_revision_hash,
        Some("0xh3".to_string())
    );
    // Both fork tips survive in the merged view
    assert!(comparison.merged.contains(&"0xlocal_edit".to_string()));
    assert!(comparison.merged.contains(&"0xserver_edit".to_string()));
}

#[test]
fn test_round_trip_through_json_preserves_order_semantics() {
    let tree = reversed_chain(5);
    let text = serde_json::to_string(&tree).unwrap();
    let reparsed = AquaTree::parse(&text).unwrap();

    assert_eq!(ordered_hashes(&tree), ordered_hashes(&reparsed));
    assert_eq!(
        last_revision_hash(&tree),
        last_revision_hash(&reparsed)
    );
}
