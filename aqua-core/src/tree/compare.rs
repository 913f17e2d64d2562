//! Revision-history comparison
//!
//! Diffs two ordered revision-hash sequences (typically a locally-held copy
//! of a tree against a server copy) to detect divergence points and locate
//! the last common ancestor.
//!
//! Comparison is positional, not set-based: two sequences containing the
//! same hashes in different order are *not* identical, because revision
//! order encodes causal history.

use serde::{Deserialize, Serialize};
use std::collections::HashSet;

/// A position at which two sequences disagree
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Divergence {
    /// Index into the compared sequences
    pub index: usize,

    /// Hash held by the existing sequence at this index, if any
    pub existing_hash: Option<String>,

    /// Hash held by the upcoming sequence at this index, if any
    pub upcoming_hash: Option<String>,
}

/// Result of comparing two revision-hash sequences
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RevisionComparison {
    /// Every index at which the sequences disagree
    pub divergences: Vec<Divergence>,

    /// Deduplicated union of both sequences, order of first occurrence,
    /// existing before upcoming. A best-effort combined view, not a
    /// causally-correct merge.
    pub merged: Vec<String>,

    /// True iff zero divergences were recorded
    pub identical: bool,

    /// Whether the sequences have equal length
    pub same_length: bool,

    /// Length of the existing sequence
    pub existing_len: usize,

    /// Length of the upcoming sequence
    pub upcoming_len: usize,

    /// The matching hash at the greatest index where both sequences agree
    pub last_identical_revision_hash: Option<String>,
}

/// Compare two ordered revision-hash sequences position by position
///
/// Walks both sequences by index up to the longer length. At each index a
/// mismatch (including one side running out) records a [`Divergence`];
/// a match advances `last_identical_revision_hash`.
pub fn compare_revision_sequences(
    existing: &[String],
    upcoming: &[String],
) -> RevisionComparison {
    let max_length = existing.len().max(upcoming.len());

    let mut divergences = Vec::new();
    let mut last_identical: Option<String> = None;

    for index in 0..max_length {
        let existing_hash = existing.get(index);
        let upcoming_hash = upcoming.get(index);

        if existing_hash != upcoming_hash {
            divergences.push(Divergence {
                index,
                existing_hash: existing_hash.cloned(),
                upcoming_hash: upcoming_hash.cloned(),
            });
        } else if let Some(hash) = existing_hash {
            last_identical = Some(hash.clone());
        }
    }

    let mut seen: HashSet<&String> = HashSet::with_capacity(max_length);
    let mut merged = Vec::with_capacity(max_length);
    for hash in existing.iter().chain(upcoming.iter()) {
        if seen.insert(hash) {
            merged.push(hash.clone());
        }
    }

    RevisionComparison {
        identical: divergences.is_empty(),
        same_length: existing.len() == upcoming.len(),
        existing_len: existing.len(),
        upcoming_len: upcoming.len(),
        last_identical_revision_hash: last_identical,
        divergences,
        merged,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn hashes(names: &[&str]) -> Vec<String> {
        names.iter().map(|name| name.to_string()).collect()
    }

    #[test]
    fn test_identical_sequences() {
        let sequence = hashes(&["h1", "h2", "h3"]);
        let result = compare_revision_sequences(&sequence, &sequence);

        assert!(result.identical);
        assert!(result.same_length);
        assert!(result.divergences.is_empty());
        assert_eq!(
            result.last_identical_revision_hash,
            Some("h3".to_string())
        );
        assert_eq!(result.merged, sequence);
    }

    #[test]
    fn test_single_divergence_at_tail() {
        let existing = hashes(&["h1", "h2", "h3"]);
        let upcoming = hashes(&["h1", "h2", "h4"]);
        let result = compare_revision_sequences(&existing, &upcoming);

        assert!(!result.identical);
        assert!(result.same_length);
        assert_eq!(result.divergences.len(), 1);
        assert_eq!(
            result.divergences[0],
            Divergence {
                index: 2,
                existing_hash: Some("h3".to_string()),
                upcoming_hash: Some("h4".to_string()),
            }
        );
        assert_eq!(
            result.last_identical_revision_hash,
            Some("h2".to_string())
        );
        assert_eq!(result.merged, hashes(&["h1", "h2", "h3", "h4"]));
    }

    #[test]
    fn test_upcoming_ahead_of_existing() {
        let existing = hashes(&["h1", "h2"]);
        let upcoming = hashes(&["h1", "h2", "h3", "h4"]);
        let result = compare_revision_sequences(&existing, &upcoming);

        assert!(!result.identical);
        assert!(!result.same_length);
        assert_eq!(result.existing_len, 2);
        assert_eq!(result.upcoming_len, 4);
        assert_eq!(result.divergences.len(), 2);
        assert_eq!(result.divergences[0].index, 2);
        assert_eq!(result.divergences[0].existing_hash, None);
        assert_eq!(
            result.divergences[0].upcoming_hash,
            Some("h3".to_string())
        );
        assert_eq!(
            result.last_identical_revision_hash,
            Some("h2".to_string())
        );
    }

    #[test]
    fn test_same_hashes_different_order_are_not_identical() {
        let existing = hashes(&["h1", "h2", "h3"]);
        let upcoming = hashes(&["h3", "h2", "h1"]);
        let result = compare_revision_sequences(&existing, &upcoming);

        // Positional comparison: order encodes causal history
        assert!(!result.identical);
        assert_eq!(result.divergences.len(), 2);
        assert_eq!(
            result.last_identical_revision_hash,
            Some("h2".to_string())
        );
        assert_eq!(result.merged, hashes(&["h1", "h2", "h3"]));
    }

    #[test]
    fn test_empty_sequences() {
        let result = compare_revision_sequences(&[], &[]);
        assert!(result.identical);
        assert!(result.same_length);
        assert_eq!(result.last_identical_revision_hash, None);
        assert!(result.merged.is_empty());
    }

    #[test]
    fn test_merged_preserves_first_occurrence_order() {
        let existing = hashes(&["h2", "h1"]);
        let upcoming = hashes(&["h3", "h1", "h4"]);
        let result = compare_revision_sequences(&existing, &upcoming);

        assert_eq!(result.merged, hashes(&["h2", "h1", "h3", "h4"]));
    }
}
