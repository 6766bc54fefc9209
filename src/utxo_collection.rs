//! UTXO collections and the blue-score-aware set operations the diff
//! algebra is built from.
//!
//! A collection maps each outpoint to at most one entry. Across
//! collections, an entry's identity is the outpoint *plus* its block blue
//! score: the same outpoint re-created after a reorganization is a
//! different coin, and every helper here compares accordingly.

use crate::types::{Outpoint, UtxoEntry};
use std::collections::HashMap;

/// Mapping from outpoint to UTXO entry
pub type UtxoCollection = HashMap<Outpoint, UtxoEntry>;

/// Blue-score-aware operations on [`UtxoCollection`]
pub trait UtxoCollectionExtensions {
    /// Whether the collection holds this outpoint with exactly this blue
    /// score.
    fn contains_with_blue_score(&self, outpoint: &Outpoint, blue_score: u64) -> bool;

    /// Inserts every entry of `other`, overwriting on outpoint collision.
    fn add_many(&mut self, other: &UtxoCollection);

    /// Removes every outpoint present in `other`.
    fn remove_many(&mut self, other: &UtxoCollection);
}

impl UtxoCollectionExtensions for UtxoCollection {
    fn contains_with_blue_score(&self, outpoint: &Outpoint, blue_score: u64) -> bool {
        match self.get(outpoint) {
            Some(entry) => entry.block_blue_score == blue_score,
            None => false,
        }
    }

    fn add_many(&mut self, other: &UtxoCollection) {
        for (outpoint, entry) in other.iter() {
            self.insert(*outpoint, entry.clone());
        }
    }

    fn remove_many(&mut self, other: &UtxoCollection) {
        for outpoint in other.keys() {
            self.remove(outpoint);
        }
    }
}

/// Splits `collection1` against `collection2`: entries present in both
/// (same blue score) go to `result`, the rest to `remainder`.
pub fn intersection_with_remainder_having_blue_score_in_place(
    collection1: &UtxoCollection,
    collection2: &UtxoCollection,
    result: &mut UtxoCollection,
    remainder: &mut UtxoCollection,
) {
    for (outpoint, entry) in collection1.iter() {
        if collection2.contains_with_blue_score(outpoint, entry.block_blue_score) {
            result.insert(*outpoint, entry.clone());
        } else {
            remainder.insert(*outpoint, entry.clone());
        }
    }
}

/// Adds to `result` every entry of `collection1` that `collection2` does
/// not hold with the same blue score.
pub fn subtraction_having_blue_score_in_place(
    collection1: &UtxoCollection,
    collection2: &UtxoCollection,
    result: &mut UtxoCollection,
) {
    for (outpoint, entry) in collection1.iter() {
        if !collection2.contains_with_blue_score(outpoint, entry.block_blue_score) {
            result.insert(*outpoint, entry.clone());
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::ScriptPublicKey;

    fn outpoint(n: u8) -> Outpoint {
        Outpoint::new([n; 32], n as u32)
    }

    fn entry(blue_score: u64) -> UtxoEntry {
        UtxoEntry::new(1_000, ScriptPublicKey::new(0, vec![0x51]), blue_score, false)
    }

    #[test]
    fn test_contains_with_blue_score() {
        let mut collection = UtxoCollection::new();
        collection.insert(outpoint(1), entry(10));
        assert!(collection.contains_with_blue_score(&outpoint(1), 10));
        assert!(!collection.contains_with_blue_score(&outpoint(1), 11));
        assert!(!collection.contains_with_blue_score(&outpoint(2), 10));
    }

    #[test]
    fn test_intersection_with_remainder() {
        let mut c1 = UtxoCollection::new();
        c1.insert(outpoint(1), entry(10));
        c1.insert(outpoint(2), entry(20));
        c1.insert(outpoint(3), entry(30));
        let mut c2 = UtxoCollection::new();
        c2.insert(outpoint(1), entry(10));
        c2.insert(outpoint(2), entry(99)); // same outpoint, different coin

        let mut result = UtxoCollection::new();
        let mut remainder = UtxoCollection::new();
        intersection_with_remainder_having_blue_score_in_place(&c1, &c2, &mut result, &mut remainder);

        assert_eq!(result.len(), 1);
        assert!(result.contains_key(&outpoint(1)));
        assert_eq!(remainder.len(), 2);
        assert!(remainder.contains_key(&outpoint(2)));
        assert!(remainder.contains_key(&outpoint(3)));
    }

    #[test]
    fn test_subtraction() {
        let mut c1 = UtxoCollection::new();
        c1.insert(outpoint(1), entry(10));
        c1.insert(outpoint(2), entry(20));
        let mut c2 = UtxoCollection::new();
        c2.insert(outpoint(1), entry(10));

        let mut result = UtxoCollection::new();
        subtraction_having_blue_score_in_place(&c1, &c2, &mut result);
        assert_eq!(result.len(), 1);
        assert!(result.contains_key(&outpoint(2)));
    }

    #[test]
    fn test_add_remove_many() {
        let mut c1 = UtxoCollection::new();
        c1.insert(outpoint(1), entry(10));
        let mut c2 = UtxoCollection::new();
        c2.insert(outpoint(2), entry(20));

        c1.add_many(&c2);
        assert_eq!(c1.len(), 2);
        c1.remove_many(&c2);
        assert_eq!(c1.len(), 1);
        assert!(c1.contains_key(&outpoint(1)));
    }
}
