//! The UTXO diff algebra.
//!
//! A diff is a pending mutation to a UTXO set: coins to add and coins to
//! remove. Folding diffs instead of materializing full UTXO sets is what
//! lets the node move its "current" view between DAG tips cheaply during
//! reorganization.
//!
//! `diff_from` follows a 3x3 case table keyed on where an outpoint sits on
//! each side (to_add / to_remove / absent):
//!
//! ```text
//!          |           | this      |           |
//! ---------+-----------+-----------+-----------+-----------
//!          |           | to_add    | to_remove | none
//! ---------+-----------+-----------+-----------+-----------
//! other    | to_add    | -         | X         | to_add
//! ---------+-----------+-----------+-----------+-----------
//!          | to_remove | X         | -         | to_remove
//! ---------+-----------+-----------+-----------+-----------
//!          | none      | to_remove | to_add    | -
//! ```
//!
//! `-` contributes nothing, `X` is an error, and membership is qualified
//! by blue score throughout: entries at the same outpoint with different
//! blue scores are different coins, so a cell can degrade to the `none`
//! column/row for one of them. Every error here means the operands
//! provably do not share a base UTXO set, or the composition sequence is
//! malformed; callers must treat that as a consensus-logic bug.

use crate::error::UtxoAlgebraError;
use crate::types::{Outpoint, UtxoEntry};
use crate::utxo_collection::{
    intersection_with_remainder_having_blue_score_in_place, subtraction_having_blue_score_in_place,
    UtxoCollection, UtxoCollectionExtensions,
};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct UtxoDiff {
    pub to_add: UtxoCollection,
    pub to_remove: UtxoCollection,
}

impl std::fmt::Display for UtxoDiff {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "to_add: {} entries; to_remove: {} entries", self.to_add.len(), self.to_remove.len())
    }
}

impl UtxoDiff {
    pub fn new(to_add: UtxoCollection, to_remove: UtxoCollection) -> Self {
        Self { to_add, to_remove }
    }

    pub fn is_empty(&self) -> bool {
        self.to_add.is_empty() && self.to_remove.is_empty()
    }

    /// Computes the diff that transforms the set-after-`self` into the
    /// set-after-`other`, assuming both diffs originate from the same base
    /// UTXO set.
    pub fn diff_from(&self, other: &UtxoDiff) -> Result<UtxoDiff, UtxoAlgebraError> {
        // A coin newly created by one side and spent-from-base by the
        // other proves the bases differ. The exception is a re-creation:
        // when self also removed the outpoint, the entry in self.to_add is
        // a blue-score update of the same coin rather than a fresh one.
        for (outpoint, added) in self.to_add.iter() {
            if let Some(removed) = other.to_remove.get(outpoint) {
                if added.block_blue_score == removed.block_blue_score && !self.to_remove.contains_key(outpoint) {
                    return Err(UtxoAlgebraError::DiffFromAddedRemoved);
                }
            }
        }
        for (outpoint, removed) in self.to_remove.iter() {
            if let Some(added) = other.to_add.get(outpoint) {
                if removed.block_blue_score == added.block_blue_score && !other.to_remove.contains_key(outpoint) {
                    return Err(UtxoAlgebraError::DiffFromRemovedAdded);
                }
            }
        }

        // Both sides removing the same outpoint at different blue scores
        // is unresolvable unless one side re-created the coin at the blue
        // score the other removed.
        for (outpoint, removed) in self.to_remove.iter() {
            if let Some(other_removed) = other.to_remove.get(outpoint) {
                if removed.block_blue_score != other_removed.block_blue_score
                    && !self.to_add.contains_with_blue_score(outpoint, other_removed.block_blue_score)
                    && !other.to_add.contains_with_blue_score(outpoint, removed.block_blue_score)
                {
                    return Err(UtxoAlgebraError::DiffFromAmbiguousRemoval);
                }
            }
        }

        let mut result = UtxoDiff::default();
        // Coins only self added must be removed to reach other's view, and
        // coins only other removed are gone from its view as well.
        subtraction_having_blue_score_in_place(&self.to_add, &other.to_add, &mut result.to_remove);
        subtraction_having_blue_score_in_place(&other.to_remove, &self.to_remove, &mut result.to_remove);
        // Coins only self removed come back, and coins only other added
        // appear.
        subtraction_having_blue_score_in_place(&self.to_remove, &other.to_remove, &mut result.to_add);
        subtraction_having_blue_score_in_place(&other.to_add, &self.to_add, &mut result.to_add);
        Ok(result)
    }

    /// Applies `diff` on top of `self`, returning the combined diff.
    pub fn with_diff(&self, diff: &UtxoDiff) -> Result<UtxoDiff, UtxoAlgebraError> {
        let mut clone = self.clone();
        clone.with_diff_in_place(diff)?;
        Ok(clone)
    }

    /// Applies `diff` on top of `self`, mutating `self`. Add/remove pairs
    /// of the same coin cancel; removing or adding the same coin twice is
    /// a malformed sequence.
    pub fn with_diff_in_place(&mut self, diff: &UtxoDiff) -> Result<(), UtxoAlgebraError> {
        if check_intersection_with_equal_blue_score(&diff.to_remove, &self.to_remove) {
            return Err(UtxoAlgebraError::DoubleRemoval);
        }
        if check_intersection_with_equal_blue_score(&diff.to_add, &self.to_add) {
            return Err(UtxoAlgebraError::DoubleAddition);
        }

        // Removals cancel against pending additions of the same coin; the
        // rest accumulate as removals.
        let mut cancelled = UtxoCollection::new();
        intersection_with_remainder_having_blue_score_in_place(
            &diff.to_remove,
            &self.to_add,
            &mut cancelled,
            &mut self.to_remove,
        );
        self.to_add.remove_many(&cancelled);

        // Additions cancel against pending removals of the same coin; the
        // rest accumulate as additions.
        let mut cancelled = UtxoCollection::new();
        intersection_with_remainder_having_blue_score_in_place(
            &diff.to_add,
            &self.to_remove,
            &mut cancelled,
            &mut self.to_add,
        );
        self.to_remove.remove_many(&cancelled);

        Ok(())
    }

    /// Records a newly created coin during block processing. Cancels a
    /// pending removal of the same coin.
    pub fn add_entry(&mut self, outpoint: Outpoint, entry: UtxoEntry) -> Result<(), UtxoAlgebraError> {
        if self.to_remove.contains_with_blue_score(&outpoint, entry.block_blue_score) {
            self.to_remove.remove(&outpoint);
        } else if self.to_add.contains_key(&outpoint) {
            return Err(UtxoAlgebraError::DuplicateAddEntry);
        } else {
            self.to_add.insert(outpoint, entry);
        }
        Ok(())
    }

    /// Records a spent coin during block processing. Cancels a pending
    /// addition of the same coin.
    pub fn remove_entry(&mut self, outpoint: Outpoint, entry: UtxoEntry) -> Result<(), UtxoAlgebraError> {
        if self.to_add.contains_with_blue_score(&outpoint, entry.block_blue_score) {
            self.to_add.remove(&outpoint);
        } else if self.to_remove.contains_key(&outpoint) {
            return Err(UtxoAlgebraError::DuplicateRemoveEntry);
        } else {
            self.to_remove.insert(outpoint, entry);
        }
        Ok(())
    }
}

/// Whether any outpoint appears in both collections carrying the same blue
/// score, which identifies the same coin on both sides.
fn check_intersection_with_equal_blue_score(collection1: &UtxoCollection, collection2: &UtxoCollection) -> bool {
    collection1
        .iter()
        .any(|(outpoint, entry)| collection2.contains_with_blue_score(outpoint, entry.block_blue_score))
}
