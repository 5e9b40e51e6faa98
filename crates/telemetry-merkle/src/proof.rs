//! Inclusion proofs.
//!
//! A proof is the list of sibling hashes met on the way from a leaf to the
//! root. Because [`combine`] sorts its inputs, verification needs nothing but
//! the leaf hash, the siblings and the expected root: no left/right flags.
//!
//! The flip side is that a proof binds a leaf to the root as a member of the
//! tree, not to a position. `leaf_index` and `leaf_count` travel alongside so
//! a verifier can still check the proof has the shape a tree of that size
//! would produce.

use serde::{Deserialize, Serialize};

use crate::error::{MerkleError, MerkleResult};
use crate::hash::{combine, HashValue};
use crate::leaf;
use crate::segment::TelemetrySegment;
use crate::tree::{depth_for, MerkleTree};

/// Sibling path for one leaf, plus the tree-size context it was cut from.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct InclusionProof {
    /// Sibling hashes, leaf level first, root excluded
    pub siblings: Vec<HashValue>,
    /// Index of the proven leaf at build time
    pub leaf_index: u32,
    /// Leaf count of the tree at build time
    pub leaf_count: u32,
}

impl InclusionProof {
    /// Number of levels covered by this proof.
    pub fn depth(&self) -> usize {
        self.siblings.len()
    }

    /// Check that the proof has the shape a tree of `leaf_count` leaves yields.
    pub fn validate_shape(&self) -> MerkleResult<()> {
        if self.leaf_count == 0 {
            return Err(MerkleError::MalformedProof("leaf count is zero".to_string()));
        }
        if self.leaf_index >= self.leaf_count {
            return Err(MerkleError::MalformedProof(format!(
                "leaf index {} outside tree of {} leaves",
                self.leaf_index, self.leaf_count
            )));
        }
        let expected = depth_for(self.leaf_count as usize);
        if self.siblings.len() != expected {
            return Err(MerkleError::MalformedProof(format!(
                "expected {} siblings for {} leaves, got {}",
                expected,
                self.leaf_count,
                self.siblings.len()
            )));
        }
        Ok(())
    }

    /// Fold the siblings onto `leaf_hash`.
    pub fn compute_root(&self, leaf_hash: &HashValue) -> HashValue {
        fold_path(leaf_hash, &self.siblings)
    }

    /// Verify `leaf_hash` against `expected_root`.
    ///
    /// Returns `Ok(false)` on a root mismatch. A sibling list whose length
    /// does not fit `leaf_count`, even one made only of well-formed hashes, is
    /// reported as [`MerkleError::MalformedProof`] rather than `Ok(false)`:
    /// a truncated or padded path is an error, just like undecodable hex.
    pub fn verify(&self, leaf_hash: &HashValue, expected_root: &HashValue) -> MerkleResult<bool> {
        self.validate_shape()?;
        Ok(&self.compute_root(leaf_hash) == expected_root)
    }
}

/// Generate the inclusion proof for `leaf_index`.
pub fn prove(tree: &MerkleTree, leaf_index: u32) -> MerkleResult<InclusionProof> {
    let leaf_count = tree.leaf_count();
    if leaf_index >= leaf_count {
        return Err(MerkleError::IndexOutOfRange {
            index: leaf_index,
            leaf_count,
        });
    }

    let levels = tree.levels().levels();
    let below_root = &levels[..levels.len() - 1];
    let mut siblings = Vec::with_capacity(below_root.len());
    let mut index = leaf_index as usize;

    for level in below_root {
        // Unpaired last node is its own sibling
        let sibling = level.get(index ^ 1).unwrap_or(&level[index]);
        siblings.push(*sibling);
        index /= 2;
    }

    Ok(InclusionProof {
        siblings,
        leaf_index,
        leaf_count,
    })
}

/// Stateless check: does folding `siblings` onto `leaf_hash` reach `expected_root`?
///
/// Needs no tree. A mismatch is `false`, never an error.
pub fn verify(leaf_hash: &HashValue, siblings: &[HashValue], expected_root: &HashValue) -> bool {
    &fold_path(leaf_hash, siblings) == expected_root
}

/// [`verify`] over hex strings, for callers that only hold the published text forms.
///
/// Any entry that is not a 64-character hex digest is a
/// [`MerkleError::MalformedProof`].
pub fn verify_hex<S: AsRef<str>>(leaf_hex: &str, proof_hex: &[S], root_hex: &str) -> MerkleResult<bool> {
    let leaf_hash = parse_entry("leaf hash", leaf_hex)?;
    let expected_root = parse_entry("expected root", root_hex)?;
    let siblings = proof_hex
        .iter()
        .enumerate()
        .map(|(i, entry)| parse_entry(&format!("proof entry {}", i), entry.as_ref()))
        .collect::<MerkleResult<Vec<_>>>()?;
    Ok(verify(&leaf_hash, &siblings, &expected_root))
}

/// Re-encode `segment` at the proof's leaf index and verify it.
pub fn verify_segment(
    segment: &TelemetrySegment,
    proof: &InclusionProof,
    expected_root: &HashValue,
) -> MerkleResult<bool> {
    let leaf_hash = leaf::leaf_hash(segment, proof.leaf_index);
    proof.verify(&leaf_hash, expected_root)
}

fn fold_path(leaf_hash: &HashValue, siblings: &[HashValue]) -> HashValue {
    siblings
        .iter()
        .fold(*leaf_hash, |current, sibling| combine(&current, sibling))
}

fn parse_entry(what: &str, text: &str) -> MerkleResult<HashValue> {
    HashValue::from_hex(text).map_err(|e| MerkleError::MalformedProof(format!("{}: {}", what, e)))
}
