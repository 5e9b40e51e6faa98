//! Binary Merkle tree over telemetry segments.
//!
//! The tree is stored as a flat [`LevelCache`]: one row of hashes per level,
//! leaves first, root last. There are no parent/child links; a node at
//! `(level, i)` has children `(level - 1, 2i)` and `(level - 1, 2i + 1)`.
//!
//! # Odd levels
//!
//! When a level has an odd number of entries the last one is paired with
//! itself. Proof generation reproduces the same rule, so an unpaired node's
//! sibling is the node.
//!
//! # Example
//!
//! ```
//! use chrono::{TimeZone, Utc};
//! use telemetry_merkle::{tree, TelemetrySegment};
//!
//! let start = Utc.with_ymd_and_hms(2024, 3, 1, 8, 0, 0).unwrap();
//! let end = Utc.with_ymd_and_hms(2024, 3, 1, 8, 30, 0).unwrap();
//! let segments = vec![
//!     TelemetrySegment::new(start, end, 12.5, None).unwrap(),
//!     TelemetrySegment::new(start, end, 3.0, None).unwrap(),
//! ];
//!
//! let tree = tree::build(&segments).unwrap();
//! assert_eq!(tree.leaf_count(), 2);
//! assert_eq!(tree.depth(), 1);
//! ```

use serde::{Deserialize, Serialize};

use crate::error::{MerkleError, MerkleResult};
use crate::hash::{combine, HashValue};
use crate::leaf::{self, Leaf};
use crate::segment::TelemetrySegment;

/// Hash rows of a built tree, indexed by level then position.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct LevelCache {
    levels: Vec<Vec<HashValue>>,
}

impl LevelCache {
    /// Fold a non-empty leaf row up to the root.
    fn from_leaf_hashes(leaf_hashes: Vec<HashValue>) -> Self {
        debug_assert!(!leaf_hashes.is_empty());
        let mut levels = Vec::with_capacity(depth_for(leaf_hashes.len()) + 1);
        levels.push(leaf_hashes);

        while let Some(current) = levels.last().filter(|level| level.len() > 1) {
            let next: Vec<HashValue> = current
                .chunks(2)
                .map(|pair| match pair {
                    [left, right] => combine(left, right),
                    [last] => combine(last, last),
                    _ => unreachable!("chunks(2) yields one or two elements"),
                })
                .collect();
            levels.push(next);
        }

        Self { levels }
    }

    /// Number of levels, including the leaf row and the root row.
    pub fn len(&self) -> usize {
        self.levels.len()
    }

    pub fn is_empty(&self) -> bool {
        self.levels.is_empty()
    }

    /// Row at `depth` (0 = leaves).
    pub fn level(&self, depth: usize) -> Option<&[HashValue]> {
        self.levels.get(depth).map(Vec::as_slice)
    }

    pub fn leaf_hashes(&self) -> &[HashValue] {
        &self.levels[0]
    }

    pub fn root(&self) -> HashValue {
        self.levels[self.levels.len() - 1][0]
    }

    pub(crate) fn levels(&self) -> &[Vec<HashValue>] {
        &self.levels
    }
}

/// A built, immutable Merkle tree.
///
/// Owns every level hash and every leaf, so proofs can be answered for as
/// long as the tree is alive. There is no mutation API; build a new tree for
/// a new batch.
#[derive(Clone, Debug)]
pub struct MerkleTree {
    leaves: Vec<Leaf>,
    cache: LevelCache,
}

impl MerkleTree {
    /// Root hash of the tree.
    pub fn root(&self) -> HashValue {
        self.cache.root()
    }

    pub fn leaf_count(&self) -> u32 {
        // build() guarantees the count fits in u32
        self.leaves.len() as u32
    }

    /// Number of folding steps from the leaf row to the root.
    pub fn depth(&self) -> u32 {
        (self.cache.len() - 1) as u32
    }

    pub fn leaf(&self, index: u32) -> Option<&Leaf> {
        self.leaves.get(index as usize)
    }

    pub fn leaves(&self) -> &[Leaf] {
        &self.leaves
    }

    pub fn levels(&self) -> &LevelCache {
        &self.cache
    }

    /// The externally published form of this tree.
    pub fn summary(&self) -> TreeSummary {
        TreeSummary {
            root_hash: self.root(),
            leaf_count: self.leaf_count(),
            depth: self.depth(),
        }
    }
}

/// `{ rootHash, leafCount, depth }`, as handed to the anchoring side.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TreeSummary {
    pub root_hash: HashValue,
    pub leaf_count: u32,
    pub depth: u32,
}

/// Build a tree from an ordered, non-empty segment list.
///
/// Leaf `i` is the segment at position `i`; order is significant and kept.
pub fn build(segments: &[TelemetrySegment]) -> MerkleResult<MerkleTree> {
    if segments.is_empty() {
        return Err(MerkleError::EmptyInput);
    }
    let count = u32::try_from(segments.len()).map_err(|_| MerkleError::TooManySegments {
        count: segments.len(),
        max: u32::MAX as usize,
    })?;

    let leaves: Vec<Leaf> = (0..count)
        .zip(segments)
        .map(|(index, segment)| leaf::encode(segment, index))
        .collect();
    let leaf_hashes = leaves.iter().map(Leaf::hash).collect();
    let cache = LevelCache::from_leaf_hashes(leaf_hashes);

    Ok(MerkleTree { leaves, cache })
}

/// Tree depth for `leaf_count` leaves: `ceil(log2(n))`, and 0 for `n <= 1`.
pub fn depth_for(leaf_count: usize) -> usize {
    if leaf_count <= 1 {
        0
    } else {
        (usize::BITS - (leaf_count - 1).leading_zeros()) as usize
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::hash::sha256;
    use chrono::{Duration, TimeZone, Utc};

    fn segments(n: usize) -> Vec<TelemetrySegment> {
        let base = Utc.with_ymd_and_hms(2024, 3, 1, 0, 0, 0).unwrap();
        (0..n)
            .map(|i| {
                let start = base + Duration::minutes(10 * i as i64);
                TelemetrySegment::new(start, start + Duration::minutes(10), i as f64 * 1.5, None).unwrap()
            })
            .collect()
    }

    #[test]
    fn test_empty_input_rejected() {
        assert_eq!(build(&[]).unwrap_err(), MerkleError::EmptyInput);
    }

    #[test]
    fn test_single_leaf() {
        let input = segments(1);
        let tree = build(&input).unwrap();

        assert_eq!(tree.leaf_count(), 1);
        assert_eq!(tree.depth(), 0);
        assert_eq!(tree.root(), leaf::encode(&input[0], 0).hash());
    }

    #[test]
    fn test_two_leaves() {
        let input = segments(2);
        let tree = build(&input).unwrap();
        let h0 = tree.leaf(0).unwrap().hash();
        let h1 = tree.leaf(1).unwrap().hash();

        assert_eq!(tree.depth(), 1);
        assert_eq!(tree.root(), combine(&h0, &h1));
    }

    #[test]
    fn test_three_leaves_duplicate_last() {
        let input = segments(3);
        let tree = build(&input).unwrap();
        let h: Vec<HashValue> = tree.levels().leaf_hashes().to_vec();

        let level1 = tree.levels().level(1).unwrap();
        assert_eq!(level1, &[combine(&h[0], &h[1]), combine(&h[2], &h[2])]);
        assert_eq!(tree.root(), combine(&level1[0], &level1[1]));
        assert_eq!(tree.depth(), 2);
    }

    #[test]
    fn test_level_sizes_and_depth() {
        for n in 1..=33 {
            let tree = build(&segments(n)).unwrap();
            let cache = tree.levels();

            assert_eq!(tree.depth() as usize, depth_for(n), "n={n}");
            assert_eq!(cache.level(0).unwrap().len(), n);
            for d in 1..cache.len() {
                let prev = cache.level(d - 1).unwrap().len();
                assert_eq!(cache.level(d).unwrap().len(), prev.div_ceil(2), "n={n} d={d}");
            }
            assert_eq!(cache.level(cache.len() - 1).unwrap().len(), 1);
        }
    }

    #[test]
    fn test_depth_for() {
        assert_eq!(depth_for(1), 0);
        assert_eq!(depth_for(2), 1);
        assert_eq!(depth_for(3), 2);
        assert_eq!(depth_for(4), 2);
        assert_eq!(depth_for(5), 3);
        assert_eq!(depth_for(1024), 10);
        assert_eq!(depth_for(1025), 11);
    }

    #[test]
    fn test_deterministic() {
        let input = segments(7);
        assert_eq!(build(&input).unwrap().root(), build(&input).unwrap().root());
    }

    #[test]
    fn test_order_matters() {
        let mut input = segments(4);
        let original = build(&input).unwrap().root();
        input.swap(0, 3);
        assert_ne!(build(&input).unwrap().root(), original);
    }

    #[test]
    fn test_leaves_keep_input_index() {
        let tree = build(&segments(5)).unwrap();
        for (i, leaf) in tree.leaves().iter().enumerate() {
            assert_eq!(leaf.index() as usize, i);
            assert_eq!(sha256(leaf.canonical_payload()), leaf.hash());
        }
        assert!(tree.leaf(5).is_none());
    }

    #[test]
    fn test_tree_is_shareable() {
        fn assert_send_sync<T: Send + Sync>() {}
        assert_send_sync::<MerkleTree>();
        assert_send_sync::<LevelCache>();
    }

    #[test]
    fn test_summary_json_shape() {
        let tree = build(&segments(3)).unwrap();
        let json = serde_json::to_value(tree.summary()).unwrap();

        assert_eq!(json["rootHash"], tree.root().to_hex());
        assert_eq!(json["leafCount"], 3);
        assert_eq!(json["depth"], 2);
    }
}
