//! # telemetry-merkle
//!
//! Tamper-evident digests for vehicle telemetry.
//!
//! A batch of [`TelemetrySegment`]s is folded into a binary Merkle tree whose
//! root can be published elsewhere. Any single segment can later be shown to
//! belong to that root with an [`InclusionProof`], checked without the tree.
//!
//! ## Pipeline
//!
//! - [`leaf`]: segment → canonical bytes → SHA-256 leaf
//! - [`tree`]: leaves → level cache → root
//! - [`proof`]: level cache → sibling path; (leaf, path, root) → bool
//!
//! [`MerkleIntegrityEngine`] wraps the three with an [`EngineConfig`] and
//! structured logging.
//!
//! ## Example
//!
//! ```
//! use chrono::{TimeZone, Utc};
//! use telemetry_merkle::{MerkleIntegrityEngine, TelemetrySegment};
//!
//! let start = Utc.with_ymd_and_hms(2024, 3, 1, 8, 0, 0).unwrap();
//! let end = Utc.with_ymd_and_hms(2024, 3, 1, 8, 30, 0).unwrap();
//! let segments: Vec<_> = (0..3)
//!     .map(|i| TelemetrySegment::new(start, end, i as f64, None).unwrap())
//!     .collect();
//!
//! let engine = MerkleIntegrityEngine::default();
//! let tree = engine.build(&segments).unwrap();
//! let proof = engine.prove(&tree, 2).unwrap();
//! let leaf_hash = tree.leaf(2).unwrap().hash();
//!
//! assert!(engine.verify(&leaf_hash, &proof, &tree.root()).unwrap());
//! ```

pub mod config;
pub mod engine;
pub mod error;
pub mod hash;
pub mod leaf;
pub mod proof;
pub mod segment;
pub mod tree;

pub use config::EngineConfig;
pub use engine::MerkleIntegrityEngine;
pub use error::{MerkleError, MerkleResult};
pub use hash::{combine, sha256, HashValue};
pub use leaf::{encode, Leaf};
pub use proof::{prove, verify, verify_hex, verify_segment, InclusionProof};
pub use segment::TelemetrySegment;
pub use tree::{build, LevelCache, MerkleTree, TreeSummary};

/// The length of hash digests used in merkle trees (32 bytes = 256 bits)
pub const HASH_LENGTH: usize = 32;
