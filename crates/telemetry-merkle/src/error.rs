//! Error types for merkle tree operations.

use thiserror::Error;

/// Result type for merkle operations
pub type MerkleResult<T> = Result<T, MerkleError>;

/// Errors that can occur while encoding, building, proving or verifying.
///
/// A root mismatch during verification is not represented here: it is the
/// ordinary `Ok(false)` outcome of a check.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum MerkleError {
    /// A tree was requested over zero segments
    #[error("Cannot build a tree from an empty segment list")]
    EmptyInput,

    /// Proof requested for a leaf the tree does not have
    #[error("Leaf index out of range: {index} >= {leaf_count}")]
    IndexOutOfRange { index: u32, leaf_count: u32 },

    /// The proof is not structurally usable
    #[error("Malformed proof: {0}")]
    MalformedProof(String),

    /// Invalid hash length
    #[error("Invalid hash length: expected {expected}, got {got}")]
    InvalidHashLength { expected: usize, got: usize },

    /// Hex text that does not decode to a digest
    #[error("Invalid hex digest: {0}")]
    InvalidHex(String),

    /// A telemetry segment failed its construction checks
    #[error("Invalid segment: {0}")]
    InvalidSegment(String),

    /// The batch does not fit in the leaf index space or the configured limit
    #[error("Too many segments: {count} > {max}")]
    TooManySegments { count: usize, max: usize },

    /// Configuration could not be read or parsed
    #[error("Configuration error: {0}")]
    Config(String),
}
