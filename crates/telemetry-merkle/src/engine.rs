//! MerkleIntegrityEngine: the configured entry point over encode → build → prove/verify.

use tracing::{debug, trace, warn};

use crate::config::EngineConfig;
use crate::error::{MerkleError, MerkleResult};
use crate::hash::HashValue;
use crate::leaf;
use crate::proof::{self, InclusionProof};
use crate::segment::TelemetrySegment;
use crate::tree::{self, MerkleTree};

/// Stateless facade applying an [`EngineConfig`] to the pipeline.
///
/// Holds no per-call state and is safe to share between threads; the only
/// value threaded between calls is the immutable [`MerkleTree`].
#[derive(Debug, Clone, Default)]
pub struct MerkleIntegrityEngine {
    config: EngineConfig,
}

impl MerkleIntegrityEngine {
    pub fn new(config: EngineConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    /// Build a tree over `segments`.
    pub fn build(&self, segments: &[TelemetrySegment]) -> MerkleResult<MerkleTree> {
        if segments.len() > self.config.max_segments {
            warn!(
                count = segments.len(),
                max = self.config.max_segments,
                "Rejecting oversized segment batch"
            );
            return Err(MerkleError::TooManySegments {
                count: segments.len(),
                max: self.config.max_segments,
            });
        }

        let tree = tree::build(segments).inspect_err(|e| warn!(error = %e, "Tree build failed"))?;
        debug!(
            leaf_count = tree.leaf_count(),
            depth = tree.depth(),
            root = %tree.root(),
            "Built telemetry merkle tree"
        );
        Ok(tree)
    }

    /// Inclusion proof for the leaf at `leaf_index`.
    pub fn prove(&self, tree: &MerkleTree, leaf_index: u32) -> MerkleResult<InclusionProof> {
        let proof = proof::prove(tree, leaf_index)?;
        trace!(leaf_index, siblings = proof.siblings.len(), "Generated inclusion proof");
        Ok(proof)
    }

    /// Verify a leaf hash against a published root.
    ///
    /// With `strict_proof_shape` set, a proof whose sibling count does not
    /// match its leaf count is rejected as [`MerkleError::MalformedProof`],
    /// even when every sibling is a well-formed hash; otherwise only the fold
    /// is checked.
    pub fn verify(
        &self,
        leaf_hash: &HashValue,
        proof: &InclusionProof,
        expected_root: &HashValue,
    ) -> MerkleResult<bool> {
        let valid = if self.config.strict_proof_shape {
            proof
                .verify(leaf_hash, expected_root)
                .inspect_err(|e| warn!(error = %e, "Rejected malformed proof"))?
        } else {
            proof::verify(leaf_hash, &proof.siblings, expected_root)
        };

        if !valid {
            debug!(
                leaf_index = proof.leaf_index,
                root = %expected_root,
                "Inclusion proof does not match root"
            );
        }
        Ok(valid)
    }

    /// Verify a raw segment: re-encode it at the proof's index, then verify.
    pub fn verify_segment(
        &self,
        segment: &TelemetrySegment,
        proof: &InclusionProof,
        expected_root: &HashValue,
    ) -> MerkleResult<bool> {
        let leaf_hash = leaf::leaf_hash(segment, proof.leaf_index);
        self.verify(&leaf_hash, proof, expected_root)
    }

    /// Verify from hex text only.
    pub fn verify_hex<S: AsRef<str>>(&self, leaf_hex: &str, proof_hex: &[S], root_hex: &str) -> MerkleResult<bool> {
        let valid = proof::verify_hex(leaf_hex, proof_hex, root_hex)
            .inspect_err(|e| warn!(error = %e, "Rejected malformed hex proof"))?;
        if !valid {
            debug!(root = root_hex, "Hex inclusion proof does not match root");
        }
        Ok(valid)
    }
}
