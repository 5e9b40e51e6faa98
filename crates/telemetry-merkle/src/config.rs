//! Engine configuration

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::{MerkleError, MerkleResult};

/// Default upper bound on segments per tree.
pub const DEFAULT_MAX_SEGMENTS: usize = 1 << 20;

/// Tunables for [`MerkleIntegrityEngine`](crate::engine::MerkleIntegrityEngine).
///
/// None of these affect hashing; a root built under one configuration
/// verifies under any other.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct EngineConfig {
    /// Largest batch `build` accepts
    pub max_segments: usize,

    /// Reject proofs whose sibling count does not match their leaf count
    pub strict_proof_shape: bool,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            max_segments: DEFAULT_MAX_SEGMENTS,
            strict_proof_shape: true,
        }
    }
}

impl EngineConfig {
    /// Load config from a TOML file
    pub fn load<P: AsRef<Path>>(path: P) -> MerkleResult<Self> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path)
            .map_err(|e| MerkleError::Config(format!("{}: {}", path.display(), e)))?;
        Self::from_toml_str(&content)
    }

    /// Parse config from TOML text
    pub fn from_toml_str(content: &str) -> MerkleResult<Self> {
        let config: EngineConfig = toml::from_str(content).map_err(|e| MerkleError::Config(e.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    /// Render as TOML
    pub fn to_toml_string(&self) -> MerkleResult<String> {
        toml::to_string_pretty(self).map_err(|e| MerkleError::Config(e.to_string()))
    }

    fn validate(&self) -> MerkleResult<()> {
        if self.max_segments == 0 {
            return Err(MerkleError::Config("max_segments must be at least 1".to_string()));
        }
        Ok(())
    }
}
