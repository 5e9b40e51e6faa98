//! Digest type and the hashing primitives shared by the builder and verifier.
//!
//! Every hash in the engine is a SHA-256 digest. Leaves hash the canonical
//! segment payload directly; inner nodes hash the byte-sorted concatenation of
//! their two children (see [`combine`]).

use std::fmt;
use std::str::FromStr;

use serde::de::{self, Deserializer};
use serde::{Deserialize, Serialize, Serializer};
use sha2::{Digest, Sha256};

use crate::error::{MerkleError, MerkleResult};
use crate::HASH_LENGTH;

/// A 32-byte digest.
///
/// Held as raw bytes for comparisons and rendered as 64 lowercase hex
/// characters everywhere it crosses the library boundary.
#[derive(Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
pub struct HashValue([u8; HASH_LENGTH]);

impl HashValue {
    /// Create a hash value from raw bytes.
    pub const fn new(bytes: [u8; HASH_LENGTH]) -> Self {
        Self(bytes)
    }

    /// Create a hash value from a byte slice of exactly [`HASH_LENGTH`] bytes.
    pub fn from_slice(bytes: &[u8]) -> MerkleResult<Self> {
        let bytes: [u8; HASH_LENGTH] = bytes.try_into().map_err(|_| MerkleError::InvalidHashLength {
            expected: HASH_LENGTH,
            got: bytes.len(),
        })?;
        Ok(Self(bytes))
    }

    /// Parse a 64-character hex digest. Upper-case input is accepted.
    pub fn from_hex(s: &str) -> MerkleResult<Self> {
        if s.len() != HASH_LENGTH * 2 {
            return Err(MerkleError::InvalidHex(format!(
                "expected {} hex characters, got {}",
                HASH_LENGTH * 2,
                s.len()
            )));
        }
        let mut bytes = [0u8; HASH_LENGTH];
        hex::decode_to_slice(s, &mut bytes).map_err(|e| MerkleError::InvalidHex(e.to_string()))?;
        Ok(Self(bytes))
    }

    /// Lowercase hex rendering.
    pub fn to_hex(&self) -> String {
        hex::encode(self.0)
    }

    pub fn as_bytes(&self) -> &[u8; HASH_LENGTH] {
        &self.0
    }
}

impl From<[u8; HASH_LENGTH]> for HashValue {
    fn from(bytes: [u8; HASH_LENGTH]) -> Self {
        Self(bytes)
    }
}

impl AsRef<[u8]> for HashValue {
    fn as_ref(&self) -> &[u8] {
        &self.0
    }
}

impl fmt::Display for HashValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_hex())
    }
}

impl fmt::Debug for HashValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "HashValue({})", self.to_hex())
    }
}

impl FromStr for HashValue {
    type Err = MerkleError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::from_hex(s)
    }
}

impl Serialize for HashValue {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.to_hex())
    }
}

impl<'de> Deserialize<'de> for HashValue {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let s = String::deserialize(deserializer)?;
        Self::from_hex(&s).map_err(de::Error::custom)
    }
}

/// SHA-256 of arbitrary bytes.
pub fn sha256(data: &[u8]) -> HashValue {
    let result = Sha256::digest(data);
    let mut bytes = [0u8; HASH_LENGTH];
    bytes.copy_from_slice(&result);
    HashValue::new(bytes)
}

/// Hash two sibling nodes into their parent.
///
/// The pair is sorted by byte value before concatenation, so
/// `combine(a, b) == combine(b, a)`. Builder and verifier must both go
/// through this function.
pub fn combine(a: &HashValue, b: &HashValue) -> HashValue {
    let (lo, hi) = if a <= b { (a, b) } else { (b, a) };
    let mut hasher = Sha256::new();
    hasher.update(lo.as_bytes());
    hasher.update(hi.as_bytes());
    let result = hasher.finalize();
    let mut bytes = [0u8; HASH_LENGTH];
    bytes.copy_from_slice(&result);
    HashValue::new(bytes)
}
