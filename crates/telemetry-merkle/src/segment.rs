//! Telemetry segment input record.

use chrono::{DateTime, SubsecRound, Utc};
use serde::{Deserialize, Serialize};

use crate::error::{MerkleError, MerkleResult};

/// A time-bounded slice of vehicle telemetry supplied by the ingestion side.
///
/// Segments are validated once, at construction, so that encoding never has
/// to fail. The engine only ever reads them.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "RawSegment", rename_all = "camelCase")]
pub struct TelemetrySegment {
    start_time: DateTime<Utc>,
    end_time: DateTime<Utc>,
    distance: f64,
    #[serde(skip_serializing_if = "Option::is_none")]
    raw_data_reference: Option<String>,
}

/// Unchecked wire form, validated into [`TelemetrySegment`].
#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct RawSegment {
    start_time: DateTime<Utc>,
    end_time: DateTime<Utc>,
    distance: f64,
    #[serde(default)]
    raw_data_reference: Option<String>,
}

impl TryFrom<RawSegment> for TelemetrySegment {
    type Error = MerkleError;

    fn try_from(raw: RawSegment) -> MerkleResult<Self> {
        Self::new(raw.start_time, raw.end_time, raw.distance, raw.raw_data_reference)
    }
}

impl TelemetrySegment {
    /// Create a segment.
    ///
    /// Timestamps are truncated to whole milliseconds and `-0.0` becomes
    /// `0.0`, so the stored segment is exactly what the leaf hash commits to.
    ///
    /// Fails with [`MerkleError::InvalidSegment`] if the segment ends before it
    /// starts, or if `distance` is negative, NaN or infinite.
    pub fn new(
        start_time: DateTime<Utc>,
        end_time: DateTime<Utc>,
        distance: f64,
        raw_data_reference: Option<String>,
    ) -> MerkleResult<Self> {
        let start_time = start_time.trunc_subsecs(3);
        let end_time = end_time.trunc_subsecs(3);
        if end_time < start_time {
            return Err(MerkleError::InvalidSegment(format!(
                "end time {} precedes start time {}",
                end_time.to_rfc3339(),
                start_time.to_rfc3339()
            )));
        }
        if !distance.is_finite() || distance < 0.0 {
            return Err(MerkleError::InvalidSegment(format!(
                "distance must be a finite non-negative number, got {}",
                distance
            )));
        }
        // -0.0 == 0.0, but the two render differently in the payload
        let distance = if distance == 0.0 { 0.0 } else { distance };
        Ok(Self {
            start_time,
            end_time,
            distance,
            raw_data_reference,
        })
    }

    pub fn start_time(&self) -> DateTime<Utc> {
        self.start_time
    }

    pub fn end_time(&self) -> DateTime<Utc> {
        self.end_time
    }

    pub fn distance(&self) -> f64 {
        self.distance
    }

    /// Opaque pointer to the off-tree raw data, if any.
    pub fn raw_data_reference(&self) -> Option<&str> {
        self.raw_data_reference.as_deref()
    }
}
