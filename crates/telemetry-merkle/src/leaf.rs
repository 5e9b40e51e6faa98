//! Canonical leaf encoding.
//!
//! A segment is rendered as a compact JSON array with a fixed field order:
//!
//! ```text
//! [index,"startTime","endTime",distance,rawDataReference|null]
//! ```
//!
//! - timestamps are RFC 3339 UTC with millisecond precision and a `Z` suffix
//! - `distance` is the shortest round-trip JSON number (`12.5`, `40.0`)
//! - a missing raw data reference is `null`
//!
//! The leaf hash is SHA-256 over the UTF-8 bytes of that array. This layout is
//! frozen: any change to it changes every root ever published.

use chrono::{DateTime, SecondsFormat, Utc};
use serde_json::Value;

use crate::hash::{sha256, HashValue};
use crate::segment::TelemetrySegment;

/// The hashed form of one segment at a fixed position.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Leaf {
    index: u32,
    hash: HashValue,
    canonical_payload: Vec<u8>,
}

impl Leaf {
    /// Position of the segment in the input sequence
    pub fn index(&self) -> u32 {
        self.index
    }

    pub fn hash(&self) -> HashValue {
        self.hash
    }

    /// The exact bytes that were hashed
    pub fn canonical_payload(&self) -> &[u8] {
        &self.canonical_payload
    }
}

/// Encode a segment at `index` into its leaf.
pub fn encode(segment: &TelemetrySegment, index: u32) -> Leaf {
    let canonical_payload = canonical_payload(segment, index);
    let hash = sha256(&canonical_payload);
    Leaf {
        index,
        hash,
        canonical_payload,
    }
}

/// Hash of the segment at `index`, without keeping the payload.
pub fn leaf_hash(segment: &TelemetrySegment, index: u32) -> HashValue {
    sha256(&canonical_payload(segment, index))
}

fn canonical_payload(segment: &TelemetrySegment, index: u32) -> Vec<u8> {
    // Array, not object: field order is positional and never depends on key sorting.
    let fields = Value::Array(vec![
        Value::from(index),
        Value::from(iso_millis(segment.start_time())),
        Value::from(iso_millis(segment.end_time())),
        Value::from(segment.distance()),
        segment.raw_data_reference().map_or(Value::Null, Value::from),
    ]);
    fields.to_string().into_bytes()
}

fn iso_millis(ts: DateTime<Utc>) -> String {
    ts.to_rfc3339_opts(SecondsFormat::Millis, true)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn segment(distance: f64, reference: Option<&str>) -> TelemetrySegment {
        TelemetrySegment::new(
            Utc.with_ymd_and_hms(2024, 3, 1, 8, 0, 0).unwrap(),
            Utc.with_ymd_and_hms(2024, 3, 1, 8, 30, 0).unwrap(),
            distance,
            reference.map(str::to_string),
        )
        .unwrap()
    }

    #[test]
    fn test_golden_payload_and_hash() {
        let leaf = encode(&segment(12.5, Some("ipfs://bafytelemetry0")), 0);
        assert_eq!(
            std::str::from_utf8(leaf.canonical_payload()).unwrap(),
            r#"[0,"2024-03-01T08:00:00.000Z","2024-03-01T08:30:00.000Z",12.5,"ipfs://bafytelemetry0"]"#
        );
        assert_eq!(
            leaf.hash().to_hex(),
            "833ea7f057a74b5a3fa2bde44383fc64234f48322ed8fa14af2583fc192293d7"
        );
        assert_eq!(leaf.index(), 0);
    }

    #[test]
    fn test_missing_reference_is_null() {
        let leaf = encode(&segment(40.0, None), 7);
        assert_eq!(
            std::str::from_utf8(leaf.canonical_payload()).unwrap(),
            r#"[7,"2024-03-01T08:00:00.000Z","2024-03-01T08:30:00.000Z",40.0,null]"#
        );
    }

    #[test]
    fn test_null_and_literal_null_string_differ() {
        let absent = encode(&segment(1.0, None), 0);
        let literal = encode(&segment(1.0, Some("null")), 0);
        assert_ne!(absent.hash(), literal.hash());
    }

    #[test]
    fn test_reference_is_json_escaped() {
        let leaf = encode(&segment(1.0, Some("a\"b")), 0);
        let text = std::str::from_utf8(leaf.canonical_payload()).unwrap();
        assert!(text.ends_with(r#","a\"b"]"#), "{text}");
    }

    #[test]
    fn test_index_is_part_of_the_hash() {
        let s = segment(12.5, None);
        assert_ne!(encode(&s, 0).hash(), encode(&s, 1).hash());
        assert_eq!(encode(&s, 3).hash(), leaf_hash(&s, 3));
    }

    #[test]
    fn test_encoding_is_pure() {
        let s = segment(12.5, Some("ref"));
        assert_eq!(encode(&s, 2), encode(&s, 2));
    }
}
