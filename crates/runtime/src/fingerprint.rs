//! Content fingerprints for checked read-modify-write cycles.

use rules_core::RawRecord;
use serde_json::Value;
use sha2::{Digest, Sha256};

/// Hex-encoded SHA-256 of the record's canonical JSON text.
///
/// Keys are serialized in sorted order, so equal records always share a
/// fingerprint regardless of how they were built.
pub fn fingerprint(record: &RawRecord) -> String {
    let text = Value::Object(record.clone()).to_string();
    let mut hasher = Sha256::new();
    hasher.update(text.as_bytes());
    hex::encode(hasher.finalize())
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn record(value: Value) -> RawRecord {
        rules_core::record::as_record(value).unwrap()
    }

    #[test]
    fn test_fingerprint_ignores_insertion_order() {
        let mut a = RawRecord::new();
        a.insert("name".into(), json!("Bob"));
        a.insert("momentum".into(), json!(2));
        let b = record(json!({ "momentum": 2, "name": "Bob" }));
        assert_eq!(fingerprint(&a), fingerprint(&b));
        assert_eq!(fingerprint(&a).len(), 64);
    }

    #[test]
    fn test_fingerprint_tracks_content() {
        let a = record(json!({ "momentum": 2 }));
        let b = record(json!({ "momentum": 3 }));
        assert_ne!(fingerprint(&a), fingerprint(&b));
    }
}
