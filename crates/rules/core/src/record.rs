//! Raw key/value documents and the helpers shared by every document kind.
//!
//! A raw record is an open, string-keyed map (front-matter style). The core
//! never mutates a record in place: every update clones and returns a new one.

use serde_json::Value;

/// Open key/value document as handed over by the document store.
pub type RawRecord = serde_json::Map<String, Value>;

/// Field holding a document's classification tags.
pub const TAGS_KEY: &str = "tags";

/// Kinds of documents the tracker knows how to index.
#[derive(
    Clone,
    Copy,
    Debug,
    PartialEq,
    Eq,
    Hash,
    PartialOrd,
    Ord,
    strum::Display,
    strum::EnumString,
    strum::EnumIter,
)]
#[strum(serialize_all = "snake_case")]
pub enum DocumentKind {
    Character,
    ProgressTrack,
    Clock,
    DataSource,
}

/// Values backed by a raw record that can be written back to the store.
pub trait RecordBacked {
    /// The record as it should be persisted.
    fn raw(&self) -> &RawRecord;
}

impl RecordBacked for RawRecord {
    fn raw(&self) -> &RawRecord {
        self
    }
}

/// Returns the tags declared on a record, with any leading `#` stripped.
///
/// The `tags` field may be a single string or an array of strings; anything
/// else is treated as "no tags".
pub fn tags(record: &RawRecord) -> Vec<&str> {
    match record.get(TAGS_KEY) {
        Some(Value::String(tag)) => strip_tag(tag).into_iter().collect(),
        Some(Value::Array(values)) => values
            .iter()
            .filter_map(Value::as_str)
            .filter_map(strip_tag)
            .collect(),
        _ => Vec::new(),
    }
}

fn strip_tag(tag: &str) -> Option<&str> {
    let tag = tag.trim().trim_start_matches('#');
    (!tag.is_empty()).then_some(tag)
}

/// Returns true if `record` carries `tag` (with or without a leading `#`).
pub fn has_tag(record: &RawRecord, tag: &str) -> bool {
    let wanted = tag.trim_start_matches('#');
    tags(record).iter().any(|t| *t == wanted)
}

/// Upper-cases the first character of `s`.
pub fn title_case(s: &str) -> String {
    let mut chars = s.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}

/// Converts a JSON object value into a record, if it is one.
pub fn as_record(value: Value) -> Option<RawRecord> {
    match value {
        Value::Object(map) => Some(map),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn tags_accept_strings_and_arrays() {
        let single = as_record(json!({ "tags": "#character" })).unwrap();
        assert_eq!(tags(&single), vec!["character"]);

        let many = as_record(json!({ "tags": ["progress", "#vow", 3, ""] })).unwrap();
        assert_eq!(tags(&many), vec!["progress", "vow"]);
        assert!(has_tag(&many, "#vow"));
        assert!(!has_tag(&many, "clock"));

        let none = as_record(json!({ "tags": 5 })).unwrap();
        assert!(tags(&none).is_empty());
    }

    #[test]
    fn title_case_only_touches_the_first_letter() {
        assert_eq!(title_case("quests"), "Quests");
        assert_eq!(title_case("bonds legacy"), "Bonds legacy");
        assert_eq!(title_case(""), "");
    }

    #[test]
    fn document_kind_names() {
        assert_eq!(DocumentKind::ProgressTrack.to_string(), "progress_track");
        assert_eq!("clock".parse::<DocumentKind>(), Ok(DocumentKind::Clock));
    }
}
