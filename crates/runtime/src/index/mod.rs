//! Validate-or-skip indices over the document store.
//!
//! Each index follows one kind of document. A document enters its index when
//! it carries the kind's marker tag and validates; any other content removes
//! it. An unindexable document is treated exactly like an absent one.

mod indexers;
mod source;

pub use indexers::{CharacterContext, CharacterIndexer, ClockIndexer, ProgressIndexer};
pub use source::SourceIndex;

use rules_core::record::has_tag;
use rules_core::{DocumentKind, RawRecord, Revision, SchemaError, VersionedMap};

use crate::store::StoreEvent;

/// Turns the raw content of one kind of document into its indexed value.
pub trait Indexer {
    type Value: Clone;

    const KIND: DocumentKind;

    /// Validates content that already carries the kind's marker tag.
    fn index(&self, content: &RawRecord) -> Result<Self::Value, SchemaError>;
}

/// What applying one document did to an index.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum IndexChange {
    Indexed,
    Removed,
    Unchanged,
}

/// An index of one document kind keyed by identity.
#[derive(Debug)]
pub struct DocumentIndex<I: Indexer> {
    indexer: I,
    tag: String,
    entries: VersionedMap<String, I::Value>,
}

impl<I: Indexer> DocumentIndex<I> {
    /// An empty index of documents tagged `tag`.
    pub fn new(indexer: I, tag: impl Into<String>) -> Self {
        Self {
            indexer,
            tag: tag.into(),
            entries: VersionedMap::new(),
        }
    }

    pub fn indexer(&self) -> &I {
        &self.indexer
    }

    pub fn tag(&self) -> &str {
        &self.tag
    }

    pub fn revision(&self) -> Revision {
        self.entries.revision()
    }

    pub fn get(&self, id: &str) -> Option<&I::Value> {
        self.entries.get(id)
    }

    pub fn contains(&self, id: &str) -> bool {
        self.entries.contains_key(id)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn entries(&self) -> &VersionedMap<String, I::Value> {
        &self.entries
    }

    /// Validates `content` in `indexer`'s terms without touching any index.
    pub fn classify(&self, content: &RawRecord) -> Option<Result<I::Value, SchemaError>> {
        has_tag(content, &self.tag).then(|| self.indexer.index(content))
    }

    /// Applies one store notification.
    pub fn apply(&mut self, event: &StoreEvent) -> IndexChange {
        match event {
            StoreEvent::Changed { id, content } => self.index_document(id, content),
            StoreEvent::Deleted { id } => self.remove(id),
        }
    }

    /// Indexes `content` under `id`, or drops `id` if the content does not
    /// belong in this index.
    pub fn index_document(&mut self, id: &str, content: &RawRecord) -> IndexChange {
        index_into(&self.indexer, &self.tag, &mut self.entries, id, content)
    }

    /// Drops `id`. Removing an absent identity is a no-op.
    pub fn remove(&mut self, id: &str) -> IndexChange {
        if self.entries.remove(id).is_some() {
            tracing::debug!("Removed {}[{}] from index", I::KIND, id);
            IndexChange::Removed
        } else {
            IndexChange::Unchanged
        }
    }

    /// Applies every document, as if each had been announced as changed.
    pub fn scan<'a>(&mut self, documents: impl IntoIterator<Item = (&'a String, &'a RawRecord)>) {
        for (id, content) in documents {
            self.index_document(id, content);
        }
    }

    /// Replaces the whole index with `documents` in a single revision.
    pub fn rebuild<'a>(
        &mut self,
        documents: impl IntoIterator<Item = (&'a String, &'a RawRecord)>,
    ) {
        let Self {
            indexer,
            tag,
            entries,
        } = self;
        entries.as_single_revision(|entries| {
            entries.clear();
            for (id, content) in documents {
                index_into(indexer, tag, entries, id, content);
            }
        });
    }
}

fn index_into<I: Indexer>(
    indexer: &I,
    tag: &str,
    entries: &mut VersionedMap<String, I::Value>,
    id: &str,
    content: &RawRecord,
) -> IndexChange {
    if !has_tag(content, tag) {
        return match entries.remove(id) {
            Some(_) => {
                tracing::debug!("Removed untagged {}[{}] from index", I::KIND, id);
                IndexChange::Removed
            }
            None => IndexChange::Unchanged,
        };
    }

    match indexer.index(content) {
        Ok(value) => {
            entries.insert(id.to_owned(), value);
            tracing::debug!("Indexed {}[{}]", I::KIND, id);
            IndexChange::Indexed
        }
        Err(err) => {
            tracing::warn!("Skipping invalid {}[{}]: {}", I::KIND, id, err);
            match entries.remove(id) {
                Some(_) => IndexChange::Removed,
                None => IndexChange::Unchanged,
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rules_core::record::as_record;
    use serde_json::{Value, json};

    fn record(value: Value) -> RawRecord {
        as_record(value).unwrap()
    }

    fn clock(filled: i64) -> RawRecord {
        record(json!({ "tags": "clock", "Segments": 4, "Filled": filled, "Active": true }))
    }

    fn index() -> DocumentIndex<ClockIndexer> {
        DocumentIndex::new(ClockIndexer, "clock")
    }

    #[test]
    fn test_valid_tagged_documents_are_indexed() {
        let mut index = index();
        assert_eq!(index.index_document("doom", &clock(1)), IndexChange::Indexed);
        assert_eq!(index.get("doom").unwrap().clock().filled(), 1);
        assert_eq!(index.revision(), 1);
    }

    #[test]
    fn test_untagged_or_invalid_documents_are_dropped() {
        let mut index = index();
        index.index_document("doom", &clock(1));

        let untagged = record(json!({ "Segments": 4, "Filled": 1, "Active": true }));
        assert_eq!(index.index_document("doom", &untagged), IndexChange::Removed);
        assert!(!index.contains("doom"));

        index.index_document("doom", &clock(1));
        assert_eq!(index.index_document("doom", &clock(9)), IndexChange::Removed);
        assert!(index.is_empty());

        assert_eq!(index.index_document("other", &clock(9)), IndexChange::Unchanged);
    }

    #[test]
    fn test_removing_absent_identity_is_noop() {
        let mut index = index();
        let revision = index.revision();
        assert_eq!(
            index.apply(&StoreEvent::Deleted { id: "nope".into() }),
            IndexChange::Unchanged
        );
        assert_eq!(index.revision(), revision);
    }

    #[test]
    fn test_scan_matches_incremental_application() {
        let documents = vec![
            ("a".to_string(), clock(1)),
            ("b".to_string(), clock(7)),
            ("c".to_string(), record(json!({ "tags": "note" }))),
            ("d".to_string(), clock(4)),
        ];

        let mut scanned = index();
        scanned.scan(documents.iter().map(|(id, content)| (id, content)));

        let mut incremental = index();
        for (id, content) in &documents {
            incremental.apply(&StoreEvent::Changed {
                id: id.clone(),
                content: content.clone(),
            });
        }

        let keys = |index: &DocumentIndex<ClockIndexer>| {
            index.entries().keys().cloned().collect::<Vec<_>>()
        };
        assert_eq!(keys(&scanned), vec!["a", "d"]);
        assert_eq!(keys(&scanned), keys(&incremental));
        assert_eq!(scanned.get("d"), incremental.get("d"));
    }

    #[test]
    fn test_rebuild_is_one_revision() {
        let mut index = index();
        index.index_document("stale", &clock(1));
        let before = index.revision();

        let documents = vec![("a".to_string(), clock(2)), ("b".to_string(), clock(3))];
        index.rebuild(documents.iter().map(|(id, content)| (id, content)));

        assert_eq!(index.revision(), before + 1);
        assert!(!index.contains("stale"));
        assert_eq!(index.len(), 2);
    }
}
