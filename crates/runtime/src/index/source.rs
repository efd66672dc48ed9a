//! Index of data sources found in the document store.

use std::collections::BTreeSet;

use rules_core::record::has_tag;
use rules_core::schema::SchemaReason;
use rules_core::{DataIndex, DataSource, RawRecord, Revision, SchemaError};
use serde_json::Value;

use super::IndexChange;
use crate::store::StoreEvent;

/// Data sources from the store layered over the bundled ones.
///
/// Store documents tagged as sources contribute their assets, moves and
/// oracles under their identity, at the configured priority. Bundled sources
/// are added once and are never touched by notifications or rebuilds.
#[derive(Debug)]
pub struct SourceIndex {
    data: DataIndex,
    tag: String,
    priority: i32,
    tracked: BTreeSet<String>,
}

impl SourceIndex {
    pub fn new(data: DataIndex, tag: impl Into<String>, priority: i32) -> Self {
        Self {
            data,
            tag: tag.into(),
            priority,
            tracked: BTreeSet::new(),
        }
    }

    pub fn data(&self) -> &DataIndex {
        &self.data
    }

    pub fn revision(&self) -> Revision {
        self.data.revision()
    }

    /// Identities of store documents currently contributing data.
    pub fn tracked(&self) -> impl Iterator<Item = &str> {
        self.tracked.iter().map(String::as_str)
    }

    /// Parses a source document. Fields other than the catalogs are ignored.
    pub fn parse(content: &RawRecord) -> Result<DataSource, SchemaError> {
        serde_json::from_value(Value::Object(content.clone()))
            .map_err(|e| SchemaError::new("", SchemaReason::Invalid(e.to_string())))
    }

    pub fn apply(&mut self, event: &StoreEvent) -> IndexChange {
        match event {
            StoreEvent::Changed { id, content } => self.index_document(id, content),
            StoreEvent::Deleted { id } => self.remove(id),
        }
    }

    pub fn index_document(&mut self, id: &str, content: &RawRecord) -> IndexChange {
        if !has_tag(content, &self.tag) {
            return self.remove(id);
        }
        match Self::parse(content) {
            Ok(source) => {
                self.data.index_source(id, self.priority, source);
                self.tracked.insert(id.to_owned());
                tracing::debug!("Indexed data_source[{}]", id);
                IndexChange::Indexed
            }
            Err(err) => {
                tracing::warn!("Skipping invalid data_source[{}]: {}", id, err);
                self.remove(id)
            }
        }
    }

    pub fn remove(&mut self, id: &str) -> IndexChange {
        if self.tracked.remove(id) {
            self.data.remove_source(id);
            tracing::debug!("Removed data_source[{}] from index", id);
            IndexChange::Removed
        } else {
            IndexChange::Unchanged
        }
    }

    pub fn scan<'a>(&mut self, documents: impl IntoIterator<Item = (&'a String, &'a RawRecord)>) {
        for (id, content) in documents {
            self.index_document(id, content);
        }
    }

    /// Drops every store-backed source and indexes `documents` in their
    /// place, in a single revision of the data index.
    pub fn rebuild<'a>(
        &mut self,
        documents: impl IntoIterator<Item = (&'a String, &'a RawRecord)>,
    ) {
        let mut fresh = Vec::new();
        for (id, content) in documents {
            if !has_tag(content, &self.tag) {
                continue;
            }
            match Self::parse(content) {
                Ok(source) => fresh.push((id.clone(), self.priority, source)),
                Err(err) => tracing::warn!("Skipping invalid data_source[{}]: {}", id, err),
            }
        }
        let stale = std::mem::take(&mut self.tracked);
        self.tracked = fresh.iter().map(|(id, _, _)| id.clone()).collect();
        self.data
            .replace_sources(stale.iter().map(String::as_str), fresh);
        tracing::debug!("Rebuilt {} data sources", self.tracked.len());
    }
}
