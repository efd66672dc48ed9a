//! In-memory document store for tests and local runs.

use std::collections::BTreeMap;
use std::sync::RwLock;

use async_trait::async_trait;
use rules_core::RawRecord;
use tokio::sync::broadcast;

use super::{DEFAULT_EVENT_CAPACITY, DocumentStore, Result, StoreError, StoreEvent, announce};

/// In-memory implementation of [`DocumentStore`].
pub struct InMemoryStore {
    documents: RwLock<BTreeMap<String, RawRecord>>,
    events: broadcast::Sender<StoreEvent>,
}

impl InMemoryStore {
    /// Create a new empty in-memory store.
    pub fn new() -> Self {
        Self::with_capacity(DEFAULT_EVENT_CAPACITY)
    }

    /// Create a store whose notification channel holds `capacity` events.
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            documents: RwLock::new(BTreeMap::new()),
            events: broadcast::channel(capacity).0,
        }
    }

    /// Create a store pre-filled with `documents`, without announcing them.
    pub fn with_documents(documents: impl IntoIterator<Item = (String, RawRecord)>) -> Self {
        let store = Self::new();
        if let Ok(mut map) = store.documents.write() {
            map.extend(documents);
        }
        store
    }
}

impl Default for InMemoryStore {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl DocumentStore for InMemoryStore {
    async fn get(&self, id: &str) -> Result<Option<RawRecord>> {
        let documents = self
            .documents
            .read()
            .map_err(|_| StoreError::LockPoisoned)?;
        Ok(documents.get(id).cloned())
    }

    async fn set(&self, id: &str, content: RawRecord) -> Result<()> {
        {
            let mut documents = self
                .documents
                .write()
                .map_err(|_| StoreError::LockPoisoned)?;
            documents.insert(id.to_owned(), content.clone());
        }
        announce(
            &self.events,
            StoreEvent::Changed {
                id: id.to_owned(),
                content,
            },
        );
        Ok(())
    }

    async fn remove(&self, id: &str) -> Result<bool> {
        let removed = self
            .documents
            .write()
            .map_err(|_| StoreError::LockPoisoned)?
            .remove(id)
            .is_some();
        if removed {
            announce(&self.events, StoreEvent::Deleted { id: id.to_owned() });
        }
        Ok(removed)
    }

    async fn list(&self) -> Result<Vec<(String, RawRecord)>> {
        let documents = self
            .documents
            .read()
            .map_err(|_| StoreError::LockPoisoned)?;
        Ok(documents
            .iter()
            .map(|(id, content)| (id.clone(), content.clone()))
            .collect())
    }

    fn subscribe(&self) -> broadcast::Receiver<StoreEvent> {
        self.events.subscribe()
    }
}
