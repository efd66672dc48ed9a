//! Document stores and their change notifications.
//!
//! A store maps document identities to raw records. Every successful write or
//! removal is announced as a [`StoreEvent`] on a broadcast channel so that the
//! session's indices can follow along.

mod error;
mod json_dir;
mod memory;

pub use error::{Result, StoreError};
pub use json_dir::JsonDirectoryStore;
pub use memory::InMemoryStore;

use async_trait::async_trait;
use rules_core::RawRecord;
use tokio::sync::broadcast;

/// Default capacity of a store's notification channel.
pub const DEFAULT_EVENT_CAPACITY: usize = 256;

/// Change notification emitted by a store.
#[derive(Clone, Debug, PartialEq)]
pub enum StoreEvent {
    Changed { id: String, content: RawRecord },
    Deleted { id: String },
}

impl StoreEvent {
    pub fn id(&self) -> &str {
        match self {
            Self::Changed { id, .. } | Self::Deleted { id } => id,
        }
    }
}

/// Persistent storage for raw documents.
#[async_trait]
pub trait DocumentStore: Send + Sync {
    /// Current content of `id`, or `None` if there is no such document.
    async fn get(&self, id: &str) -> Result<Option<RawRecord>>;

    /// Replaces the content of `id` and announces the change.
    async fn set(&self, id: &str, content: RawRecord) -> Result<()>;

    /// Removes `id`. Returns whether it existed; only then is a deletion
    /// announced.
    async fn remove(&self, id: &str) -> Result<bool>;

    /// Every document, ordered by identity.
    async fn list(&self) -> Result<Vec<(String, RawRecord)>>;

    /// Receiver for notifications sent after this call.
    fn subscribe(&self) -> broadcast::Receiver<StoreEvent>;
}

/// Sends `event`, ignoring the absence of subscribers.
pub(crate) fn announce(sender: &broadcast::Sender<StoreEvent>, event: StoreEvent) {
    let id = event.id().to_owned();
    if sender.send(event).is_err() {
        tracing::trace!("No subscribers for change to {}", id);
    }
}
