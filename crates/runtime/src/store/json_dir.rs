//! Directory-backed document store: one `<identity>.json` file per document.

use std::path::{Path, PathBuf};

use async_trait::async_trait;
use rules_core::RawRecord;
use serde_json::Value;
use tokio::fs;
use tokio::sync::broadcast;

use super::{DEFAULT_EVENT_CAPACITY, DocumentStore, Result, StoreError, StoreEvent, announce};

const EXTENSION: &str = "json";

/// File-based implementation of [`DocumentStore`].
///
/// Writes go to a temporary file first and are renamed into place. Only
/// changes made through this store are announced; edits made to the
/// directory by other programs are picked up by the next scan.
pub struct JsonDirectoryStore {
    base_dir: PathBuf,
    events: broadcast::Sender<StoreEvent>,
}

impl JsonDirectoryStore {
    /// Open (and create if needed) a store rooted at `base_dir`.
    pub fn new(base_dir: impl AsRef<Path>) -> Result<Self> {
        let base_dir = base_dir.as_ref().to_path_buf();
        std::fs::create_dir_all(&base_dir)?;
        Ok(Self {
            base_dir,
            events: broadcast::channel(DEFAULT_EVENT_CAPACITY).0,
        })
    }

    pub fn base_dir(&self) -> &Path {
        &self.base_dir
    }

    fn document_path(&self, id: &str) -> Result<PathBuf> {
        let valid = !id.is_empty()
            && !id.starts_with('.')
            && !id.contains(['/', '\\'])
            && !id.contains('\0');
        if !valid {
            return Err(StoreError::InvalidIdentity(id.to_owned()));
        }
        Ok(self.base_dir.join(format!("{id}.{EXTENSION}")))
    }

    async fn read_document(id: &str, path: &Path) -> Result<RawRecord> {
        let bytes = fs::read(path).await?;
        let value: Value = serde_json::from_slice(&bytes).map_err(|e| StoreError::Json {
            id: id.to_owned(),
            reason: e.to_string(),
        })?;
        match value {
            Value::Object(record) => Ok(record),
            _ => Err(StoreError::NotAnObject(id.to_owned())),
        }
    }
}

#[async_trait]
impl DocumentStore for JsonDirectoryStore {
    async fn get(&self, id: &str) -> Result<Option<RawRecord>> {
        let path = self.document_path(id)?;
        if !fs::try_exists(&path).await? {
            return Ok(None);
        }
        Self::read_document(id, &path).await.map(Some)
    }

    async fn set(&self, id: &str, content: RawRecord) -> Result<()> {
        let path = self.document_path(id)?;
        let temp_path = path.with_extension("json.tmp");

        let bytes = serde_json::to_vec_pretty(&content).map_err(|e| StoreError::Json {
            id: id.to_owned(),
            reason: e.to_string(),
        })?;
        fs::write(&temp_path, bytes).await?;
        fs::rename(&temp_path, &path).await?;

        tracing::debug!("Saved {} to {}", id, path.display());
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
        let path = self.document_path(id)?;
        if !fs::try_exists(&path).await? {
            return Ok(false);
        }
        fs::remove_file(&path).await?;

        tracing::debug!("Deleted {}", id);
        announce(&self.events, StoreEvent::Deleted { id: id.to_owned() });
        Ok(true)
    }

    /// Lists every readable document. Files that are not JSON objects are
    /// logged and left out.
    async fn list(&self) -> Result<Vec<(String, RawRecord)>> {
        let mut entries = fs::read_dir(&self.base_dir).await?;
        let mut ids = Vec::new();
        while let Some(entry) = entries.next_entry().await? {
            let path = entry.path();
            if let Some(filename) = path.file_name().and_then(|s| s.to_str())
                && let Some(id) = filename.strip_suffix(".json")
                && !id.is_empty()
                && !id.starts_with('.')
            {
                ids.push(id.to_owned());
            }
        }
        ids.sort_unstable();

        let mut documents = Vec::with_capacity(ids.len());
        for id in ids {
            let path = self.document_path(&id)?;
            match Self::read_document(&id, &path).await {
                Ok(content) => documents.push((id, content)),
                Err(err) => tracing::warn!("Skipping unreadable document {}: {}", id, err),
            }
        }
        Ok(documents)
    }

    fn subscribe(&self) -> broadcast::Receiver<StoreEvent> {
        self.events.subscribe()
    }
}
