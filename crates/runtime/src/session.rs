//! The session: every index over one document store, and the updaters that
//! write back to it.

use std::sync::Arc;

use rules_core::data::OracleRoll;
use rules_core::{
    Character, CharacterLens, Clock, ClockDocument, DataIndex, LensError, ProgressTrack,
    ProgressTrackDocument, ProjectableMap, RandomSource, RawRecord, RecordBacked, Ruleset,
    TrackerConfig, WritePolicy,
};
use tokio::sync::broadcast::{self, error::RecvError};

use crate::error::{Result, RuntimeError};
use crate::fingerprint::fingerprint;
use crate::index::{
    CharacterIndexer, ClockIndexer, DocumentIndex, Indexer, ProgressIndexer, SourceIndex,
};
use crate::store::{DocumentStore, StoreEvent};

/// Index sizes, for status lines.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct SessionSummary {
    pub characters: usize,
    pub progress_tracks: usize,
    pub clocks: usize,
    pub assets: usize,
    pub moves: usize,
    pub oracles: usize,
}

/// Indices of characters, progress tracks, clocks and data sources kept in
/// step with a document store.
///
/// Notifications are applied one at a time through [`Session::handle`], so
/// every index observes the same order of changes.
pub struct Session {
    config: TrackerConfig,
    lens: Arc<CharacterLens>,
    characters: DocumentIndex<CharacterIndexer>,
    progress: DocumentIndex<ProgressIndexer>,
    clocks: DocumentIndex<ClockIndexer>,
    sources: SourceIndex,
}

impl Session {
    /// A session with empty document indices over `data`, the bundled sources.
    pub fn new(ruleset: Arc<Ruleset>, data: DataIndex, config: TrackerConfig) -> Self {
        let lens = Arc::new(CharacterLens::new(ruleset));
        let tags = &config.tags;
        Self {
            characters: DocumentIndex::new(
                CharacterIndexer::new(Arc::clone(&lens)),
                tags.character.clone(),
            ),
            progress: DocumentIndex::new(ProgressIndexer, tags.progress.clone()),
            clocks: DocumentIndex::new(ClockIndexer, tags.clock.clone()),
            sources: SourceIndex::new(data, tags.source.clone(), config.source_priority),
            lens,
            config,
        }
    }

    pub fn config(&self) -> &TrackerConfig {
        &self.config
    }

    pub fn lens(&self) -> &Arc<CharacterLens> {
        &self.lens
    }

    pub fn characters(&self) -> &DocumentIndex<CharacterIndexer> {
        &self.characters
    }

    pub fn progress_tracks(&self) -> &DocumentIndex<ProgressIndexer> {
        &self.progress
    }

    pub fn clocks(&self) -> &DocumentIndex<ClockIndexer> {
        &self.clocks
    }

    pub fn sources(&self) -> &SourceIndex {
        &self.sources
    }

    pub fn data(&self) -> &DataIndex {
        self.sources.data()
    }

    pub fn summary(&self) -> SessionSummary {
        let data = self.data();
        SessionSummary {
            characters: self.characters.len(),
            progress_tracks: self.progress.len(),
            clocks: self.clocks.len(),
            assets: data.assets().len(),
            moves: data.moves().len(),
            oracles: data.oracles().len(),
        }
    }

    /// Applies one store notification to every index.
    pub fn handle(&mut self, event: &StoreEvent) {
        self.characters.apply(event);
        self.progress.apply(event);
        self.clocks.apply(event);
        self.sources.apply(event);
    }

    /// Indexes every document currently in `store`.
    pub async fn scan<S>(&mut self, store: &S) -> Result<()>
    where
        S: DocumentStore + ?Sized,
    {
        let documents = store.list().await?;
        let entries = || documents.iter().map(|(id, content)| (id, content));
        self.characters.scan(entries());
        self.progress.scan(entries());
        self.clocks.scan(entries());
        self.sources.scan(entries());
        tracing::info!("Scanned {} documents", documents.len());
        Ok(())
    }

    /// Replaces every index with the current content of `store`.
    pub async fn rebuild<S>(&mut self, store: &S) -> Result<()>
    where
        S: DocumentStore + ?Sized,
    {
        let documents = store.list().await?;
        let entries = || documents.iter().map(|(id, content)| (id, content));
        self.characters.rebuild(entries());
        self.progress.rebuild(entries());
        self.clocks.rebuild(entries());
        self.sources.rebuild(entries());
        tracing::info!("Rebuilt indices from {} documents", documents.len());
        Ok(())
    }

    /// Applies notifications until the channel closes.
    ///
    /// If the receiver falls behind, the missed notifications are unknown, so
    /// every index is rebuilt from `store`.
    pub async fn run<S>(
        &mut self,
        store: &S,
        mut events: broadcast::Receiver<StoreEvent>,
    ) -> Result<()>
    where
        S: DocumentStore + ?Sized,
    {
        loop {
            match events.recv().await {
                Ok(event) => self.handle(&event),
                Err(RecvError::Lagged(skipped)) => {
                    tracing::warn!("Missed {} store notifications, rebuilding", skipped);
                    self.rebuild(store).await?;
                }
                Err(RecvError::Closed) => {
                    tracing::debug!("Store notification channel closed");
                    return Ok(());
                }
            }
        }
    }

    /// Read-modify-write of a character.
    pub async fn update_character<S, F>(&self, store: &S, id: &str, update: F) -> Result<Character>
    where
        S: DocumentStore + ?Sized,
        F: FnOnce(&CharacterLens, &Character) -> std::result::Result<Character, LensError>,
    {
        self.read_modify_write(store, &self.characters, id, |context| {
            let updated = update(&context.lens, &context.character)?;
            let raw = updated.raw().clone();
            Ok((updated, raw))
        })
        .await
    }

    /// Read-modify-write of a progress track document.
    pub async fn update_progress<S, F>(
        &self,
        store: &S,
        id: &str,
        update: F,
    ) -> Result<ProgressTrackDocument>
    where
        S: DocumentStore + ?Sized,
        F: FnOnce(&ProgressTrack) -> ProgressTrack,
    {
        self.read_modify_write(store, &self.progress, id, |document| {
            let updated = document.updating_track(update);
            let raw = updated.raw().clone();
            Ok((updated, raw))
        })
        .await
    }

    /// Read-modify-write of a clock document.
    pub async fn update_clock<S, F>(&self, store: &S, id: &str, update: F) -> Result<ClockDocument>
    where
        S: DocumentStore + ?Sized,
        F: FnOnce(&Clock) -> Clock,
    {
        self.read_modify_write(store, &self.clocks, id, |document| {
            let updated = document.updating_clock(update);
            let raw = updated.raw().clone();
            Ok((updated, raw))
        })
        .await
    }

    /// Rolls on the visible oracle `id`.
    pub fn roll_oracle(&self, id: &str, rng: &mut (impl RandomSource + ?Sized)) -> Result<OracleRoll> {
        let oracle = self
            .data()
            .oracles()
            .get(id)
            .ok_or_else(|| RuntimeError::UnknownOracle(id.to_owned()))?;
        Ok(oracle.roll(rng)?)
    }

    /// (i) fetch the current content, (ii) apply `update` to its freshly
    /// validated value, (iii) hand the result back to the store.
    async fn read_modify_write<S, I, T>(
        &self,
        store: &S,
        index: &DocumentIndex<I>,
        id: &str,
        update: impl FnOnce(I::Value) -> Result<(T, RawRecord)>,
    ) -> Result<T>
    where
        S: DocumentStore + ?Sized,
        I: Indexer,
    {
        let not_indexed = || RuntimeError::NotIndexed {
            kind: I::KIND,
            id: id.to_owned(),
        };
        if !index.contains(id) {
            return Err(not_indexed());
        }

        let current = store.get(id).await?.ok_or_else(not_indexed)?;
        let Some(Ok(value)) = index.classify(&current) else {
            return Err(not_indexed());
        };
        let (result, updated) = update(value)?;

        if self.config.write_policy == WritePolicy::Fingerprint {
            let expected = fingerprint(&current);
            let found = store
                .get(id)
                .await?
                .map(|content| fingerprint(&content))
                .unwrap_or_default();
            if found != expected {
                tracing::warn!("Conflicting write to {}[{}]", I::KIND, id);
                return Err(RuntimeError::Conflict {
                    id: id.to_owned(),
                    expected,
                    found,
                });
            }
        }

        store.set(id, updated).await?;
        tracing::info!("Updated {}[{}]", I::KIND, id);
        Ok(result)
    }
}
