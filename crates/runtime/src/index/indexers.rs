//! Indexers for characters, progress tracks and clocks.

use std::sync::Arc;

use rules_core::{
    Character, CharacterLens, ClockDocument, DocumentKind, ProgressTrackDocument, RawRecord,
    SchemaError,
};

use super::Indexer;

/// A validated character together with the lens set it was validated by.
#[derive(Clone, Debug)]
pub struct CharacterContext {
    pub character: Character,
    pub lens: Arc<CharacterLens>,
}

/// Validates characters against one ruleset's lens set.
#[derive(Clone, Debug)]
pub struct CharacterIndexer {
    lens: Arc<CharacterLens>,
}

impl CharacterIndexer {
    pub fn new(lens: Arc<CharacterLens>) -> Self {
        Self { lens }
    }

    pub fn lens(&self) -> &Arc<CharacterLens> {
        &self.lens
    }
}

impl Indexer for CharacterIndexer {
    type Value = CharacterContext;

    const KIND: DocumentKind = DocumentKind::Character;

    fn index(&self, content: &RawRecord) -> Result<CharacterContext, SchemaError> {
        let character = self.lens.validate(content.clone())?;
        Ok(CharacterContext {
            character,
            lens: Arc::clone(&self.lens),
        })
    }
}

#[derive(Clone, Copy, Debug, Default)]
pub struct ProgressIndexer;

impl Indexer for ProgressIndexer {
    type Value = ProgressTrackDocument;

    const KIND: DocumentKind = DocumentKind::ProgressTrack;

    fn index(&self, content: &RawRecord) -> Result<ProgressTrackDocument, SchemaError> {
        ProgressTrackDocument::parse(content.clone())
    }
}

#[derive(Clone, Copy, Debug, Default)]
pub struct ClockIndexer;

impl Indexer for ClockIndexer {
    type Value = ClockDocument;

    const KIND: DocumentKind = DocumentKind::Clock;

    fn index(&self, content: &RawRecord) -> Result<ClockDocument, SchemaError> {
        ClockDocument::parse(content.clone())
    }
}
