//! Pure rules engine for tabletop-RPG character and campaign documents.
//!
//! `rules-core` turns raw key/value documents into validated values
//! ([`Character`], [`ProgressTrackDocument`], [`ClockDocument`]) and edits them
//! through composable [`Lens`]es generated from a [`Ruleset`]. It performs no
//! I/O: callers hand it a raw record and persist the record it returns. The
//! revision-stamped [`VersionedMap`] is the substrate the runtime's indices
//! are built on.
pub mod character;
pub mod collections;
pub mod config;
pub mod data;
pub mod error;
pub mod lens;
pub mod mechanics;
pub mod record;
pub mod rules;
pub mod schema;
pub mod track;
pub use character::{
    Asset, AssetFieldValue, AssetMove, Character, CharacterLens, FieldKind, FieldLens,
    ImpactStatus, MomentumOps, Rollable, asset_moves, rollables,
};
pub use collections::{ProjectableMap, Projected, Revision, VersionedMap};
pub use config::{DocumentTags, TrackerConfig, WritePolicy};
pub use data::{DataIndex, DataSource};
pub use error::{ErrorSeverity, RulesError};
pub use lens::{Lens, LensError, RangeBound, updating};
pub use mechanics::{ActionRoll, Dice, DiceError, ProgressRoll, RandomSource, RollOutcome};
pub use record::{DocumentKind, RawRecord, RecordBacked};
pub use rules::{MeterDefinition, MeterKind, Ruleset, RulesetError, RulesSource, merge_rules};
pub use schema::{SchemaError, SchemaReason};
pub use track::{
    ChallengeRank, Clock, ClockDocument, ClockError, ProgressTrack, ProgressTrackDocument,
};
