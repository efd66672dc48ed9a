//! Runtime for tracking tabletop-RPG documents held in a document store.
//!
//! This crate wires the pure `rules-core` engine to storage: it keeps indices
//! of characters, progress tracks, clocks and data sources in step with a
//! [`DocumentStore`], and performs the read-modify-write cycle that persists
//! an edit.
//!
//! Modules are organized by responsibility:
//! - [`store`] defines the store abstraction, its notifications and two stores
//! - [`index`] hosts the validate-or-skip indices
//! - [`session`] owns the indices and the updaters
//! - [`random`] provides `rand`-backed dice
pub mod error;
pub mod fingerprint;
pub mod index;
pub mod random;
pub mod session;
pub mod store;

pub use error::{Result, RuntimeError};
pub use fingerprint::fingerprint;
pub use index::{
    CharacterContext, CharacterIndexer, ClockIndexer, DocumentIndex, IndexChange, Indexer,
    ProgressIndexer, SourceIndex,
};
pub use random::{RngSource, ThreadRandom};
pub use session::{Session, SessionSummary};
pub use store::{DocumentStore, InMemoryStore, JsonDirectoryStore, StoreError, StoreEvent};
