//! Revision-stamped collections backing every index.

mod versioned;

pub use versioned::{ProjectableMap, Projected, Revision, VersionedMap};
