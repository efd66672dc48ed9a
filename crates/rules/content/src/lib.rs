//! Data-driven content loaders for the tracker.
//!
//! This crate reads the files a game system ships with and turns them into
//! `rules-core` values:
//! - Rule sources (TOML), merged with their expansions into a `Ruleset`
//! - Data sources with assets, moves and oracles (RON, JSON or TOML)
//! - Tracker configuration (TOML)
//!
//! Loaded content is immutable; documents edited at play time live in the
//! runtime's document store instead.

pub mod loaders;

pub use loaders::{ConfigLoader, ContentFactory, LoadResult, RulesLoader, SourceLoader};
