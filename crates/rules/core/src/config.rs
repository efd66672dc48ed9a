use serde::{Deserialize, Serialize};

use crate::record::DocumentKind;

/// Tracker-wide settings shared by the loaders, the runtime and the CLI.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct TrackerConfig {
    pub tags: DocumentTags,
    pub write_policy: WritePolicy,
    /// Priority given to data sources discovered in the document store.
    /// Bundled sources loaded from the data directory use priority 0.
    pub source_priority: i32,
}

/// Marker tag identifying each kind of document.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct DocumentTags {
    pub character: String,
    pub progress: String,
    pub clock: String,
    pub source: String,
}

impl Default for DocumentTags {
    fn default() -> Self {
        Self {
            character: "character".into(),
            progress: "progress".into(),
            clock: "clock".into(),
            source: "source".into(),
        }
    }
}

impl DocumentTags {
    pub fn tag_for(&self, kind: DocumentKind) -> &str {
        match kind {
            DocumentKind::Character => &self.character,
            DocumentKind::ProgressTrack => &self.progress,
            DocumentKind::Clock => &self.clock,
            DocumentKind::DataSource => &self.source,
        }
    }
}

/// How the read-modify-write cycle treats concurrent changes in the store.
#[derive(
    Clone,
    Copy,
    Debug,
    Default,
    PartialEq,
    Eq,
    Serialize,
    Deserialize,
    strum::Display,
    strum::EnumString,
)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case", ascii_case_insensitive)]
pub enum WritePolicy {
    /// The later write silently replaces the earlier one.
    #[default]
    LastWriterWins,
    /// Fail with a conflict if the document changed since it was read.
    Fingerprint,
}
