//! Tracker configuration loader.

use std::path::Path;

use rules_core::TrackerConfig;

use crate::loaders::{LoadResult, read_file};

/// Loader for tracker configuration from TOML files.
pub struct ConfigLoader;

impl ConfigLoader {
    /// Load config data from a TOML file.
    pub fn load(path: &Path) -> LoadResult<TrackerConfig> {
        let content = read_file(path)?;
        let config: TrackerConfig = toml::from_str(&content)
            .map_err(|e| anyhow::anyhow!("Failed to parse config TOML: {}", e))?;

        Ok(config)
    }

    /// Like [`ConfigLoader::load`], but a missing file yields the defaults.
    pub fn load_or_default(path: &Path) -> LoadResult<TrackerConfig> {
        if path.exists() {
            Self::load(path)
        } else {
            Ok(TrackerConfig::default())
        }
    }
}
