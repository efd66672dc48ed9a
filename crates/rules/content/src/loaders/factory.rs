//! Content factory for loading everything a tracker needs from a data directory.

use std::path::{Path, PathBuf};

use rules_core::{DataIndex, DataSource, Ruleset, TrackerConfig};

use crate::loaders::{ConfigLoader, LoadResult, RulesLoader, SourceLoader};

/// Priority of sources bundled in the data directory.
pub const BUNDLED_PRIORITY: i32 = 0;

/// Content factory that loads all tracker content from a data directory.
///
/// # Directory Structure
///
/// ```text
/// data_dir/
/// ├── config.toml
/// ├── rules/
/// │   ├── classic.toml
/// │   └── classic.d/
/// │       └── starforged.toml
/// └── sources/
///     ├── core.ron
///     └── oracles.json
/// ```
pub struct ContentFactory {
    data_dir: PathBuf,
}

impl ContentFactory {
    pub fn new(data_dir: impl Into<PathBuf>) -> Self {
        Self {
            data_dir: data_dir.into(),
        }
    }

    /// Load tracker configuration from `config.toml`, or the defaults when
    /// there is none.
    pub fn load_config(&self) -> LoadResult<TrackerConfig> {
        ConfigLoader::load_or_default(&self.data_dir.join("config.toml"))
    }

    /// Load the ruleset `id` from `rules/`, merged with its expansions.
    pub fn load_ruleset(&self, id: &str) -> LoadResult<Ruleset> {
        RulesLoader::load_ruleset(&self.data_dir.join("rules"), id)
    }

    /// Load every data source from `sources/`.
    pub fn load_sources(&self) -> LoadResult<Vec<(String, DataSource)>> {
        SourceLoader::load_dir(&self.data_dir.join("sources"))
    }

    /// Index every bundled source at [`BUNDLED_PRIORITY`].
    pub fn load_data_index(&self) -> LoadResult<DataIndex> {
        let mut index = DataIndex::new();
        for (name, source) in self.load_sources()? {
            index.index_source(&name, BUNDLED_PRIORITY, source);
        }
        Ok(index)
    }

    /// Returns the data directory path.
    pub fn data_dir(&self) -> &Path {
        &self.data_dir
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rules_core::ProjectableMap;

    #[test]
    fn test_factory_paths() {
        let factory = ContentFactory::new("/tmp/data");
        assert_eq!(factory.data_dir(), Path::new("/tmp/data"));
    }

    #[test]
    fn test_empty_data_dir() {
        let dir = tempfile::tempdir().unwrap();
        let factory = ContentFactory::new(dir.path());

        assert_eq!(factory.load_config().unwrap(), TrackerConfig::default());
        assert!(factory.load_sources().unwrap().is_empty());
        assert!(factory.load_ruleset("classic").is_err());
    }

    #[test]
    fn test_load_data_index() {
        let dir = tempfile::tempdir().unwrap();
        let sources = dir.path().join("sources");
        std::fs::create_dir(&sources).unwrap();
        std::fs::write(
            sources.join("core.json"),
            r#"{ "moves": { "move:face_danger": { "name": "Face Danger", "roll_type": "action_roll" } } }"#,
        )
        .unwrap();

        let index = ContentFactory::new(dir.path()).load_data_index().unwrap();
        let moves = index.moves();
        assert_eq!(moves.len(), 1);
        assert_eq!(moves.get("move:face_danger").unwrap().name, "Face Danger");
        let visible = index.candidates("move:face_danger").unwrap().visible().unwrap();
        assert_eq!(&*visible.source, "core");
    }
}
