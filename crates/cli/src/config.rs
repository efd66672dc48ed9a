//! CLI configuration loaded from the environment.
use std::env;
use std::path::PathBuf;

use rules_core::WritePolicy;

/// Settings for one tracker run.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct CliConfig {
    /// Directory holding `config.toml`, `rules/` and `sources/`.
    pub data_dir: PathBuf,
    /// Directory of JSON documents to track.
    pub documents_dir: PathBuf,
    /// Ruleset id under `rules/`.
    pub ruleset: String,
    /// Overrides the write policy from `config.toml`.
    pub write_policy: Option<WritePolicy>,
}

impl Default for CliConfig {
    fn default() -> Self {
        let data_dir = default_data_dir();
        Self {
            documents_dir: data_dir.join("documents"),
            data_dir,
            ruleset: "classic".into(),
            write_policy: None,
        }
    }
}

impl CliConfig {
    /// Construct configuration from process environment variables.
    ///
    /// Environment variables:
    /// - `TRACKER_DATA_DIR` - Content directory (default: platform data dir)
    /// - `TRACKER_DOCUMENTS_DIR` - Document directory (default: `<data dir>/documents`)
    /// - `TRACKER_RULESET` - Ruleset id (default: `classic`)
    /// - `TRACKER_WRITE_POLICY` - `last_writer_wins` or `fingerprint`
    pub fn from_env() -> Self {
        Self::from_lookup(|key| env::var(key).ok())
    }

    fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let mut config = Self::default();

        if let Some(dir) = lookup("TRACKER_DATA_DIR") {
            config.data_dir = PathBuf::from(dir);
            config.documents_dir = config.data_dir.join("documents");
        }

        if let Some(dir) = lookup("TRACKER_DOCUMENTS_DIR") {
            config.documents_dir = PathBuf::from(dir);
        }

        if let Some(ruleset) = lookup("TRACKER_RULESET").filter(|id| !id.is_empty()) {
            config.ruleset = ruleset;
        }

        match lookup("TRACKER_WRITE_POLICY").map(|value| value.parse::<WritePolicy>()) {
            Some(Ok(policy)) => config.write_policy = Some(policy),
            Some(Err(_)) => tracing::warn!("Ignoring unknown TRACKER_WRITE_POLICY"),
            None => {}
        }

        config
    }
}

/// Platform data directory for the tracker, or `./data` when there is none.
fn default_data_dir() -> PathBuf {
    directories::ProjectDirs::from("", "", "tracker")
        .map(|dirs| dirs.data_dir().to_path_buf())
        .unwrap_or_else(|| PathBuf::from("./data"))
}
