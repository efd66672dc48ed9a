//! Content loaders for reading game data from files.

pub mod config;
pub mod factory;
pub mod rules;
pub mod sources;

pub use config::ConfigLoader;
pub use factory::ContentFactory;
pub use rules::RulesLoader;
pub use sources::SourceLoader;

use std::path::{Path, PathBuf};

/// Common result type for loaders.
pub type LoadResult<T> = anyhow::Result<T>;

/// Helper function to read file contents.
pub(crate) fn read_file(path: &Path) -> LoadResult<String> {
    std::fs::read_to_string(path)
        .map_err(|e| anyhow::anyhow!("Failed to read file {}: {}", path.display(), e))
}

/// Files in `dir` with one of `extensions`, sorted by file name.
///
/// A missing directory yields an empty list.
pub(crate) fn list_files(dir: &Path, extensions: &[&str]) -> LoadResult<Vec<PathBuf>> {
    if !dir.is_dir() {
        return Ok(Vec::new());
    }
    let entries = std::fs::read_dir(dir)
        .map_err(|e| anyhow::anyhow!("Failed to read directory {}: {}", dir.display(), e))?;

    let mut files = Vec::new();
    for entry in entries {
        let path = entry?.path();
        let matches = path
            .extension()
            .and_then(|ext| ext.to_str())
            .is_some_and(|ext| extensions.contains(&ext));
        if path.is_file() && matches {
            files.push(path);
        }
    }
    files.sort();
    Ok(files)
}
