//! Data source loader.
//!
//! Sources carry assets, moves and oracles. The format is chosen by file
//! extension: `.ron`, `.json` or `.toml`. A source is named after its file
//! stem.

use std::path::Path;

use rules_core::DataSource;

use crate::loaders::{LoadResult, list_files, read_file};

const EXTENSIONS: [&str; 3] = ["ron", "json", "toml"];

/// Loader for data sources.
pub struct SourceLoader;

impl SourceLoader {
    /// Load one data source, picking the parser from the file extension.
    pub fn load(path: &Path) -> LoadResult<DataSource> {
        let content = read_file(path)?;
        let extension = path.extension().and_then(|ext| ext.to_str()).unwrap_or("");
        let source = match extension {
            "ron" => ron::from_str(&content)
                .map_err(|e| anyhow::anyhow!("Failed to parse source RON {}: {}", path.display(), e))?,
            "json" => serde_json::from_str(&content).map_err(|e| {
                anyhow::anyhow!("Failed to parse source JSON {}: {}", path.display(), e)
            })?,
            "toml" => toml::from_str(&content).map_err(|e| {
                anyhow::anyhow!("Failed to parse source TOML {}: {}", path.display(), e)
            })?,
            other => anyhow::bail!(
                "Unsupported source format `{}` for {}",
                other,
                path.display()
            ),
        };

        Ok(source)
    }

    /// Load every source in `dir` as `(name, source)`, ordered by file name.
    pub fn load_dir(dir: &Path) -> LoadResult<Vec<(String, DataSource)>> {
        list_files(dir, &EXTENSIONS)?
            .into_iter()
            .map(|path| {
                let name = path
                    .file_stem()
                    .and_then(|stem| stem.to_str())
                    .ok_or_else(|| anyhow::anyhow!("Invalid source file name {}", path.display()))?
                    .to_owned();
                Ok((name, Self::load(&path)?))
            })
            .collect()
    }
}
