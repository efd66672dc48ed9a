//! Rule source loader.
//!
//! A ruleset `id` lives in `rules/{id}.toml`; expansions for it are the TOML
//! files in `rules/{id}.d/`, applied in file-name order.

use std::path::Path;

use rules_core::{Ruleset, RulesSource, merge_rules};

use crate::loaders::{LoadResult, list_files, read_file};

/// Loader for rule sources from TOML files.
pub struct RulesLoader;

impl RulesLoader {
    /// Load a single rules package.
    pub fn load(path: &Path) -> LoadResult<RulesSource> {
        let content = read_file(path)?;
        let source: RulesSource = toml::from_str(&content).map_err(|e| {
            anyhow::anyhow!("Failed to parse rules TOML {}: {}", path.display(), e)
        })?;

        Ok(source)
    }

    /// Load `{id}.toml` from `rules_dir` merged with every expansion in
    /// `{id}.d/`.
    pub fn load_merged(rules_dir: &Path, id: &str) -> LoadResult<RulesSource> {
        let base = Self::load(&rules_dir.join(format!("{id}.toml")))?;
        let expansions = list_files(&rules_dir.join(format!("{id}.d")), &["toml"])?
            .iter()
            .map(|path| Self::load(path))
            .collect::<LoadResult<Vec<_>>>()?;

        Ok(merge_rules(base, expansions))
    }

    /// Load and build the ruleset `id`.
    pub fn load_ruleset(rules_dir: &Path, id: &str) -> LoadResult<Ruleset> {
        let source = Self::load_merged(rules_dir, id)?;
        let ruleset = Ruleset::new(id, source)
            .map_err(|e| anyhow::anyhow!("Invalid ruleset {}: {}", id, e))?;

        Ok(ruleset)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const BASE: &str = r#"
[stats.edge]
label = "edge"

[stats.wits]
label = "wits"

[condition_meters.health]
label = "health"
min = 0
max = 5

[impacts.misfortunes]
label = "misfortunes"

[impacts.misfortunes.contents.wounded]
label = "wounded"
prevents_recovery = ["health"]

[special_tracks.quests_legacy]
label = "quests"
"#;

    const EXPANSION: &str = r#"
[condition_meters.supply]
label = "supply"
min = 0
max = 5
shared = true

[impacts.vehicle_troubles]
label = "vehicle troubles"

[impacts.vehicle_troubles.contents.battered]
label = "battered"
"#;

    fn write_rules(dir: &Path) {
        std::fs::write(dir.join("classic.toml"), BASE).unwrap();
        std::fs::create_dir(dir.join("classic.d")).unwrap();
        std::fs::write(dir.join("classic.d").join("10-starforged.toml"), EXPANSION).unwrap();
        std::fs::write(dir.join("classic.d").join("notes.txt"), "ignored").unwrap();
    }

    #[test]
    fn test_load_merges_expansions() {
        let dir = tempfile::tempdir().unwrap();
        write_rules(dir.path());

        let ruleset = RulesLoader::load_ruleset(dir.path(), "classic").unwrap();
        assert_eq!(ruleset.id(), "classic");
        assert_eq!(ruleset.stats().len(), 2);
        assert!(ruleset.condition_meters()["supply"].shared);
        assert_eq!(ruleset.impacts().len(), 2);
        assert_eq!(
            ruleset.impacts()["wounded"].prevents_recovery,
            vec!["health".to_string()]
        );
        assert_eq!(ruleset.special_tracks()["quests_legacy"].label, "quests");
    }

    #[test]
    fn test_missing_expansion_dir_is_fine() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join("classic.toml"), BASE).unwrap();

        let source = RulesLoader::load_merged(dir.path(), "classic").unwrap();
        assert_eq!(source.condition_meters.len(), 1);
    }

    #[test]
    fn test_invalid_bounds_are_reported() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(
            dir.path().join("broken.toml"),
            "[condition_meters.health]\nlabel = \"health\"\nmin = 5\nmax = 5\n",
        )
        .unwrap();

        let err = RulesLoader::load_ruleset(dir.path(), "broken").unwrap_err();
        assert!(err.to_string().contains("broken"));
    }

    #[test]
    fn test_missing_ruleset_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        assert!(RulesLoader::load_ruleset(dir.path(), "absent").is_err());
    }
}
