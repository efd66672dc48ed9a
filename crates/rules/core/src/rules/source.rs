//! Rule sources as published by a game system, before they become a [`Ruleset`].
//!
//! [`Ruleset`]: super::Ruleset

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

/// One rules package (a core game or an expansion).
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RulesSource {
    pub stats: BTreeMap<String, StatRule>,
    pub condition_meters: BTreeMap<String, ConditionMeterRule>,
    /// Impacts grouped by category key.
    pub impacts: BTreeMap<String, ImpactCategoryRule>,
    pub special_tracks: BTreeMap<String, SpecialTrackRule>,
    /// Opaque tag definitions, carried through merging untouched.
    pub tags: BTreeMap<String, serde_json::Value>,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct StatRule {
    pub label: String,
    #[serde(default)]
    pub description: String,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ConditionMeterRule {
    pub label: String,
    #[serde(default)]
    pub description: String,
    pub min: i64,
    pub max: i64,
    #[serde(default = "default_rollable")]
    pub rollable: bool,
    #[serde(default)]
    pub shared: bool,
    /// Starting value for new characters.
    #[serde(default)]
    pub value: Option<i64>,
}

fn default_rollable() -> bool {
    true
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ImpactCategoryRule {
    pub label: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub contents: BTreeMap<String, ImpactRuleSource>,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ImpactRuleSource {
    pub label: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub permanent: bool,
    #[serde(default)]
    pub shared: bool,
    /// Condition meters that cannot recover while this impact is marked.
    #[serde(default)]
    pub prevents_recovery: Vec<String>,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct SpecialTrackRule {
    pub label: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub optional: bool,
    #[serde(default)]
    pub shared: bool,
}

/// Merges expansions into `base` by shallow key union per section.
///
/// Later sources override earlier ones on key collision.
pub fn merge_rules(
    mut base: RulesSource,
    expansions: impl IntoIterator<Item = RulesSource>,
) -> RulesSource {
    for expansion in expansions {
        base.stats.extend(expansion.stats);
        base.condition_meters.extend(expansion.condition_meters);
        base.impacts.extend(expansion.impacts);
        base.special_tracks.extend(expansion.special_tracks);
        base.tags.extend(expansion.tags);
    }
    base
}
