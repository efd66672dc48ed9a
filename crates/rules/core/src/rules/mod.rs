//! Immutable catalog of a game system's stats, meters, impacts and special tracks.
//!
//! A [`Ruleset`] is built once per loaded rule source and shared (behind an
//! `Arc`) by every character validated against it.

mod error;
mod source;

use std::collections::BTreeMap;

pub use error::RulesetError;
pub use source::{
    ConditionMeterRule, ImpactCategoryRule, ImpactRuleSource, RulesSource, SpecialTrackRule,
    StatRule, merge_rules,
};

/// Whether a meter definition describes a stat or a condition meter.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, strum::Display)]
#[strum(serialize_all = "snake_case")]
pub enum MeterKind {
    Stat,
    ConditionMeter,
}

/// Bounds and presentation of a stat or condition meter.
///
/// Invariant: `min < max`.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct MeterDefinition {
    pub kind: MeterKind,
    pub label: String,
    pub min: i64,
    pub max: i64,
    pub rollable: bool,
    /// Shared between all characters of a campaign (condition meters only).
    pub shared: bool,
}

impl MeterDefinition {
    fn new(
        key: &str,
        kind: MeterKind,
        label: &str,
        min: i64,
        max: i64,
        rollable: bool,
        shared: bool,
    ) -> Result<Self, RulesetError> {
        if min >= max {
            return Err(RulesetError::InvalidBounds {
                key: key.to_owned(),
                min,
                max,
            });
        }
        Ok(Self {
            kind,
            label: label.to_owned(),
            min,
            max,
            rollable,
            shared,
        })
    }
}

/// Category an impact belongs to (e.g. "misfortunes", "burdens").
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ImpactCategory {
    pub label: String,
    pub description: String,
}

/// A named debuff condition, flattened out of its category.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ImpactRule {
    pub label: String,
    pub description: String,
    pub permanent: bool,
    pub shared: bool,
    pub prevents_recovery: Vec<String>,
    pub category: ImpactCategory,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Ruleset {
    id: String,
    stats: BTreeMap<String, MeterDefinition>,
    condition_meters: BTreeMap<String, MeterDefinition>,
    impacts: BTreeMap<String, ImpactRule>,
    special_tracks: BTreeMap<String, SpecialTrackRule>,
}

impl Ruleset {
    /// Canonical lower bound of every stat.
    pub const STAT_MIN: i64 = 0;
    /// Canonical upper bound of every stat.
    pub const STAT_MAX: i64 = 5;

    /// Builds a ruleset from a (possibly merged) rules source.
    ///
    /// Stats always receive the canonical `[0, 5]` bounds and are rollable.
    pub fn new(id: impl Into<String>, source: RulesSource) -> Result<Self, RulesetError> {
        let stats = source
            .stats
            .iter()
            .map(|(key, stat)| {
                MeterDefinition::new(
                    key,
                    MeterKind::Stat,
                    &stat.label,
                    Self::STAT_MIN,
                    Self::STAT_MAX,
                    true,
                    false,
                )
                .map(|def| (key.clone(), def))
            })
            .collect::<Result<BTreeMap<_, _>, _>>()?;

        let condition_meters = source
            .condition_meters
            .iter()
            .map(|(key, meter)| {
                MeterDefinition::new(
                    key,
                    MeterKind::ConditionMeter,
                    &meter.label,
                    meter.min,
                    meter.max,
                    meter.rollable,
                    meter.shared,
                )
                .map(|def| (key.clone(), def))
            })
            .collect::<Result<BTreeMap<_, _>, _>>()?;

        let mut impacts = BTreeMap::new();
        for category in source.impacts.into_values() {
            let header = ImpactCategory {
                label: category.label,
                description: category.description,
            };
            for (key, impact) in category.contents {
                impacts.insert(
                    key,
                    ImpactRule {
                        label: impact.label,
                        description: impact.description,
                        permanent: impact.permanent,
                        shared: impact.shared,
                        prevents_recovery: impact.prevents_recovery,
                        category: header.clone(),
                    },
                );
            }
        }

        Ok(Self {
            id: id.into(),
            stats,
            condition_meters,
            impacts,
            special_tracks: source.special_tracks,
        })
    }

    pub fn id(&self) -> &str {
        &self.id
    }

    pub fn stats(&self) -> &BTreeMap<String, MeterDefinition> {
        &self.stats
    }

    pub fn condition_meters(&self) -> &BTreeMap<String, MeterDefinition> {
        &self.condition_meters
    }

    pub fn impacts(&self) -> &BTreeMap<String, ImpactRule> {
        &self.impacts
    }

    pub fn special_tracks(&self) -> &BTreeMap<String, SpecialTrackRule> {
        &self.special_tracks
    }

    /// Looks up a stat or condition meter by key.
    pub fn meter(&self, key: &str) -> Option<&MeterDefinition> {
        self.stats.get(key).or_else(|| self.condition_meters.get(key))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn meter(min: i64, max: i64) -> ConditionMeterRule {
        ConditionMeterRule {
            label: "health".into(),
            description: String::new(),
            min,
            max,
            rollable: true,
            shared: false,
            value: Some(5),
        }
    }

    #[test]
    fn stats_get_canonical_bounds() {
        let mut source = RulesSource::default();
        source.stats.insert(
            "wits".into(),
            StatRule {
                label: "wits".into(),
                description: "thinking".into(),
            },
        );
        let ruleset = Ruleset::new("test", source).unwrap();
        let wits = &ruleset.stats()["wits"];
        assert_eq!((wits.min, wits.max), (0, 5));
        assert!(wits.rollable);
        assert_eq!(wits.kind, MeterKind::Stat);
    }

    #[test]
    fn rejects_inverted_meter_bounds() {
        let mut source = RulesSource::default();
        source.condition_meters.insert("health".into(), meter(5, 5));
        let err = Ruleset::new("test", source).unwrap_err();
        assert_eq!(
            err,
            RulesetError::InvalidBounds {
                key: "health".into(),
                min: 5,
                max: 5
            }
        );
    }

    #[test]
    fn impacts_are_flattened_with_their_category() {
        let mut source = RulesSource::default();
        source.condition_meters.insert("health".into(), meter(0, 5));
        let mut contents = BTreeMap::new();
        contents.insert(
            "wounded".into(),
            ImpactRuleSource {
                label: "wounded".into(),
                description: "You are severely injured.".into(),
                permanent: false,
                shared: false,
                prevents_recovery: vec!["health".into()],
            },
        );
        source.impacts.insert(
            "misfortunes".into(),
            ImpactCategoryRule {
                label: "misfortunes".into(),
                description: "Oh no".into(),
                contents,
            },
        );

        let ruleset = Ruleset::new("test", source).unwrap();
        let wounded = &ruleset.impacts()["wounded"];
        assert_eq!(wounded.category.label, "misfortunes");
        assert_eq!(wounded.prevents_recovery, vec!["health".to_string()]);
        assert_eq!(ruleset.meter("health").map(|m| m.max), Some(5));
    }
}
