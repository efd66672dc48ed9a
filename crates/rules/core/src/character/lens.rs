//! Lenses generated from a ruleset, one per character field.

use std::collections::BTreeMap;
use std::sync::Arc;

use serde_json::Value;

use super::asset::Asset;
use super::fields::{ASSETS, MOMENTUM, NAME};
use super::momentum::{MOMENTUM_MAX, MOMENTUM_MIN};
use super::validate::parse_assets;
use super::{Character, ImpactStatus};
use crate::lens::{Lens, LensError};
use crate::record::{RawRecord, RecordBacked, title_case};
use crate::rules::{MeterDefinition, Ruleset};
use crate::schema::SchemaError;
use crate::track::{BOXES, ChallengeRank, ProgressTrack};

/// Raw keys of a special track's progress and XP counters, e.g.
/// `quests` → (`Quests_Progress`, `Quests_XPEarned`).
pub(super) fn special_track_fields(label: &str) -> (String, String) {
    let prefix = title_case(label);
    (format!("{prefix}_Progress"), format!("{prefix}_XPEarned"))
}

/// XP earned by filling `boxes` boxes of a special track: two per box for
/// the first ten boxes, one per box after that.
pub fn earned_xp(boxes: u32) -> i64 {
    let first = boxes.min(BOXES);
    i64::from(first) * 2 + i64::from(boxes - first)
}

/// The character's name.
#[derive(Clone, Copy, Debug, Default)]
pub struct NameLens;

impl Lens for NameLens {
    type Source = Character;
    type Target = String;

    fn get(&self, character: &Character) -> String {
        character
            .raw()
            .get(NAME)
            .and_then(Value::as_str)
            .unwrap_or_default()
            .to_owned()
    }

    fn update(&self, character: &Character, name: String) -> Result<Character, LensError> {
        Ok(character.with_field(NAME, Value::String(name)))
    }
}

/// A bounded integer field: a stat, a condition meter or momentum.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct IntegerLens {
    key: String,
    min: i64,
    max: i64,
}

impl IntegerLens {
    pub fn new(key: impl Into<String>, min: i64, max: i64) -> Self {
        Self {
            key: key.into(),
            min,
            max,
        }
    }

    pub fn key(&self) -> &str {
        &self.key
    }

    pub fn bounds(&self) -> (i64, i64) {
        (self.min, self.max)
    }

    /// Writes `value` clamped into the field's bounds. Never fails.
    pub fn set_clamped(&self, character: &Character, value: i64) -> Character {
        character.with_field(&self.key, Value::from(value.clamp(self.min, self.max)))
    }
}

impl Lens for IntegerLens {
    type Source = Character;
    type Target = i64;

    fn get(&self, character: &Character) -> i64 {
        character
            .raw()
            .get(&self.key)
            .and_then(Value::as_i64)
            .unwrap_or(self.min)
    }

    fn update(&self, character: &Character, value: i64) -> Result<Character, LensError> {
        let value = LensError::check_range(&self.key, value, self.min, self.max)?;
        Ok(character.with_field(&self.key, Value::from(value)))
    }
}

/// A single impact's status.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ImpactLens {
    key: String,
}

impl ImpactLens {
    pub fn key(&self) -> &str {
        &self.key
    }
}

impl Lens for ImpactLens {
    type Source = Character;
    type Target = ImpactStatus;

    fn get(&self, character: &Character) -> ImpactStatus {
        ImpactStatus::from_raw(character.raw().get(&self.key))
    }

    fn update(
        &self,
        character: &Character,
        status: ImpactStatus,
    ) -> Result<Character, LensError> {
        if self.get(character) == status {
            return Ok(character.clone());
        }
        Ok(character.with_field(&self.key, Value::String(status.token().to_owned())))
    }
}

/// Every impact the ruleset declares, as a map of statuses.
///
/// Updates may be partial. Only entries whose status changes are written, so
/// a stray non-token value on an unmarked impact survives a no-op update.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ImpactsLens {
    impacts: BTreeMap<String, ImpactLens>,
}

impl ImpactsLens {
    pub fn impact(&self, key: &str) -> Option<&ImpactLens> {
        self.impacts.get(key)
    }

    /// Number of impacts currently marked.
    pub fn marked_count(&self, character: &Character) -> usize {
        self.impacts
            .values()
            .filter(|lens| lens.get(character).is_marked())
            .count()
    }
}

impl Lens for ImpactsLens {
    type Source = Character;
    type Target = BTreeMap<String, ImpactStatus>;

    fn get(&self, character: &Character) -> Self::Target {
        self.impacts
            .iter()
            .map(|(key, lens)| (key.clone(), lens.get(character)))
            .collect()
    }

    fn update(
        &self,
        character: &Character,
        statuses: Self::Target,
    ) -> Result<Character, LensError> {
        if let Some(unknown) = statuses.keys().find(|key| !self.impacts.contains_key(*key)) {
            return Err(LensError::UnknownKey {
                scope: "impacts",
                key: unknown.clone(),
            });
        }
        let mut raw = character.raw().clone();
        for (key, status) in statuses {
            if ImpactStatus::from_raw(raw.get(&key)) != status {
                raw.insert(key, Value::String(status.token().to_owned()));
            }
        }
        Ok(character.with_raw(raw))
    }
}

/// The character's asset list. Reads as empty when the field is absent.
#[derive(Clone, Copy, Debug, Default)]
pub struct AssetsLens;

impl AssetsLens {
    /// Validates untyped asset entries and writes them, failing on the first
    /// invalid element.
    pub fn update_values(
        &self,
        character: &Character,
        values: Vec<Value>,
    ) -> Result<Character, LensError> {
        let assets = parse_assets(&values)?;
        self.update(character, assets)
    }

    fn has_field(raw: &RawRecord) -> bool {
        !matches!(raw.get(ASSETS), None | Some(Value::Null))
    }
}

impl Lens for AssetsLens {
    type Source = Character;
    type Target = Vec<Asset>;

    fn get(&self, character: &Character) -> Vec<Asset> {
        match character.raw().get(ASSETS) {
            Some(Value::Array(items)) => parse_assets(items).unwrap_or_default(),
            _ => Vec::new(),
        }
    }

    fn update(
        &self,
        character: &Character,
        assets: Vec<Asset>,
    ) -> Result<Character, LensError> {
        if assets.is_empty() && !Self::has_field(character.raw()) {
            return Ok(character.clone());
        }
        let values = assets.iter().map(Asset::to_value).collect();
        Ok(character.with_field(ASSETS, Value::Array(values)))
    }
}

/// A special track (e.g. a legacy track), read as an unbounded epic track.
///
/// Writing new progress also raises the XP counter to what the filled boxes
/// have earned; XP never goes down through this lens.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct SpecialTrackLens {
    progress_key: String,
    xp_key: String,
}

impl SpecialTrackLens {
    pub fn for_label(label: &str) -> Self {
        let (progress_key, xp_key) = special_track_fields(label);
        Self {
            progress_key,
            xp_key,
        }
    }

    pub fn progress_key(&self) -> &str {
        &self.progress_key
    }

    pub fn xp_key(&self) -> &str {
        &self.xp_key
    }

    pub fn xp_earned(&self, character: &Character) -> i64 {
        character
            .raw()
            .get(&self.xp_key)
            .and_then(Value::as_i64)
            .unwrap_or(0)
    }
}

impl Lens for SpecialTrackLens {
    type Source = Character;
    type Target = ProgressTrack;

    fn get(&self, character: &Character) -> ProgressTrack {
        let progress = character
            .raw()
            .get(&self.progress_key)
            .and_then(Value::as_i64)
            .unwrap_or(0);
        ProgressTrack::new(ChallengeRank::Epic, progress, true)
    }

    fn update(
        &self,
        character: &Character,
        track: ProgressTrack,
    ) -> Result<Character, LensError> {
        if self.get(character).progress() == track.progress() {
            return Ok(character.clone());
        }
        let xp = self.xp_earned(character).max(earned_xp(track.boxes_filled()));
        let mut raw = character.raw().clone();
        raw.insert(self.progress_key.clone(), Value::from(track.progress()));
        raw.insert(self.xp_key.clone(), Value::from(xp));
        Ok(character.with_raw(raw))
    }
}

/// Kind of a generated field lens.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, strum::Display)]
#[strum(serialize_all = "snake_case")]
pub enum FieldKind {
    Stat,
    ConditionMeter,
    Impact,
    SpecialTrack,
    Assets,
}

/// One ruleset-driven field lens, tagged by kind.
#[derive(Clone, Copy, Debug)]
pub enum FieldLens<'a> {
    Stat { key: &'a str, lens: &'a IntegerLens },
    ConditionMeter { key: &'a str, lens: &'a IntegerLens },
    Impact { key: &'a str, lens: &'a ImpactLens },
    SpecialTrack { key: &'a str, lens: &'a SpecialTrackLens },
    Assets(&'a AssetsLens),
}

impl FieldLens<'_> {
    pub fn kind(&self) -> FieldKind {
        match self {
            Self::Stat { .. } => FieldKind::Stat,
            Self::ConditionMeter { .. } => FieldKind::ConditionMeter,
            Self::Impact { .. } => FieldKind::Impact,
            Self::SpecialTrack { .. } => FieldKind::SpecialTrack,
            Self::Assets(_) => FieldKind::Assets,
        }
    }

    /// Ruleset key of the field; `assets` for the asset list.
    pub fn key(&self) -> &str {
        match self {
            Self::Stat { key, .. }
            | Self::ConditionMeter { key, .. }
            | Self::Impact { key, .. }
            | Self::SpecialTrack { key, .. } => key,
            Self::Assets(_) => ASSETS,
        }
    }
}

/// Every lens of a character, generated once per ruleset.
#[derive(Clone, Debug)]
pub struct CharacterLens {
    ruleset: Arc<Ruleset>,
    pub name: NameLens,
    pub momentum: IntegerLens,
    pub stats: BTreeMap<String, IntegerLens>,
    pub condition_meters: BTreeMap<String, IntegerLens>,
    pub impacts: ImpactsLens,
    pub assets: AssetsLens,
    /// Keyed by the ruleset's special-track key, not its label.
    pub special_tracks: BTreeMap<String, SpecialTrackLens>,
}

impl CharacterLens {
    pub fn new(ruleset: Arc<Ruleset>) -> Self {
        let meter_lenses = |meters: &BTreeMap<String, MeterDefinition>| {
            meters
                .iter()
                .map(|(key, def)| (key.clone(), IntegerLens::new(key.clone(), def.min, def.max)))
                .collect::<BTreeMap<_, _>>()
        };
        let stats = meter_lenses(ruleset.stats());
        let condition_meters = meter_lenses(ruleset.condition_meters());
        let impacts = ImpactsLens {
            impacts: ruleset
                .impacts()
                .keys()
                .map(|key| (key.clone(), ImpactLens { key: key.clone() }))
                .collect(),
        };
        let special_tracks = ruleset
            .special_tracks()
            .iter()
            .map(|(key, rule)| (key.clone(), SpecialTrackLens::for_label(&rule.label)))
            .collect();

        Self {
            name: NameLens,
            momentum: IntegerLens::new(MOMENTUM, MOMENTUM_MIN, MOMENTUM_MAX),
            stats,
            condition_meters,
            impacts,
            assets: AssetsLens,
            special_tracks,
            ruleset,
        }
    }

    pub fn ruleset(&self) -> &Arc<Ruleset> {
        &self.ruleset
    }

    /// Validates `raw` against this lens set's ruleset.
    pub fn validate(&self, raw: RawRecord) -> Result<Character, SchemaError> {
        Character::validate(&self.ruleset, raw)
    }

    /// All ruleset-driven field lenses in a stable order: stats, condition
    /// meters, impacts, special tracks, then the asset list.
    pub fn fields(&self) -> Vec<FieldLens<'_>> {
        let stats = self
            .stats
            .iter()
            .map(|(key, lens)| FieldLens::Stat { key, lens });
        let meters = self
            .condition_meters
            .iter()
            .map(|(key, lens)| FieldLens::ConditionMeter { key, lens });
        let impacts = self
            .impacts
            .impacts
            .iter()
            .map(|(key, lens)| FieldLens::Impact { key, lens });
        let tracks = self
            .special_tracks
            .iter()
            .map(|(key, lens)| FieldLens::SpecialTrack { key, lens });
        stats
            .chain(meters)
            .chain(impacts)
            .chain(tracks)
            .chain(std::iter::once(FieldLens::Assets(&self.assets)))
            .collect()
    }
}
