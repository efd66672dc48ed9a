use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::mechanics::{Dice, DiceError, RandomSource};

/// Assets, moves and oracles contributed by one source, keyed by id.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DataSource {
    pub assets: BTreeMap<String, AssetDefinition>,
    pub moves: BTreeMap<String, MoveDefinition>,
    pub oracles: BTreeMap<String, OracleDefinition>,
}

impl DataSource {
    pub fn is_empty(&self) -> bool {
        self.assets.is_empty() && self.moves.is_empty() && self.oracles.is_empty()
    }
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct AssetDefinition {
    pub name: String,
    #[serde(default)]
    pub category: String,
    #[serde(default)]
    pub abilities: Vec<AssetAbility>,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct AssetAbility {
    #[serde(default)]
    pub text: String,
    /// Moves unlocked while this ability is marked, keyed by move id.
    #[serde(default)]
    pub moves: BTreeMap<String, MoveDefinition>,
}

#[derive(
    Clone,
    Copy,
    Debug,
    PartialEq,
    Eq,
    Hash,
    Serialize,
    Deserialize,
    strum::Display,
    strum::EnumString,
)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum RollType {
    ActionRoll,
    ProgressRoll,
    SpecialTrack,
    NoRoll,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct MoveDefinition {
    pub name: String,
    pub roll_type: RollType,
    #[serde(default)]
    pub trigger: String,
    #[serde(default)]
    pub text: String,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct OracleDefinition {
    pub name: String,
    #[serde(default = "default_oracle_dice")]
    pub dice: String,
    pub rows: Vec<OracleRow>,
}

fn default_oracle_dice() -> String {
    "1d100".into()
}

/// One result of an oracle table, covering rolls `min..=max`.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct OracleRow {
    pub min: u32,
    pub max: u32,
    pub result: String,
}

/// A rolled oracle. `row` is `None` when the table has a gap at `roll`.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct OracleRoll {
    pub roll: u32,
    pub row: Option<OracleRow>,
}

impl OracleDefinition {
    pub fn lookup(&self, roll: u32) -> Option<&OracleRow> {
        self.rows.iter().find(|row| (row.min..=row.max).contains(&roll))
    }

    pub fn roll(&self, rng: &mut (impl RandomSource + ?Sized)) -> Result<OracleRoll, DiceError> {
        let dice = Dice::parse(&self.dice)?;
        let roll = dice.roll(rng);
        Ok(OracleRoll {
            roll,
            row: self.lookup(roll).cloned(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::mechanics::SequenceSource;

    fn table() -> OracleDefinition {
        OracleDefinition {
            name: "Action".into(),
            dice: "1d100".into(),
            rows: vec![
                OracleRow {
                    min: 1,
                    max: 50,
                    result: "Scheme".into(),
                },
                OracleRow {
                    min: 51,
                    max: 99,
                    result: "Clash".into(),
                },
            ],
        }
    }

    #[test]
    fn oracle_rolls_resolve_rows() {
        let mut rng = SequenceSource::new([73, 100]);
        let first = table().roll(&mut rng).unwrap();
        assert_eq!(first.roll, 73);
        assert_eq!(first.row.map(|r| r.result), Some("Clash".to_string()));

        let gap = table().roll(&mut rng).unwrap();
        assert_eq!(gap.row, None);
    }

    #[test]
    fn oracle_with_bad_dice_fails() {
        let oracle = OracleDefinition {
            dice: "d%".into(),
            ..table()
        };
        assert!(oracle.roll(&mut SequenceSource::default()).is_err());
    }

    #[test]
    fn deserializes_with_defaults() {
        let source: DataSource = serde_json::from_value(serde_json::json!({
            "moves": {
                "move:face_danger": { "name": "Face Danger", "roll_type": "action_roll" }
            },
            "oracles": {
                "oracle:action": { "name": "Action", "rows": [] }
            }
        }))
        .unwrap();
        assert!(source.assets.is_empty());
        assert_eq!(source.moves["move:face_danger"].roll_type, RollType::ActionRoll);
        assert_eq!(source.oracles["oracle:action"].dice, "1d100");
    }
}
