//! Read-only views derived from a character.

use super::Character;
use super::lens::CharacterLens;
use crate::collections::ProjectableMap;
use crate::data::{DataIndex, MoveDefinition};
use crate::lens::{Lens, LensError};
use crate::rules::MeterDefinition;

/// A stat or condition meter a move can roll with.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Rollable<'a> {
    pub key: &'a str,
    pub definition: &'a MeterDefinition,
    pub value: i64,
}

/// Every rollable stat and condition meter with its current value.
pub fn rollables<'a>(lens: &'a CharacterLens, character: &Character) -> Vec<Rollable<'a>> {
    let ruleset = lens.ruleset();
    let stats = lens
        .stats
        .iter()
        .filter_map(|(key, field)| Some((key, ruleset.stats().get(key)?, field)));
    let meters = lens
        .condition_meters
        .iter()
        .filter_map(|(key, field)| Some((key, ruleset.condition_meters().get(key)?, field)));
    stats
        .chain(meters)
        .filter(|(_, definition, _)| definition.rollable)
        .map(|(key, definition, field)| Rollable {
            key,
            definition,
            value: field.get(character),
        })
        .collect()
}

/// A move unlocked by a marked asset ability.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct AssetMove {
    pub asset_id: String,
    pub move_id: String,
    pub definition: MoveDefinition,
}

/// Moves contributed by the character's assets through marked abilities.
///
/// Fails with [`LensError::UnknownKey`] if an asset is not in `index`.
pub fn asset_moves(
    lens: &CharacterLens,
    index: &DataIndex,
    character: &Character,
) -> Result<Vec<AssetMove>, LensError> {
    let catalog = index.assets();
    let mut moves = Vec::new();
    for asset in lens.assets.get(character) {
        let definition = catalog
            .get(asset.id.as_str())
            .ok_or_else(|| LensError::UnknownKey {
                scope: "assets",
                key: asset.id.clone(),
            })?;
        for ability in asset
            .marked_abilities()
            .filter_map(|i| definition.abilities.get(i))
        {
            moves.extend(ability.moves.iter().map(|(move_id, mv)| AssetMove {
                asset_id: asset.id.clone(),
                move_id: move_id.clone(),
                definition: mv.clone(),
            }));
        }
    }
    Ok(moves)
}
