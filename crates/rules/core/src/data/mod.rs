//! Catalogs of assets, moves and oracles contributed by data sources.

mod index;
mod source;

pub use index::{Candidates, DataEntry, DataIndex, Sourced};
pub use source::{
    AssetAbility, AssetDefinition, DataSource, MoveDefinition, OracleDefinition, OracleRoll,
    OracleRow, RollType,
};
