//! Characters validated against a ruleset, and the lenses that edit them.
//!
//! A [`Character`] is the raw document plus the [`Ruleset`] it passed
//! validation against. Everything that reads or writes a character goes through
//! a [`CharacterLens`] generated from that same ruleset.

mod asset;
mod lens;
mod momentum;
mod readers;
mod validate;

use std::sync::Arc;

use serde_json::Value;

pub use asset::{Asset, AssetFieldValue};
pub use lens::{
    AssetsLens, CharacterLens, FieldKind, FieldLens, ImpactLens, ImpactsLens, IntegerLens,
    NameLens, SpecialTrackLens, earned_xp,
};
pub use momentum::{MOMENTUM_MAX, MOMENTUM_MIN, MomentumOps};
pub use readers::{AssetMove, Rollable, asset_moves, rollables};

use crate::record::{RawRecord, RecordBacked};
use crate::rules::Ruleset;
use crate::schema::SchemaError;

/// Raw field names shared by the validator and the lenses.
pub(crate) mod fields {
    pub const NAME: &str = "name";
    pub const MOMENTUM: &str = "momentum";
    pub const ASSETS: &str = "assets";
}

/// Status of an impact as read from its raw field.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, strum::Display)]
pub enum ImpactStatus {
    #[strum(serialize = "⬢")]
    Marked,
    #[strum(serialize = "⬡")]
    Unmarked,
}

impl ImpactStatus {
    pub const MARKED_TOKEN: &'static str = "⬢";
    pub const UNMARKED_TOKEN: &'static str = "⬡";

    /// Only the exact marked token counts as marked; anything else, including
    /// absence, reads as unmarked.
    pub fn from_raw(value: Option<&Value>) -> Self {
        match value {
            Some(Value::String(s)) if s == Self::MARKED_TOKEN => Self::Marked,
            _ => Self::Unmarked,
        }
    }

    pub fn token(self) -> &'static str {
        match self {
            Self::Marked => Self::MARKED_TOKEN,
            Self::Unmarked => Self::UNMARKED_TOKEN,
        }
    }

    pub fn is_marked(self) -> bool {
        self == Self::Marked
    }
}

/// A character document that passed validation.
#[derive(Clone, Debug)]
pub struct Character {
    raw: RawRecord,
    ruleset: Arc<Ruleset>,
}

impl Character {
    /// Parses `raw` against `ruleset`.
    ///
    /// Either the whole record validates or no character is produced. The
    /// `assets` array is normalized on the way in.
    pub fn validate(ruleset: &Arc<Ruleset>, raw: RawRecord) -> Result<Self, SchemaError> {
        let raw = validate::validate(ruleset, raw)?;
        Ok(Self {
            raw,
            ruleset: Arc::clone(ruleset),
        })
    }

    pub fn ruleset(&self) -> &Arc<Ruleset> {
        &self.ruleset
    }

    /// True if this character was validated against exactly `ruleset`.
    pub fn validated_against(&self, ruleset: &Arc<Ruleset>) -> bool {
        Arc::ptr_eq(&self.ruleset, ruleset)
    }

    pub fn into_raw(self) -> RawRecord {
        self.raw
    }

    /// Copy of this character with `key` set to `value`.
    pub(crate) fn with_field(&self, key: &str, value: Value) -> Self {
        let mut raw = self.raw.clone();
        raw.insert(key.to_owned(), value);
        Self {
            raw,
            ruleset: Arc::clone(&self.ruleset),
        }
    }

    /// Copy of this character with its record replaced.
    pub(crate) fn with_raw(&self, raw: RawRecord) -> Self {
        Self {
            raw,
            ruleset: Arc::clone(&self.ruleset),
        }
    }
}

impl PartialEq for Character {
    fn eq(&self, other: &Self) -> bool {
        Arc::ptr_eq(&self.ruleset, &other.ruleset) && self.raw == other.raw
    }
}

impl RecordBacked for Character {
    fn raw(&self) -> &RawRecord {
        &self.raw
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn impact_status_is_a_lossy_read() {
        assert_eq!(ImpactStatus::from_raw(Some(&json!("⬢"))), ImpactStatus::Marked);
        assert_eq!(ImpactStatus::from_raw(Some(&json!("⬡"))), ImpactStatus::Unmarked);
        assert_eq!(ImpactStatus::from_raw(Some(&json!("a"))), ImpactStatus::Unmarked);
        assert_eq!(ImpactStatus::from_raw(Some(&json!(true))), ImpactStatus::Unmarked);
        assert_eq!(ImpactStatus::from_raw(None), ImpactStatus::Unmarked);
        assert_eq!(ImpactStatus::Marked.to_string(), "⬢");
    }
}
