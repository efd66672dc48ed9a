use serde_json::Value;

use super::asset::Asset;
use super::fields::{ASSETS, MOMENTUM, NAME};
use super::lens::special_track_fields;
use super::momentum::{MOMENTUM_MAX, MOMENTUM_MIN};
use crate::record::RawRecord;
use crate::rules::Ruleset;
use crate::schema::{
    SchemaError, SchemaReason, check_range, require_integer, require_integer_in, require_string,
    value_kind,
};

/// Checks `raw` against the schema derived from `ruleset` and returns it with
/// the assets array in canonical form.
///
/// Keys the ruleset does not mention pass through untouched.
pub(super) fn validate(ruleset: &Ruleset, mut raw: RawRecord) -> Result<RawRecord, SchemaError> {
    require_string(&raw, NAME)?;
    require_integer_in(&raw, MOMENTUM, MOMENTUM_MIN, MOMENTUM_MAX)?;

    for (key, meter) in ruleset.stats().iter().chain(ruleset.condition_meters()) {
        require_integer_in(&raw, key, meter.min, meter.max)?;
    }

    for rule in ruleset.special_tracks().values() {
        let (progress, xp_earned) = special_track_fields(&rule.label);
        check_range(&progress, require_integer(&raw, &progress)?, 0, i64::MAX)?;
        check_range(&xp_earned, require_integer(&raw, &xp_earned)?, 0, i64::MAX)?;
    }

    if let Some(assets) = normalized_assets(&raw)? {
        raw.insert(ASSETS.to_owned(), assets);
    }

    Ok(raw)
}

/// Parses every element of an `assets` array, failing on the first bad one.
pub(super) fn parse_assets(items: &[Value]) -> Result<Vec<Asset>, SchemaError> {
    items
        .iter()
        .enumerate()
        .map(|(i, item)| Asset::parse(item, &format!("{ASSETS}[{i}]")))
        .collect()
}

fn normalized_assets(raw: &RawRecord) -> Result<Option<Value>, SchemaError> {
    match raw.get(ASSETS) {
        None | Some(Value::Null) => Ok(None),
        Some(Value::Array(items)) => {
            let assets = parse_assets(items)?;
            Ok(Some(Value::Array(
                assets.iter().map(Asset::to_value).collect(),
            )))
        }
        Some(other) => Err(SchemaError::new(
            ASSETS,
            SchemaReason::InvalidType {
                expected: "array",
                received: value_kind(other),
            },
        )),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::record::as_record;
    use crate::rules::{ConditionMeterRule, RulesSource, SpecialTrackRule, StatRule};
    use serde_json::json;

    fn ruleset() -> Ruleset {
        let mut source = RulesSource::default();
        source.stats.insert(
            "wits".into(),
            StatRule {
                label: "wits".into(),
                description: String::new(),
            },
        );
        source.condition_meters.insert(
            "health".into(),
            ConditionMeterRule {
                label: "health".into(),
                description: String::new(),
                min: 0,
                max: 5,
                rollable: true,
                shared: false,
                value: None,
            },
        );
        source.special_tracks.insert(
            "quests_legacy".into(),
            SpecialTrackRule {
                label: "quests".into(),
                description: String::new(),
                optional: false,
                shared: false,
            },
        );
        Ruleset::new("test", source).unwrap()
    }

    fn valid() -> RawRecord {
        as_record(json!({
            "name": "Bob",
            "momentum": 5,
            "wits": 2,
            "health": 3,
            "Quests_Progress": 0,
            "Quests_XPEarned": 0,
            "notes": "unknown keys pass through",
        }))
        .unwrap()
    }

    #[test]
    fn accepts_valid_records_and_keeps_unknown_keys() {
        let raw = validate(&ruleset(), valid()).unwrap();
        assert_eq!(raw["notes"], json!("unknown keys pass through"));
        assert!(!raw.contains_key("assets"));
    }

    #[test]
    fn names_the_failing_field() {
        for (key, value, expected) in [
            ("wits", Value::Null, "wits"),
            ("health", json!(6), "too_big"),
            ("momentum", json!(-7), "too_small"),
            ("name", json!(4), "invalid_type"),
            ("Quests_Progress", json!(-1), "Quests_Progress"),
            ("Quests_XPEarned", Value::Null, "Quests_XPEarned"),
        ] {
            let mut raw = valid();
            raw.insert(key.into(), value);
            let err = validate(&ruleset(), raw).unwrap_err();
            assert!(err.to_string().contains(expected), "{key}: {err}");
        }
    }

    #[test]
    fn normalizes_assets() {
        let mut raw = valid();
        raw.insert(
            "assets".into(),
            json!([{ "id": "asset:a", "abilities": [true] }]),
        );
        let raw = validate(&ruleset(), raw).unwrap();
        assert_eq!(
            raw["assets"],
            json!([{ "id": "asset:a", "abilities": [true], "controls": {}, "options": {} }])
        );

        let mut raw = valid();
        raw.insert("assets".into(), json!({ "id": "asset:a" }));
        assert_eq!(validate(&ruleset(), raw).unwrap_err().path, "assets");
    }
}
