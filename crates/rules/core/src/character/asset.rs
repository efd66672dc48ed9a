//! Assets held by a character.
//!
//! Unlike the rest of a character document, asset entries are strict: every
//! key is known and unknown keys are rejected.

use std::collections::BTreeMap;

use serde_json::{Map, Value};

use crate::schema::{SchemaError, SchemaReason, value_kind};

const ID: &str = "id";
const ABILITIES: &str = "abilities";
const CONTROLS: &str = "controls";
const OPTIONS: &str = "options";
const KNOWN_KEYS: [&str; 4] = [ID, ABILITIES, CONTROLS, OPTIONS];

/// An asset on a character sheet.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Asset {
    pub id: String,
    /// Which abilities are marked, in definition order.
    pub abilities: Vec<bool>,
    pub controls: BTreeMap<String, AssetFieldValue>,
    pub options: BTreeMap<String, AssetFieldValue>,
}

/// Value of an asset control or option.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum AssetFieldValue {
    Flag(bool),
    Integer(i64),
    Text(String),
}

impl From<&AssetFieldValue> for Value {
    fn from(value: &AssetFieldValue) -> Self {
        match value {
            AssetFieldValue::Flag(flag) => Value::Bool(*flag),
            AssetFieldValue::Integer(n) => Value::from(*n),
            AssetFieldValue::Text(text) => Value::String(text.clone()),
        }
    }
}

impl Asset {
    pub fn new(id: impl Into<String>, abilities: Vec<bool>) -> Self {
        Self {
            id: id.into(),
            abilities,
            controls: BTreeMap::new(),
            options: BTreeMap::new(),
        }
    }

    /// Parses one asset entry; `path` names it in errors (e.g. `assets[2]`).
    pub fn parse(value: &Value, path: &str) -> Result<Self, SchemaError> {
        let Value::Object(entry) = value else {
            return Err(invalid_type(path, "object", value));
        };

        if let Some(unknown) = entry.keys().find(|k| !KNOWN_KEYS.contains(&k.as_str())) {
            return Err(SchemaError::new(
                path,
                SchemaReason::Invalid(format!("unrecognized key `{unknown}`")),
            ));
        }

        let id = match entry.get(ID) {
            Some(Value::String(id)) => id.clone(),
            Some(other) => return Err(invalid_type(&field(path, ID), "string", other)),
            None => return Err(SchemaError::missing(field(path, ID))),
        };

        let abilities = match entry.get(ABILITIES) {
            Some(Value::Array(items)) => items
                .iter()
                .enumerate()
                .map(|(i, item)| {
                    item.as_bool().ok_or_else(|| {
                        invalid_type(&format!("{}[{i}]", field(path, ABILITIES)), "boolean", item)
                    })
                })
                .collect::<Result<Vec<_>, _>>()?,
            Some(other) => return Err(invalid_type(&field(path, ABILITIES), "array", other)),
            None => return Err(SchemaError::missing(field(path, ABILITIES))),
        };

        Ok(Self {
            id,
            abilities,
            controls: parse_fields(entry, CONTROLS, path)?,
            options: parse_fields(entry, OPTIONS, path)?,
        })
    }

    /// Canonical representation: all four keys present.
    pub fn to_value(&self) -> Value {
        let mut entry = Map::new();
        entry.insert(ID.into(), Value::String(self.id.clone()));
        entry.insert(
            ABILITIES.into(),
            Value::Array(self.abilities.iter().copied().map(Value::Bool).collect()),
        );
        entry.insert(CONTROLS.into(), fields_to_value(&self.controls));
        entry.insert(OPTIONS.into(), fields_to_value(&self.options));
        Value::Object(entry)
    }

    /// Indices of marked abilities.
    pub fn marked_abilities(&self) -> impl Iterator<Item = usize> + '_ {
        self.abilities
            .iter()
            .enumerate()
            .filter_map(|(i, marked)| marked.then_some(i))
    }
}

fn field(path: &str, key: &str) -> String {
    format!("{path}.{key}")
}

fn invalid_type(path: &str, expected: &'static str, value: &Value) -> SchemaError {
    SchemaError::new(
        path,
        SchemaReason::InvalidType {
            expected,
            received: value_kind(value),
        },
    )
}

fn parse_fields(
    entry: &Map<String, Value>,
    key: &str,
    path: &str,
) -> Result<BTreeMap<String, AssetFieldValue>, SchemaError> {
    let fields = match entry.get(key) {
        None | Some(Value::Null) => return Ok(BTreeMap::new()),
        Some(Value::Object(fields)) => fields,
        Some(other) => return Err(invalid_type(&field(path, key), "object", other)),
    };
    fields
        .iter()
        .map(|(name, value)| -> Result<(String, AssetFieldValue), SchemaError> {
            let parsed = match value {
                Value::Bool(flag) => AssetFieldValue::Flag(*flag),
                Value::String(text) => AssetFieldValue::Text(text.clone()),
                Value::Number(n) => n.as_i64().map(AssetFieldValue::Integer).ok_or_else(|| {
                    invalid_type(&field(&field(path, key), name), "integer", value)
                })?,
                other => {
                    return Err(invalid_type(
                        &field(&field(path, key), name),
                        "string, integer or boolean",
                        other,
                    ));
                }
            };
            Ok((name.clone(), parsed))
        })
        .collect()
}

fn fields_to_value(fields: &BTreeMap<String, AssetFieldValue>) -> Value {
    Value::Object(
        fields
            .iter()
            .map(|(name, value)| (name.clone(), Value::from(value)))
            .collect(),
    )
}
