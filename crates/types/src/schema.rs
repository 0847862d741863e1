//! Settings schema: the declared keys, their types, defaults and ranges

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::value::SettingValue;

/// Primitive type of a configuration value
///
/// Parsed from GVariant-style type strings. Anything this program cannot
/// edit ends up as `Unsupported` and is left out of the settings form.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum TypeTag {
    /// `b`
    Boolean,
    /// `i`
    Integer,
    /// `d`
    Double,
    /// `s`
    String,
    /// `(ii)`
    IntPair,
    /// `(tt)`
    UintPair,
    /// Any other type string
    Unsupported(String),
}

impl TypeTag {
    pub fn parse(type_string: &str) -> Self {
        match type_string {
            "b" => TypeTag::Boolean,
            "i" => TypeTag::Integer,
            "d" => TypeTag::Double,
            "s" => TypeTag::String,
            "(ii)" => TypeTag::IntPair,
            "(tt)" => TypeTag::UintPair,
            other => TypeTag::Unsupported(other.to_string()),
        }
    }

    /// The type string this tag was parsed from
    pub fn type_string(&self) -> &str {
        match self {
            TypeTag::Boolean => "b",
            TypeTag::Integer => "i",
            TypeTag::Double => "d",
            TypeTag::String => "s",
            TypeTag::IntPair => "(ii)",
            TypeTag::UintPair => "(tt)",
            TypeTag::Unsupported(s) => s,
        }
    }

    pub fn is_supported(&self) -> bool {
        !matches!(self, TypeTag::Unsupported(_))
    }
}

/// Restriction on the values a key accepts
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum KeyRange {
    /// Any value of the key's type
    #[default]
    Type,
    /// Numeric value within `min..=max`
    Range { min: f64, max: f64 },
    /// One of a fixed set of strings
    Enum { values: Vec<String> },
    /// Any subset of a fixed set of strings
    Flags { values: Vec<String> },
}

impl KeyRange {
    /// Name of the range kind, as reported in diagnostics
    pub fn kind(&self) -> &'static str {
        match self {
            KeyRange::Type => "type",
            KeyRange::Range { .. } => "range",
            KeyRange::Enum { .. } => "enum",
            KeyRange::Flags { .. } => "flags",
        }
    }
}

/// Errors raised while loading or validating a schema
#[derive(Debug, Error)]
pub enum SchemaError {
    #[error("failed to parse schema: {0}")]
    Parse(#[from] serde_json::Error),
    #[error("key '{0}' is declared more than once")]
    DuplicateKey(String),
    #[error("default value of key '{key}' does not match type '{type_string}'")]
    InvalidDefault { key: String, type_string: String },
    #[error("default value of key '{0}' is outside its declared range")]
    DefaultOutOfRange(String),
}

/// On-disk form of a key declaration
#[derive(Debug, Clone, Deserialize)]
struct RawKeySchema {
    name: String,
    #[serde(rename = "type")]
    type_string: String,
    default: serde_json::Value,
    #[serde(default)]
    range: KeyRange,
    #[serde(default)]
    summary: String,
    #[serde(default)]
    description: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
struct RawSettingsSchema {
    id: String,
    keys: Vec<RawKeySchema>,
}

/// Declaration of a single configuration key
#[derive(Debug, Clone, PartialEq)]
pub struct KeySchema {
    pub name: String,
    pub type_tag: TypeTag,
    pub default: SettingValue,
    pub range: KeyRange,
    /// Short human readable summary, may carry `[hidden]` or `[N] ` prefixes
    pub summary: String,
    pub description: Option<String>,
}

impl KeySchema {
    /// Check whether `value` fits the key's type and declared range
    pub fn accepts(&self, value: &SettingValue) -> bool {
        if !value.matches_tag(&self.type_tag) {
            return false;
        }
        if let SettingValue::Int(v) = value {
            if i32::try_from(*v).is_err() {
                return false;
            }
        }
        match (&self.range, value) {
            (KeyRange::Range { min, max }, _) => match value.as_f64() {
                Some(v) => v >= *min && v <= *max,
                None => true,
            },
            (KeyRange::Enum { values }, SettingValue::String(s)) => values.contains(s),
            _ => true,
        }
    }
}

/// The complete set of keys a settings store is built from
#[derive(Debug, Clone, PartialEq)]
pub struct SettingsSchema {
    pub id: String,
    keys: Vec<KeySchema>,
}

impl SettingsSchema {
    /// Build a schema from already validated key declarations
    pub fn new(id: impl Into<String>, keys: Vec<KeySchema>) -> Result<Self, SchemaError> {
        for (i, key) in keys.iter().enumerate() {
            if keys[..i].iter().any(|k| k.name == key.name) {
                return Err(SchemaError::DuplicateKey(key.name.clone()));
            }
            if !key.accepts(&key.default) {
                return Err(SchemaError::DefaultOutOfRange(key.name.clone()));
            }
        }
        Ok(Self {
            id: id.into(),
            keys,
        })
    }

    /// Parse a schema from its JSON representation
    pub fn from_json(json: &str) -> Result<Self, SchemaError> {
        let raw: RawSettingsSchema = serde_json::from_str(json)?;
        let mut keys = Vec::with_capacity(raw.keys.len());

        for raw_key in raw.keys {
            let type_tag = TypeTag::parse(&raw_key.type_string);
            if !type_tag.is_supported() {
                log::debug!(
                    "Key '{}' has type '{}' which has no typed representation",
                    raw_key.name,
                    raw_key.type_string
                );
            }
            let default = SettingValue::from_json(&type_tag, &raw_key.default).ok_or_else(|| {
                SchemaError::InvalidDefault {
                    key: raw_key.name.clone(),
                    type_string: raw_key.type_string.clone(),
                }
            })?;
            keys.push(KeySchema {
                name: raw_key.name,
                type_tag,
                default,
                range: raw_key.range,
                summary: raw_key.summary,
                description: raw_key.description.filter(|d| !d.is_empty()),
            });
        }

        Self::new(raw.id, keys)
    }

    /// Key names in declaration order
    pub fn list_keys(&self) -> Vec<String> {
        self.keys.iter().map(|k| k.name.clone()).collect()
    }

    pub fn keys(&self) -> &[KeySchema] {
        &self.keys
    }

    pub fn key(&self, name: &str) -> Option<&KeySchema> {
        self.keys.iter().find(|k| k.name == name)
    }
}
