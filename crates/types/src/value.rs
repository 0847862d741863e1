//! Typed setting values

use serde_json::{json, Value};

use crate::schema::TypeTag;

/// Value of a configuration key
#[derive(Debug, Clone, PartialEq)]
pub enum SettingValue {
    Bool(bool),
    Int(i64),
    Double(f64),
    String(String),
    IntPair(i64, i64),
    UintPair(u64, u64),
    /// Value of a type this program cannot edit, kept verbatim
    Opaque(Value),
}

impl SettingValue {
    /// Decode a JSON value according to the key's type tag
    ///
    /// Returns `None` when the JSON does not have the shape the tag requires.
    /// Integers are checked against the 32 bit range of the `i` type.
    pub fn from_json(tag: &TypeTag, value: &Value) -> Option<Self> {
        match tag {
            TypeTag::Boolean => value.as_bool().map(SettingValue::Bool),
            TypeTag::Integer => value
                .as_i64()
                .filter(|v| i32::try_from(*v).is_ok())
                .map(SettingValue::Int),
            TypeTag::Double => value.as_f64().map(SettingValue::Double),
            TypeTag::String => value.as_str().map(|s| SettingValue::String(s.to_string())),
            TypeTag::IntPair => {
                let (a, b) = pair(value)?;
                let a = a.as_i64().filter(|v| i32::try_from(*v).is_ok())?;
                let b = b.as_i64().filter(|v| i32::try_from(*v).is_ok())?;
                Some(SettingValue::IntPair(a, b))
            }
            TypeTag::UintPair => {
                let (a, b) = pair(value)?;
                Some(SettingValue::UintPair(a.as_u64()?, b.as_u64()?))
            }
            TypeTag::Unsupported(_) => Some(SettingValue::Opaque(value.clone())),
        }
    }

    /// Encode the value as JSON, the inverse of [`SettingValue::from_json`]
    pub fn to_json(&self) -> Value {
        match self {
            SettingValue::Bool(v) => json!(v),
            SettingValue::Int(v) => json!(v),
            SettingValue::Double(v) => json!(v),
            SettingValue::String(v) => json!(v),
            SettingValue::IntPair(a, b) => json!([a, b]),
            SettingValue::UintPair(a, b) => json!([a, b]),
            SettingValue::Opaque(v) => v.clone(),
        }
    }

    /// Whether this value is of the kind `tag` describes
    pub fn matches_tag(&self, tag: &TypeTag) -> bool {
        matches!(
            (self, tag),
            (SettingValue::Bool(_), TypeTag::Boolean)
                | (SettingValue::Int(_), TypeTag::Integer)
                | (SettingValue::Double(_), TypeTag::Double)
                | (SettingValue::String(_), TypeTag::String)
                | (SettingValue::IntPair(..), TypeTag::IntPair)
                | (SettingValue::UintPair(..), TypeTag::UintPair)
                | (SettingValue::Opaque(_), TypeTag::Unsupported(_))
        )
    }

    pub fn as_bool(&self) -> Option<bool> {
        match self {
            SettingValue::Bool(v) => Some(*v),
            _ => None,
        }
    }

    /// Numeric view of scalar values, used for range checks and spin buttons
    pub fn as_f64(&self) -> Option<f64> {
        match self {
            SettingValue::Int(v) => Some(*v as f64),
            SettingValue::Double(v) => Some(*v),
            _ => None,
        }
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            SettingValue::String(v) => Some(v),
            _ => None,
        }
    }

    /// Both pair kinds widened to `u64`, negative ends clamp to zero
    pub fn as_size_pair(&self) -> Option<(u64, u64)> {
        match self {
            SettingValue::UintPair(a, b) => Some((*a, *b)),
            SettingValue::IntPair(a, b) => Some(((*a).max(0) as u64, (*b).max(0) as u64)),
            _ => None,
        }
    }
}

fn pair(value: &Value) -> Option<(&Value, &Value)> {
    match value.as_array()?.as_slice() {
        [a, b] => Some((a, b)),
        _ => None,
    }
}
