//! Dynamic field values.
//!
//! [`FieldValue`] is the runtime representation of a single stored cell. Raw
//! input arrives as JSON and is coerced under the declared [`FieldType`] of
//! the receiving field; a value that does not fit the declared type is a
//! validation failure naming the offending field.

use serde::{Deserialize, Serialize};

use crate::types::FieldType;
use crate::validate::ValidationError;

/// A single dynamically-typed field value.
///
/// Serialized in natural JSON form (strings, numbers, `null`), so records
/// round-trip through the same files the raw input comes from.
///
/// # Examples
///
/// ```
/// use entity_schema_core::FieldValue;
///
/// let v = FieldValue::from("Juan");
/// assert_eq!(v.as_text(), Some("Juan"));
/// assert!(!v.is_null());
/// assert!(FieldValue::Null.is_null());
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum FieldValue {
    /// Absent / SQL `NULL`.
    Null,
    /// 64-bit integer.
    Integer(i64),
    /// 64-bit float.
    Real(f64),
    /// UTF-8 text.
    Text(String),
    /// Raw bytes.
    Blob(Vec<u8>),
}

impl FieldValue {
    /// Returns `true` for [`FieldValue::Null`].
    pub fn is_null(&self) -> bool {
        matches!(self, FieldValue::Null)
    }

    /// Returns the text content, if this is a [`FieldValue::Text`].
    pub fn as_text(&self) -> Option<&str> {
        match self {
            FieldValue::Text(s) => Some(s),
            _ => None,
        }
    }

    /// Returns the integer content, if this is a [`FieldValue::Integer`].
    pub fn as_integer(&self) -> Option<i64> {
        match self {
            FieldValue::Integer(i) => Some(*i),
            _ => None,
        }
    }

    /// Returns the [`FieldType`] this value inhabits; `None` for `Null`.
    pub fn type_of(&self) -> Option<FieldType> {
        match self {
            FieldValue::Null => None,
            FieldValue::Integer(_) => Some(FieldType::Integer),
            FieldValue::Real(_) => Some(FieldType::Real),
            FieldValue::Text(_) => Some(FieldType::Text),
            FieldValue::Blob(_) => Some(FieldType::Blob),
        }
    }

    /// Coerces a raw JSON value under a declared field type.
    ///
    /// `null` passes through as [`FieldValue::Null`] regardless of the
    /// declared type; required-ness is the caller's concern. Anything else
    /// must match the declared type exactly, except that [`FieldType::Real`]
    /// accepts integral numbers. Blob fields cannot be populated from raw
    /// JSON input.
    pub(crate) fn from_json(
        field: &str,
        expected: FieldType,
        value: &serde_json::Value,
    ) -> Result<Self, ValidationError> {
        if value.is_null() {
            return Ok(FieldValue::Null);
        }

        let mismatch = || ValidationError::TypeMismatch {
            field: field.to_string(),
            expected,
            actual: json_type_name(value).to_string(),
        };

        match expected {
            FieldType::Text => value
                .as_str()
                .map(|s| FieldValue::Text(s.to_string()))
                .ok_or_else(mismatch),
            FieldType::Integer => value
                .as_i64()
                .map(FieldValue::Integer)
                .ok_or_else(mismatch),
            FieldType::Real => value.as_f64().map(FieldValue::Real).ok_or_else(mismatch),
            FieldType::Blob => Err(mismatch()),
        }
    }
}

impl From<&str> for FieldValue {
    fn from(s: &str) -> Self {
        FieldValue::Text(s.to_string())
    }
}

impl From<String> for FieldValue {
    fn from(s: String) -> Self {
        FieldValue::Text(s)
    }
}

impl From<i64> for FieldValue {
    fn from(i: i64) -> Self {
        FieldValue::Integer(i)
    }
}

impl From<f64> for FieldValue {
    fn from(f: f64) -> Self {
        FieldValue::Real(f)
    }
}

fn json_type_name(value: &serde_json::Value) -> &'static str {
    match value {
        serde_json::Value::Null => "null",
        serde_json::Value::Bool(_) => "boolean",
        serde_json::Value::Number(_) => "number",
        serde_json::Value::String(_) => "string",
        serde_json::Value::Array(_) => "array",
        serde_json::Value::Object(_) => "object",
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_text_coercion() {
        let v = FieldValue::from_json("name", FieldType::Text, &serde_json::json!("Juan")).unwrap();
        assert_eq!(v, FieldValue::Text("Juan".to_string()));
    }

    #[test]
    fn test_null_passes_through() {
        let v = FieldValue::from_json("name", FieldType::Text, &serde_json::Value::Null).unwrap();
        assert!(v.is_null());
    }

    #[test]
    fn test_type_mismatch_names_field() {
        let err = FieldValue::from_json("age", FieldType::Integer, &serde_json::json!("old"))
            .unwrap_err();
        assert_eq!(
            err,
            ValidationError::TypeMismatch {
                field: "age".to_string(),
                expected: FieldType::Integer,
                actual: "string".to_string(),
            }
        );
    }

    #[test]
    fn test_real_accepts_integral_numbers() {
        let v = FieldValue::from_json("score", FieldType::Real, &serde_json::json!(3)).unwrap();
        assert_eq!(v, FieldValue::Real(3.0));
    }

    #[test]
    fn test_integer_rejects_fractions() {
        assert!(FieldValue::from_json("age", FieldType::Integer, &serde_json::json!(1.5)).is_err());
    }

    #[test]
    fn test_json_round_trip() {
        let v = FieldValue::Text("hello".to_string());
        let json = serde_json::to_value(&v).unwrap();
        assert_eq!(json, serde_json::json!("hello"));
        let back: FieldValue = serde_json::from_value(json).unwrap();
        assert_eq!(back, v);
    }
}
