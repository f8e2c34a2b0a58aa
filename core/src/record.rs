//! Record construction: the two-phase path from raw input to storable rows.
//!
//! Phase 1 validates every non-derived field of the raw input against the
//! entity's declarations. Phase 2 computes derived fields from the validated
//! base values and applies per-field normalization. Only when both phases
//! succeed does an immutable [`Record`] exist; a failed record never
//! partially applies.

use crate::types::{DeriveRule, EntityDef};
use crate::validate::ValidationError;
use crate::value::FieldValue;

/// Raw caller-supplied input for one record, keyed by field name.
pub type RawRecord = serde_json::Map<String, serde_json::Value>;

/// An immutable, ordered mapping from column name to normalized value.
///
/// Columns appear in field-declaration order and never include an
/// auto-generated primary key. Once constructed, a record's values reflect
/// fully normalized, validated data; no further mutation occurs.
///
/// # Examples
///
/// ```
/// use entity_schema_core::{Entity, IndividualBio};
///
/// let raw = serde_json::json!({
///     "first_name": "Juan",
///     "last_name": "Doe",
///     "suffix": "Jr.",
///     "gender": "male",
/// });
/// let record = IndividualBio::definition()
///     .build_record(raw.as_object().unwrap())
///     .unwrap();
/// assert_eq!(record.get("full_name").unwrap().as_text(), Some("Juan Doe, Jr."));
/// ```
#[derive(Debug, Clone, PartialEq)]
pub struct Record {
    columns: Vec<(String, FieldValue)>,
}

impl Record {
    /// Assembles a record from already-normalized columns.
    ///
    /// Intended for storage layers reading rows back out of a table; new
    /// records from raw input go through [`EntityDef::build_record`].
    pub fn from_columns(columns: Vec<(String, FieldValue)>) -> Self {
        Self { columns }
    }

    /// Looks up a value by column name.
    pub fn get(&self, name: &str) -> Option<&FieldValue> {
        self.columns
            .iter()
            .find(|(column, _)| column == name)
            .map(|(_, value)| value)
    }

    /// Iterates columns in declaration order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &FieldValue)> {
        self.columns
            .iter()
            .map(|(name, value)| (name.as_str(), value))
    }

    /// Returns the column names in declaration order.
    pub fn column_names(&self) -> Vec<&str> {
        self.columns.iter().map(|(name, _)| name.as_str()).collect()
    }

    /// Number of columns.
    pub fn len(&self) -> usize {
        self.columns.len()
    }

    /// Returns `true` when the record has no columns.
    pub fn is_empty(&self) -> bool {
        self.columns.is_empty()
    }
}

impl EntityDef {
    /// Constructs a normalized [`Record`] from raw input.
    ///
    /// Phase 1 validates presence and type of every non-derived field:
    /// required fields missing from the input (or supplied as `null`) fail
    /// with [`ValidationError::MissingField`]; values of the wrong shape fail
    /// with [`ValidationError::TypeMismatch`]. Missing optional fields take
    /// the declared default, or `Null`. Unknown input keys are ignored.
    ///
    /// Phase 2 computes derived fields from the validated base values, then
    /// applies each field's normalization rules in declaration order.
    ///
    /// # Examples
    ///
    /// ```
    /// use entity_schema_core::*;
    ///
    /// let def = EntityDef::new("app_tbl", "note")
    ///     .with_field(FieldDef::required("title", FieldType::Text));
    ///
    /// let err = def.build_record(&RawRecord::new()).unwrap_err();
    /// assert_eq!(err, ValidationError::MissingField("title".to_string()));
    /// ```
    pub fn build_record(&self, raw: &RawRecord) -> Result<Record, ValidationError> {
        let mut columns: Vec<(String, FieldValue)> = Vec::with_capacity(self.fields.len());

        for field in &self.fields {
            if field.derived {
                columns.push((field.name.clone(), FieldValue::Null));
                continue;
            }

            let supplied = match raw.get(&field.name) {
                Some(json) => FieldValue::from_json(&field.name, field.field_type, json)?,
                None => FieldValue::Null,
            };

            let value = if supplied.is_null() {
                match &field.default {
                    Some(default) => default.clone(),
                    None if field.required => {
                        return Err(ValidationError::MissingField(field.name.clone()));
                    }
                    None => FieldValue::Null,
                }
            } else {
                supplied
            };

            columns.push((field.name.clone(), value));
        }

        for (name, rule) in &self.derived {
            let computed = apply_rule(rule, &columns);
            if let Some(slot) = columns.iter_mut().find(|(column, _)| column == name) {
                slot.1 = computed;
            }
        }

        for field in &self.fields {
            if field.normalize.is_empty() {
                continue;
            }
            if let Some(slot) = columns.iter_mut().find(|(column, _)| column == &field.name) {
                let mut value = std::mem::replace(&mut slot.1, FieldValue::Null);
                for rule in &field.normalize {
                    value = rule.apply(value);
                }
                slot.1 = value;
            }
        }

        Ok(Record { columns })
    }
}

/// Evaluates a derivation rule against the validated base columns.
///
/// Absent or empty sources make the result `Null`; rules never raise.
fn apply_rule(rule: &DeriveRule, columns: &[(String, FieldValue)]) -> FieldValue {
    let text_of = |name: &str| -> Option<&str> {
        columns
            .iter()
            .find(|(column, _)| column == name)
            .and_then(|(_, value)| value.as_text())
            .filter(|s| !s.is_empty())
    };

    match rule {
        DeriveRule::Concat { fields, separator } => {
            let mut parts = Vec::with_capacity(fields.len());
            for field in fields {
                match text_of(field) {
                    Some(text) => parts.push(text),
                    None => return FieldValue::Null,
                }
            }
            FieldValue::Text(parts.join(separator))
        }
        DeriveRule::FullName {
            first,
            last,
            suffix,
        } => {
            let (Some(first), Some(last)) = (text_of(first), text_of(last)) else {
                return FieldValue::Null;
            };
            match text_of(suffix) {
                Some(suffix) => FieldValue::Text(format!("{first} {last}, {suffix}")),
                None => FieldValue::Text(format!("{first} {last}")),
            }
        }
    }
}
