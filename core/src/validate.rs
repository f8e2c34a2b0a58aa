//! Definition and record validation.
//!
//! Two layers share one error type: [`validate_definition`] checks the
//! structural invariants of an [`EntityDef`] (duplicate fields, dangling
//! derivation rules, index columns that do not exist), while record
//! construction reports per-field failures (missing required fields, type
//! mismatches) through the same enum.
//!
//! # Examples
//!
//! ```
//! use entity_schema_core::*;
//!
//! let def = EntityDef::new("app_tbl", "note")
//!     .with_field(FieldDef::required("title", FieldType::Text));
//! assert!(validate_definition(&def).is_empty());
//!
//! // Index over a column that was never declared
//! let bad = EntityDef::new("app_tbl", "note")
//!     .with_field(FieldDef::required("title", FieldType::Text))
//!     .with_index(&["missing"]);
//! assert!(!validate_definition(&bad).is_empty());
//! ```

use std::collections::HashSet;

use thiserror::Error;

use crate::types::{EntityDef, FieldType};

/// Definition and record-construction errors.
///
/// Each variant names the offending field or column; the `Display` impl
/// provides a human-readable message.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    /// Raw input omits a required field (or supplies `null` for it).
    #[error("missing required field: {0}")]
    MissingField(String),
    /// Raw input value does not fit the declared field type.
    #[error("field '{field}' expects {expected}, got {actual}")]
    TypeMismatch {
        /// Offending field name.
        field: String,
        /// Declared type.
        expected: FieldType,
        /// JSON type of the supplied value.
        actual: String,
    },
    /// Table name is empty or whitespace-only.
    #[error("entity table name cannot be empty")]
    EmptyTableName,
    /// Table, field, or index identifier contains invalid characters.
    #[error("invalid identifier '{0}': must contain only alphanumeric characters and underscores")]
    InvalidIdentifier(String),
    /// Two fields share a name.
    #[error("duplicate field declaration: {0}")]
    DuplicateField(String),
    /// A field marked derived has no derivation rule.
    #[error("derived field '{0}' has no derivation rule")]
    MissingDeriveRule(String),
    /// A derivation rule targets a field that is unknown or not derived.
    #[error("derivation rule targets unknown or non-derived field: {0}")]
    InvalidDeriveTarget(String),
    /// A derivation rule reads a field that is not declared.
    #[error("derivation rule for '{field}' reads unknown field: {source_field}")]
    UnknownDeriveSource {
        /// Derived field the rule computes.
        field: String,
        /// Source field that does not exist.
        source_field: String,
    },
    /// An index covers a column that is not declared.
    #[error("index references unknown column: {0}")]
    UnknownIndexColumn(String),
    /// The declared primary key names a column that is not declared.
    #[error("primary key references unknown column: {0}")]
    UnknownPrimaryKeyColumn(String),
    /// A declared default value does not match the field's type.
    #[error("default for field '{0}' does not match the declared type")]
    DefaultTypeMismatch(String),
    /// A derived field cannot also be required from raw input.
    #[error("derived field '{0}' cannot be required")]
    RequiredDerivedField(String),
}

/// Validates the structural invariants of an entity definition.
///
/// Checks identifiers, duplicate fields, derivation rule wiring, index and
/// primary-key column references, and default value types. Storage-layer
/// callers run this before configuring a table.
///
/// # Examples
///
/// ```
/// use entity_schema_core::*;
///
/// let def = EntityDef::new("app_tbl", "note")
///     .with_field(FieldDef::derived("slug", FieldType::Text));
/// let errors = validate_definition(&def);
/// assert!(errors.iter().any(|e| matches!(e, ValidationError::MissingDeriveRule(_))));
/// ```
pub fn validate_definition(def: &EntityDef) -> Vec<ValidationError> {
    let mut errors = Vec::new();

    if def.table.trim().is_empty() {
        errors.push(ValidationError::EmptyTableName);
        return errors;
    }
    if !is_identifier(&def.table) {
        errors.push(ValidationError::InvalidIdentifier(def.table.clone()));
        return errors;
    }

    let mut seen: HashSet<&str> = HashSet::new();
    for field in &def.fields {
        if !is_identifier(&field.name) {
            errors.push(ValidationError::InvalidIdentifier(field.name.clone()));
            return errors;
        }
        if !seen.insert(field.name.as_str()) {
            errors.push(ValidationError::DuplicateField(field.name.clone()));
            return errors;
        }
        if field.derived && field.required {
            errors.push(ValidationError::RequiredDerivedField(field.name.clone()));
            return errors;
        }
        if let Some(default) = &field.default {
            let matches_type = default
                .type_of()
                .map(|t| t == field.field_type)
                .unwrap_or(true);
            if !matches_type {
                errors.push(ValidationError::DefaultTypeMismatch(field.name.clone()));
                return errors;
            }
        }
    }

    for field in &def.fields {
        if field.derived && def.derive_rule(&field.name).is_none() {
            errors.push(ValidationError::MissingDeriveRule(field.name.clone()));
            return errors;
        }
    }

    for (target, rule) in &def.derived {
        match def.field(target) {
            Some(field) if field.derived => {}
            _ => {
                errors.push(ValidationError::InvalidDeriveTarget(target.clone()));
                return errors;
            }
        }
        for source in rule.sources() {
            if def.field(source).is_none() {
                errors.push(ValidationError::UnknownDeriveSource {
                    field: target.clone(),
                    source_field: source.to_string(),
                });
                return errors;
            }
        }
    }

    for index in &def.indexes {
        for column in &index.columns {
            if def.field(column).is_none() {
                errors.push(ValidationError::UnknownIndexColumn(column.clone()));
                return errors;
            }
        }
    }

    for column in &def.primary_key {
        if def.field(column).is_none() {
            errors.push(ValidationError::UnknownPrimaryKeyColumn(column.clone()));
            return errors;
        }
    }

    errors
}

pub(crate) fn is_identifier(s: &str) -> bool {
    !s.is_empty() && s.chars().all(|c| c.is_alphanumeric() || c == '_')
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{DeriveRule, FieldDef};
    use crate::value::FieldValue;

    fn person() -> EntityDef {
        EntityDef::new("t", "person")
            .with_field(FieldDef::derived("full_name", FieldType::Text))
            .with_field(FieldDef::required("first_name", FieldType::Text))
            .with_field(FieldDef::required("last_name", FieldType::Text))
            .with_derivation(
                "full_name",
                DeriveRule::Concat {
                    fields: vec!["first_name".into(), "last_name".into()],
                    separator: " ".into(),
                },
            )
            .with_index(&["last_name"])
    }

    #[test]
    fn test_accepts_valid_definition() {
        assert!(validate_definition(&person()).is_empty());
    }

    #[test]
    fn test_rejects_empty_table_name() {
        let def = EntityDef::new("t", "  ");
        assert_eq!(
            validate_definition(&def),
            vec![ValidationError::EmptyTableName]
        );
    }

    #[test]
    fn test_rejects_duplicate_field() {
        let def = EntityDef::new("t", "x")
            .with_field(FieldDef::optional("a", FieldType::Text))
            .with_field(FieldDef::optional("a", FieldType::Integer));
        assert_eq!(
            validate_definition(&def),
            vec![ValidationError::DuplicateField("a".to_string())]
        );
    }

    #[test]
    fn test_rejects_missing_derive_rule() {
        let def = EntityDef::new("t", "x").with_field(FieldDef::derived("d", FieldType::Text));
        assert_eq!(
            validate_definition(&def),
            vec![ValidationError::MissingDeriveRule("d".to_string())]
        );
    }

    #[test]
    fn test_rejects_rule_reading_unknown_field() {
        let def = EntityDef::new("t", "x")
            .with_field(FieldDef::derived("d", FieldType::Text))
            .with_derivation(
                "d",
                DeriveRule::Concat {
                    fields: vec!["ghost".into()],
                    separator: " ".into(),
                },
            );
        assert_eq!(
            validate_definition(&def),
            vec![ValidationError::UnknownDeriveSource {
                field: "d".to_string(),
                source_field: "ghost".to_string(),
            }]
        );
    }

    #[test]
    fn test_rejects_unknown_index_column() {
        let def = person().with_index(&["ghost"]);
        assert_eq!(
            validate_definition(&def),
            vec![ValidationError::UnknownIndexColumn("ghost".to_string())]
        );
    }

    #[test]
    fn test_rejects_default_of_wrong_type() {
        let def = EntityDef::new("t", "x")
            .with_field(FieldDef::optional("n", FieldType::Integer).with_default("zero"));
        assert_eq!(
            validate_definition(&def),
            vec![ValidationError::DefaultTypeMismatch("n".to_string())]
        );
        // Null defaults are fine for any type
        let def = EntityDef::new("t", "x")
            .with_field(FieldDef::optional("n", FieldType::Integer).with_default(FieldValue::Null));
        assert!(validate_definition(&def).is_empty());
    }

    #[test]
    fn test_rejects_unknown_primary_key_column() {
        let def = person().with_primary_key(&["ghost"]);
        assert_eq!(
            validate_definition(&def),
            vec![ValidationError::UnknownPrimaryKeyColumn("ghost".to_string())]
        );
    }
}
