//! Entity definition types for declarative table modeling.
//!
//! This module defines the static schema-description structure every storable
//! entity exposes: an ordered list of typed field declarations plus the
//! derivation rules, index specifications, and table naming that drive
//! storage configuration. Definitions are plain values built at definition
//! time; nothing here relies on runtime reflection.

use serde::{Deserialize, Serialize};

use crate::value::FieldValue;

/// Semantic storage type of a field.
///
/// Maps one-to-one onto SQLite column affinities at the storage layer.
///
/// # Examples
///
/// ```
/// use entity_schema_core::FieldType;
///
/// assert_eq!(FieldType::Text.to_string(), "Text");
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum FieldType {
    /// UTF-8 text.
    Text,
    /// 64-bit integer.
    Integer,
    /// 64-bit float.
    Real,
    /// Raw bytes.
    Blob,
}

impl std::fmt::Display for FieldType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            FieldType::Text => "Text",
            FieldType::Integer => "Integer",
            FieldType::Real => "Real",
            FieldType::Blob => "Blob",
        };
        f.write_str(name)
    }
}

/// Normalization rule applied to a field value at construction time.
///
/// Rules run after derivation, in declaration order, and only touch
/// [`Text`](crate::FieldValue::Text) values; `Null` passes through.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Normalize {
    /// Case-fold to lower case.
    Lowercase,
    /// Strip leading and trailing whitespace.
    Trim,
}

impl Normalize {
    /// Applies the rule to a single value.
    pub fn apply(&self, value: FieldValue) -> FieldValue {
        match (self, value) {
            (Normalize::Lowercase, FieldValue::Text(s)) => FieldValue::Text(s.to_lowercase()),
            (Normalize::Trim, FieldValue::Text(s)) => FieldValue::Text(s.trim().to_string()),
            (_, other) => other,
        }
    }
}

/// Computation rule for a derived field.
///
/// Derived fields are stored columns whose values are computed from other
/// fields during record construction rather than supplied by the caller.
/// Every rule fails silently: when its source fields are absent the derived
/// field is left `Null` instead of raising.
///
/// # Examples
///
/// ```
/// use entity_schema_core::DeriveRule;
///
/// let rule = DeriveRule::FullName {
///     first: "first_name".into(),
///     last: "last_name".into(),
///     suffix: "suffix".into(),
/// };
/// assert!(matches!(rule, DeriveRule::FullName { .. }));
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum DeriveRule {
    /// Joins the named source fields with a separator. `Null` when any
    /// source is missing or empty.
    Concat {
        /// Source field names, in join order.
        fields: Vec<String>,
        /// Separator placed between consecutive values.
        separator: String,
    },
    /// Person-name concatenation: `"<first> <last>"`, with `", <suffix>"`
    /// appended when the suffix value is present and non-empty. `Null` when
    /// first or last is missing or empty.
    FullName {
        /// Field holding the given name.
        first: String,
        /// Field holding the family name.
        last: String,
        /// Field holding the optional name suffix (e.g. `"Jr."`).
        suffix: String,
    },
}

impl DeriveRule {
    /// Returns every source field the rule reads.
    pub fn sources(&self) -> Vec<&str> {
        match self {
            DeriveRule::Concat { fields, .. } => fields.iter().map(String::as_str).collect(),
            DeriveRule::FullName {
                first,
                last,
                suffix,
            } => vec![first, last, suffix],
        }
    }
}

/// Declaration of a single storable field.
///
/// Built with the [`required`](FieldDef::required),
/// [`optional`](FieldDef::optional), and [`derived`](FieldDef::derived)
/// constructors, then refined with chained builder methods.
///
/// # Examples
///
/// ```
/// use entity_schema_core::{FieldDef, FieldType};
///
/// let gender = FieldDef::optional("gender", FieldType::Text).lowercase();
/// assert!(!gender.required);
/// assert!(!gender.derived);
///
/// let first = FieldDef::required("first_name", FieldType::Text);
/// assert!(first.required);
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FieldDef {
    /// Column name.
    pub name: String,
    /// Semantic storage type.
    pub field_type: FieldType,
    /// Whether raw input must supply a non-null value.
    pub required: bool,
    /// Whether the value is computed by a [`DeriveRule`] instead of supplied.
    pub derived: bool,
    /// Value used when raw input omits the field.
    pub default: Option<FieldValue>,
    /// Normalization rules, applied in order at construction time.
    pub normalize: Vec<Normalize>,
}

impl FieldDef {
    fn new(name: &str, field_type: FieldType, required: bool, derived: bool) -> Self {
        Self {
            name: name.to_string(),
            field_type,
            required,
            derived,
            default: None,
            normalize: Vec::new(),
        }
    }

    /// Creates a field that raw input must supply.
    pub fn required(name: &str, field_type: FieldType) -> Self {
        Self::new(name, field_type, true, false)
    }

    /// Creates a field raw input may omit; absent values store as `Null`.
    pub fn optional(name: &str, field_type: FieldType) -> Self {
        Self::new(name, field_type, false, false)
    }

    /// Creates a stored field computed by a derivation rule.
    pub fn derived(name: &str, field_type: FieldType) -> Self {
        Self::new(name, field_type, false, true)
    }

    /// Sets the value used when raw input omits the field.
    pub fn with_default(mut self, value: impl Into<FieldValue>) -> Self {
        self.default = Some(value.into());
        self
    }

    /// Lower-cases the stored value at construction time.
    pub fn lowercase(mut self) -> Self {
        self.normalize.push(Normalize::Lowercase);
        self
    }

    /// Strips surrounding whitespace at construction time.
    pub fn trimmed(mut self) -> Self {
        self.normalize.push(Normalize::Trim);
        self
    }
}

/// Columns covered by one index, in declaration order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct IndexSpec {
    /// Indexed column names.
    pub columns: Vec<String>,
}

impl IndexSpec {
    /// Creates an index specification over the given columns.
    pub fn on(columns: &[&str]) -> Self {
        Self {
            columns: columns.iter().map(|c| c.to_string()).collect(),
        }
    }
}

/// Static schema description of one storable entity.
///
/// An `EntityDef` is the complete input to table configuration: the storage
/// layer derives physical names, column sets, primary keys, indexes, and the
/// optional full-text-search shadow table from this value alone, never from
/// data present in a table.
///
/// The namespace `prefix` is owned by the definition; physical object names
/// are computed from declared configuration, not from a hidden string
/// convention. Full-text-search presence is likewise the explicit
/// [`full_text_search`](EntityDef::full_text_search) flag.
///
/// # Examples
///
/// ```
/// use entity_schema_core::{EntityDef, FieldDef, FieldType};
///
/// let def = EntityDef::new("app_tbl", "note")
///     .with_field(FieldDef::required("title", FieldType::Text))
///     .with_field(FieldDef::optional("body", FieldType::Text))
///     .with_index(&["title"])
///     .with_full_text_search();
///
/// assert_eq!(def.table, "note");
/// assert_eq!(def.columns().len(), 2);
/// assert!(def.full_text_search);
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EntityDef {
    /// Logical table name (physical name is `<prefix>_<table>`).
    pub table: String,
    /// Namespace prefix for every physical object name.
    pub prefix: String,
    /// Ordered field declarations; derived fields appear at their stored
    /// column position.
    pub fields: Vec<FieldDef>,
    /// Derivation rules, keyed by derived field name.
    pub derived: Vec<(String, DeriveRule)>,
    /// Index specifications, in creation order.
    pub indexes: Vec<IndexSpec>,
    /// Whether a full-text-search shadow table accompanies the table.
    pub full_text_search: bool,
    /// Declared primary-key columns; empty means an auto-increment integer
    /// `id` column is generated.
    pub primary_key: Vec<String>,
}

impl EntityDef {
    /// Creates an empty definition for the given namespace prefix and table.
    pub fn new(prefix: &str, table: &str) -> Self {
        Self {
            table: table.to_string(),
            prefix: prefix.to_string(),
            fields: Vec::new(),
            derived: Vec::new(),
            indexes: Vec::new(),
            full_text_search: false,
            primary_key: Vec::new(),
        }
    }

    /// Appends a field declaration.
    pub fn with_field(mut self, field: FieldDef) -> Self {
        self.fields.push(field);
        self
    }

    /// Attaches a derivation rule to the named derived field.
    pub fn with_derivation(mut self, field: &str, rule: DeriveRule) -> Self {
        self.derived.push((field.to_string(), rule));
        self
    }

    /// Appends an index over the given columns.
    pub fn with_index(mut self, columns: &[&str]) -> Self {
        self.indexes.push(IndexSpec::on(columns));
        self
    }

    /// Declares a full-text-search shadow table for this entity.
    pub fn with_full_text_search(mut self) -> Self {
        self.full_text_search = true;
        self
    }

    /// Declares an explicit primary key instead of the auto-generated `id`.
    pub fn with_primary_key(mut self, columns: &[&str]) -> Self {
        self.primary_key = columns.iter().map(|c| c.to_string()).collect();
        self
    }

    /// Returns the storable column set as ordered `(name, type)` pairs.
    ///
    /// Includes derived fields (they are stored) and never includes the
    /// auto-generated primary key. Deterministic; callers comparing against
    /// an expected shape may treat the result as a set.
    pub fn columns(&self) -> Vec<(String, FieldType)> {
        self.fields
            .iter()
            .map(|f| (f.name.clone(), f.field_type))
            .collect()
    }

    /// Looks up a field declaration by name.
    pub fn field(&self, name: &str) -> Option<&FieldDef> {
        self.fields.iter().find(|f| f.name == name)
    }

    /// Looks up the derivation rule for a derived field.
    pub fn derive_rule(&self, name: &str) -> Option<&DeriveRule> {
        self.derived
            .iter()
            .find(|(field, _)| field == name)
            .map(|(_, rule)| rule)
    }
}

/// The fixed hook every storable entity exposes.
///
/// Implementations return the full static schema description; everything the
/// storage layer does is driven by that value.
///
/// # Examples
///
/// ```
/// use entity_schema_core::{Entity, EntityDef, FieldDef, FieldType};
///
/// struct Note;
///
/// impl Entity for Note {
///     fn definition() -> EntityDef {
///         EntityDef::new("app_tbl", "note")
///             .with_field(FieldDef::required("title", FieldType::Text))
///     }
/// }
///
/// assert_eq!(Note::definition().table, "note");
/// ```
pub trait Entity {
    /// Returns the static schema description for this entity.
    fn definition() -> EntityDef;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_field_def_builders() {
        let f = FieldDef::optional("gender", FieldType::Text).lowercase();
        assert_eq!(f.name, "gender");
        assert!(!f.required);
        assert_eq!(f.normalize, vec![Normalize::Lowercase]);

        let d = FieldDef::derived("full_name", FieldType::Text);
        assert!(d.derived);
        assert!(!d.required);
    }

    #[test]
    fn test_columns_keeps_declaration_order() {
        let def = EntityDef::new("t", "person")
            .with_field(FieldDef::derived("full_name", FieldType::Text))
            .with_field(FieldDef::required("first_name", FieldType::Text));

        let cols = def.columns();
        assert_eq!(
            cols,
            vec![
                ("full_name".to_string(), FieldType::Text),
                ("first_name".to_string(), FieldType::Text),
            ]
        );
    }

    #[test]
    fn test_derive_rule_lookup() {
        let rule = DeriveRule::Concat {
            fields: vec!["a".into(), "b".into()],
            separator: "-".into(),
        };
        let def = EntityDef::new("t", "x")
            .with_field(FieldDef::derived("joined", FieldType::Text))
            .with_derivation("joined", rule.clone());

        assert_eq!(def.derive_rule("joined"), Some(&rule));
        assert_eq!(def.derive_rule("missing"), None);
    }

    #[test]
    fn test_normalize_skips_null() {
        assert_eq!(
            Normalize::Lowercase.apply(FieldValue::Null),
            FieldValue::Null
        );
        assert_eq!(
            Normalize::Lowercase.apply(FieldValue::Text("FEMALE".into())),
            FieldValue::Text("female".into())
        );
    }
}
