//! Example entity used by tests and demos across the workspace.

use crate::types::{DeriveRule, Entity, EntityDef, FieldDef, FieldType};

/// Minimal person-biography entity, namespaced under `pax_tbl`.
///
/// Declares a derived `full_name` column computed from the name parts, a
/// lower-cased free-text `gender`, three indexes in a fixed order, and a
/// full-text-search shadow table.
///
/// # Examples
///
/// ```
/// use entity_schema_core::{Entity, IndividualBio};
///
/// let def = IndividualBio::definition();
/// assert_eq!(def.table, "individual_bio");
/// assert_eq!(def.columns().len(), 6);
/// assert!(def.full_text_search);
/// ```
pub struct IndividualBio;

impl Entity for IndividualBio {
    fn definition() -> EntityDef {
        EntityDef::new("pax_tbl", "individual_bio")
            .with_field(FieldDef::derived("full_name", FieldType::Text))
            .with_field(FieldDef::required("first_name", FieldType::Text))
            .with_field(FieldDef::required("last_name", FieldType::Text))
            .with_field(FieldDef::optional("suffix", FieldType::Text))
            .with_field(FieldDef::optional("nick_name", FieldType::Text))
            .with_field(FieldDef::optional("gender", FieldType::Text).lowercase())
            .with_derivation(
                "full_name",
                DeriveRule::FullName {
                    first: "first_name".into(),
                    last: "last_name".into(),
                    suffix: "suffix".into(),
                },
            )
            .with_index(&["first_name", "last_name"])
            .with_index(&["last_name"])
            .with_index(&["full_name"])
            .with_full_text_search()
    }
}
