//! Core entity definitions and record construction.
//!
//! This crate defines the foundational types for declaring storable entities
//! and turning raw caller input into normalized, storage-ready rows:
//!
//! - [`EntityDef`] — static schema description of one entity (ordered typed
//!   fields, derivation rules, indexes, primary key, namespace prefix, and
//!   the full-text-search flag).
//! - [`Entity`] — the fixed trait every storable entity implements to expose
//!   its definition; no runtime reflection anywhere.
//! - [`FieldDef`] / [`FieldType`] / [`FieldValue`] — field declarations and
//!   the dynamic values that flow through them.
//! - [`DeriveRule`] / [`Normalize`] — construction-time computation and
//!   normalization rules for field values.
//! - [`Record`] — the immutable ordered column mapping produced by two-phase
//!   construction ([`EntityDef::build_record`]).
//!
//! Validation ([`validate_definition`]) catches structural errors such as
//! duplicate fields, dangling derivation rules, and indexes over undeclared
//! columns before a definition reaches storage.
//!
//! # Example
//!
//! ```
//! use entity_schema_core::*;
//!
//! // Declare an entity
//! let def = EntityDef::new("app_tbl", "contact")
//!     .with_field(FieldDef::derived("display", FieldType::Text))
//!     .with_field(FieldDef::required("first_name", FieldType::Text))
//!     .with_field(FieldDef::required("last_name", FieldType::Text))
//!     .with_derivation("display", DeriveRule::Concat {
//!         fields: vec!["first_name".into(), "last_name".into()],
//!         separator: " ".into(),
//!     })
//!     .with_index(&["last_name"]);
//! assert!(validate_definition(&def).is_empty());
//!
//! // Construct a record from raw input
//! let raw = serde_json::json!({ "first_name": "Juan", "last_name": "Doe" });
//! let record = def.build_record(raw.as_object().unwrap()).unwrap();
//! assert_eq!(record.get("display").unwrap().as_text(), Some("Juan Doe"));
//! ```

mod bio;
mod record;
mod types;
mod validate;
mod value;

pub use bio::IndividualBio;
pub use record::{RawRecord, Record};
pub use types::{DeriveRule, Entity, EntityDef, FieldDef, FieldType, IndexSpec, Normalize};
pub use validate::{ValidationError, validate_definition};
pub use value::FieldValue;
