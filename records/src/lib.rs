//! Raw record loading for entity tables.
//!
//! This crate reads batches of raw records — JSON objects keyed by field
//! name — from directories, JSON bundles, or YAML bundles, ready to be
//! validated and inserted against an entity definition by the storage layer.
//!
//! # Quick start
//!
//! ```no_run
//! use entity_schema_records::RecordSet;
//!
//! // Load every *.json file in a directory, in file-name order
//! let set = RecordSet::from_dir("fixtures/people/").unwrap();
//! println!("loaded {} records", set.len());
//!
//! // Fallback chain: try the directory first, then a bundle
//! let set = RecordSet::builder()
//!     .from_dir("fixtures/people/")
//!     .from_bundle("people.json")
//!     .build()
//!     .unwrap();
//! ```
//!
//! Records are kept raw here on purpose: field validation, derivation, and
//! normalization belong to the entity definition they are inserted against,
//! not to the files they came from.

mod error;
mod loader;

pub use error::{RecordsError, Result};
pub use loader::{RecordSet, RecordSetBuilder, RecordSource};
