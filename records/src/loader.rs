//! Record loading with builder pattern and fallback chains.
//!
//! Provides [`RecordSet`] for in-memory batches of raw records and
//! [`RecordSetBuilder`] for constructing a batch from multiple sources with
//! automatic fallback.
//!
//! # Loading patterns
//!
//! ```no_run
//! use entity_schema_records::RecordSet;
//!
//! // Load every *.json file in a directory (file-name order)
//! let set = RecordSet::from_dir("fixtures/people/").unwrap();
//! println!("loaded {} records", set.len());
//!
//! // Load a single JSON array bundle
//! let set = RecordSet::from_bundle("people.json").unwrap();
//!
//! // Use the builder for a fallback chain
//! let set = RecordSet::builder()
//!     .from_dir("fixtures/people/")
//!     .from_bundle("people.json")
//!     .build()
//!     .unwrap();
//! ```

use std::path::{Path, PathBuf};

use entity_schema_core::RawRecord;

use crate::error::{RecordsError, Result};

/// Describes where a [`RecordSet`] was loaded from.
#[derive(Debug, Clone)]
pub enum RecordSource {
    /// Loaded from a directory of individual JSON files.
    Directory(PathBuf),
    /// Loaded from a single JSON array file.
    Bundle(PathBuf),
    /// Loaded from a single YAML sequence file.
    YamlBundle(PathBuf),
}

/// In-memory batch of raw records, in load order.
///
/// A record is a JSON object keyed by field name; validation and
/// normalization happen later, at record construction against an entity
/// definition. Directory loads visit files in file-name order so that
/// seeding a table is deterministic.
///
/// # Examples
///
/// ```no_run
/// use entity_schema_records::RecordSet;
///
/// let set = RecordSet::from_dir("fixtures/people/").unwrap();
/// for record in set.records() {
///     println!("{:?}", record.get("last_name"));
/// }
/// ```
#[derive(Debug)]
pub struct RecordSet {
    records: Vec<RawRecord>,
    source: RecordSource,
}

impl RecordSet {
    /// Returns a new [`RecordSetBuilder`] for configuring a fallback chain.
    pub fn builder() -> RecordSetBuilder {
        RecordSetBuilder::new()
    }

    /// Loads records from a directory of `*.json` files.
    ///
    /// Each file may hold a single object or an array of objects. Files are
    /// visited in file-name order.
    ///
    /// # Errors
    ///
    /// Returns [`RecordsError::IoError`] if the directory cannot be read,
    /// [`RecordsError::JsonError`] on invalid JSON, or
    /// [`RecordsError::InvalidRecord`] when a file holds non-object content.
    pub fn from_dir(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let mut files: Vec<PathBuf> = std::fs::read_dir(path)?
            .collect::<std::io::Result<Vec<_>>>()?
            .into_iter()
            .map(|entry| entry.path())
            .filter(|p| p.extension().and_then(|e| e.to_str()) == Some("json"))
            .collect();
        files.sort();

        let mut records = Vec::new();
        for file in &files {
            let reader = std::io::BufReader::new(std::fs::File::open(file)?);
            let value: serde_json::Value = serde_json::from_reader(reader)?;
            collect_records(file, value, &mut records)?;
        }

        Ok(Self {
            records,
            source: RecordSource::Directory(path.to_path_buf()),
        })
    }

    /// Loads records from a single JSON file holding an array of objects.
    ///
    /// # Errors
    ///
    /// Returns [`RecordsError::IoError`] if the file cannot be read,
    /// [`RecordsError::JsonError`] on invalid JSON, or
    /// [`RecordsError::InvalidRecord`] on non-object content.
    pub fn from_bundle(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let reader = std::io::BufReader::new(std::fs::File::open(path)?);
        let value: serde_json::Value = serde_json::from_reader(reader)?;

        let mut records = Vec::new();
        collect_records(path, value, &mut records)?;

        Ok(Self {
            records,
            source: RecordSource::Bundle(path.to_path_buf()),
        })
    }

    /// Loads records from a single YAML file holding a sequence of mappings.
    ///
    /// The YAML content is converted to JSON values internally, so the same
    /// shape rules as [`from_bundle`](Self::from_bundle) apply.
    ///
    /// # Errors
    ///
    /// Returns [`RecordsError::IoError`] if the file cannot be read,
    /// [`RecordsError::YamlError`] on invalid YAML, or
    /// [`RecordsError::InvalidRecord`] on non-mapping content.
    pub fn from_yaml_bundle(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let reader = std::io::BufReader::new(std::fs::File::open(path)?);
        let value: serde_json::Value = serde_yaml::from_reader(reader)?;

        let mut records = Vec::new();
        collect_records(path, value, &mut records)?;

        Ok(Self {
            records,
            source: RecordSource::YamlBundle(path.to_path_buf()),
        })
    }

    /// Returns the loaded records in load order.
    pub fn records(&self) -> &[RawRecord] {
        &self.records
    }

    /// Consumes the set, yielding the records.
    pub fn into_records(self) -> Vec<RawRecord> {
        self.records
    }

    /// Describes where this set was loaded from.
    pub fn source(&self) -> &RecordSource {
        &self.source
    }

    /// Number of loaded records.
    pub fn len(&self) -> usize {
        self.records.len()
    }

    /// Returns `true` when no records were loaded.
    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }
}

/// Flattens a parsed value into raw records.
///
/// Accepts a single object or an array of objects; anything else is an
/// [`RecordsError::InvalidRecord`].
fn collect_records(
    path: &Path,
    value: serde_json::Value,
    records: &mut Vec<RawRecord>,
) -> Result<()> {
    let invalid = |detail: &str| RecordsError::InvalidRecord {
        path: path.display().to_string(),
        detail: detail.to_string(),
    };

    match value {
        serde_json::Value::Object(map) => {
            records.push(map);
            Ok(())
        }
        serde_json::Value::Array(items) => {
            for item in items {
                match item {
                    serde_json::Value::Object(map) => records.push(map),
                    _ => return Err(invalid("expected an array of objects")),
                }
            }
            Ok(())
        }
        _ => Err(invalid("expected an object or an array of objects")),
    }
}

/// Fallback-chain builder for [`RecordSet`].
///
/// Sources are tried in the order they were added; the first one that loads
/// successfully wins. [`build`](Self::build) fails with
/// [`RecordsError::NoSourcesAvailable`] when every source fails or none were
/// configured.
///
/// # Examples
///
/// ```no_run
/// use entity_schema_records::RecordSet;
///
/// let set = RecordSet::builder()
///     .from_dir("fixtures/missing/")
///     .from_bundle("people.json")
///     .build()
///     .unwrap();
/// ```
#[derive(Debug, Default)]
pub struct RecordSetBuilder {
    sources: Vec<BuilderSource>,
}

#[derive(Debug)]
enum BuilderSource {
    Directory(PathBuf),
    Bundle(PathBuf),
    YamlBundle(PathBuf),
}

impl RecordSetBuilder {
    /// Creates an empty builder.
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds a JSON directory source to the chain.
    pub fn from_dir(mut self, path: impl AsRef<Path>) -> Self {
        self.sources
            .push(BuilderSource::Directory(path.as_ref().to_path_buf()));
        self
    }

    /// Adds a JSON bundle source to the chain.
    pub fn from_bundle(mut self, path: impl AsRef<Path>) -> Self {
        self.sources
            .push(BuilderSource::Bundle(path.as_ref().to_path_buf()));
        self
    }

    /// Adds a YAML bundle source to the chain.
    pub fn from_yaml_bundle(mut self, path: impl AsRef<Path>) -> Self {
        self.sources
            .push(BuilderSource::YamlBundle(path.as_ref().to_path_buf()));
        self
    }

    /// Tries each source in order and returns the first successful load.
    ///
    /// # Errors
    ///
    /// Returns [`RecordsError::NoSourcesAvailable`] when no source loads.
    pub fn build(self) -> Result<RecordSet> {
        for source in &self.sources {
            let loaded = match source {
                BuilderSource::Directory(path) => RecordSet::from_dir(path),
                BuilderSource::Bundle(path) => RecordSet::from_bundle(path),
                BuilderSource::YamlBundle(path) => RecordSet::from_yaml_bundle(path),
            };
            if let Ok(set) = loaded {
                return Ok(set);
            }
        }
        Err(RecordsError::NoSourcesAvailable)
    }
}
