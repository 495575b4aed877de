//! Configurable severity-vocabulary mapping.
//!
//! Each scanner speaks its own severity dialect (Nessus emits numeric codes,
//! Nuclei emits lowercase words). The [`MappingTable`] translates those
//! dialects into canonical [`Severity`] labels and is the sole extensibility
//! point for onboarding a new scanner's vocabulary without code changes.

use crate::model::{ParseSeverityError, Severity};
use serde::Deserialize;
use std::collections::HashMap;
use std::fs::File;
use std::io::Read;
use std::path::Path;
use std::sync::Arc;
use thiserror::Error;

/// Errors that can occur while loading a mapping table.
#[derive(Error, Debug)]
pub enum MappingError {
    /// Mapping file could not be opened or read
    #[error("Failed to read mapping file: {0}")]
    Io(#[from] std::io::Error),

    /// Mapping file is not valid YAML
    #[error("Failed to parse mapping file: {0}")]
    Yaml(#[from] serde_yaml::Error),

    /// A mapping value is not a canonical severity label
    #[error("Invalid canonical label for ('{scanner}', '{raw}'): {source}")]
    InvalidLabel {
        scanner: String,
        raw: String,
        #[source]
        source: ParseSeverityError,
    },
}

/// On-disk shape of the mapping document:
///
/// ```yaml
/// severity_mapping:
///   nessus:
///     "4": Critical
///   nuclei:
///     critical: Critical
/// ```
#[derive(Debug, Deserialize)]
struct MappingFile {
    #[serde(default)]
    severity_mapping: HashMap<String, HashMap<String, String>>,
}

/// Immutable scanner-scoped severity vocabulary.
///
/// Loaded once at startup and shared read-only for the process lifetime,
/// so concurrent normalization calls need no coordination. Raw labels are
/// lowercased at load time; lookups are case-insensitive.
#[derive(Debug, Default)]
pub struct MappingTable {
    entries: HashMap<String, HashMap<String, Severity>>,
}

impl MappingTable {
    /// Loads a mapping table from a YAML file.
    ///
    /// # Errors
    ///
    /// Returns [`MappingError`] if the file cannot be read, is not valid
    /// YAML, or maps a raw label to an unrecognized canonical severity.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, MappingError> {
        let file = File::open(path)?;
        Self::from_reader(file)
    }

    /// Parses a mapping table from any reader producing the YAML document.
    pub fn from_reader<R: Read>(reader: R) -> Result<Self, MappingError> {
        let raw: MappingFile = serde_yaml::from_reader(reader)?;

        let mut entries = HashMap::with_capacity(raw.severity_mapping.len());
        for (scanner, labels) in raw.severity_mapping {
            let mut scoped = HashMap::with_capacity(labels.len());
            for (raw_label, canonical) in labels {
                let severity: Severity =
                    canonical
                        .parse()
                        .map_err(|source| MappingError::InvalidLabel {
                            scanner: scanner.clone(),
                            raw: raw_label.clone(),
                            source,
                        })?;
                scoped.insert(raw_label.to_ascii_lowercase(), severity);
            }
            entries.insert(scanner, scoped);
        }

        Ok(Self { entries })
    }

    /// Looks up a raw label within a scanner's scope, case-insensitively.
    pub fn get(&self, scanner: &str, raw: &str) -> Option<Severity> {
        self.entries
            .get(scanner)?
            .get(&raw.to_ascii_lowercase())
            .copied()
    }
}

/// Resolves raw scanner severity labels against a shared [`MappingTable`].
///
/// Cheap to clone; clones share the same immutable table.
#[derive(Debug, Clone)]
pub struct SeverityMapper {
    table: Arc<MappingTable>,
}

impl SeverityMapper {
    pub fn new(table: Arc<MappingTable>) -> Self {
        Self { table }
    }

    /// Resolves a raw severity label for the given scanner tag.
    ///
    /// Never fails: an absent label, an unknown scanner scope, or a label
    /// with no mapping entry all resolve to [`Severity::Unknown`].
    pub fn resolve(&self, raw: Option<&str>, scanner: &str) -> Severity {
        match raw {
            Some(label) => self.table.get(scanner, label).unwrap_or_default(),
            None => Severity::Unknown,
        }
    }
}
