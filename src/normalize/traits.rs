//! Core traits and types for the scanner adapter system.
//!
//! This module defines the extension seam of the normalizer:
//! - Per-scanner conversion via [`ScannerAdapter`]
//! - Shared per-call state via [`NormalizeContext`]
//! - Record-level error handling via [`RecordError`]

use chrono::{DateTime, Utc};
use serde_json::Value;
use thiserror::Error;

use crate::model::{CanonicalRecord, Severity};
use crate::normalize::severity::SeverityMapper;

// ============================================================================
// Adapter Trait
// ============================================================================

/// Abstraction over scanner-native payload shapes (Nessus, Nuclei, etc).
///
/// Each supported scanner implements this trait to provide:
/// - Payload splitting into per-finding slices
/// - Per-finding conversion into [`CanonicalRecord`]
///
/// New scanner types are onboarded by implementing this contract and
/// registering the adapter with the engine under its scanner tag; the
/// engine, mapper, and extractor need no changes.
///
/// # Thread Safety
///
/// Implementations must be `Send + Sync` and hold no mutable state, so
/// normalization calls can run concurrently without coordination.
pub trait ScannerAdapter: Send + Sync {
    /// Returns the unique tag for this scanner.
    ///
    /// Examples: `"nessus"`, `"nuclei"`
    ///
    /// Used as the registry key, the severity-mapping scope, and the
    /// `scanner` field of every record this adapter produces.
    fn scanner_id(&self) -> &'static str;

    /// Splits the scanner-native payload into individual finding slices.
    ///
    /// A payload whose shape does not match this scanner (e.g. a missing
    /// findings array) yields an empty batch rather than an error; the
    /// mismatch is logged by the implementation.
    fn findings<'a>(&self, payload: &'a Value) -> Vec<&'a Value>;

    /// Converts one finding into a canonical record.
    ///
    /// Absent optional fields degrade to documented defaults rather than
    /// failing the record; only findings that cannot identify themselves
    /// (non-object entries, missing identifier) are rejected.
    ///
    /// # Errors
    ///
    /// Returns [`RecordError`] for an un-convertible finding. The engine
    /// drops that single record and continues with the rest of the batch.
    fn convert(
        &self,
        finding: &Value,
        ctx: &NormalizeContext,
    ) -> Result<CanonicalRecord, RecordError>;
}

// ============================================================================
// Per-call Context
// ============================================================================

/// Shared state for one normalization pass.
///
/// Carries the severity mapper and the ingestion timestamp that adapters
/// use as the `scan_date` fallback when the scanner supplies none. One
/// context is created per `normalize` call; it is never shared across
/// calls.
#[derive(Debug, Clone)]
pub struct NormalizeContext {
    mapper: SeverityMapper,
    ingested_at: DateTime<Utc>,
}

impl NormalizeContext {
    pub fn new(mapper: SeverityMapper) -> Self {
        Self {
            mapper,
            ingested_at: Utc::now(),
        }
    }

    /// Resolves a raw severity label through the mapping table.
    pub fn resolve_severity(&self, raw: Option<&str>, scanner: &str) -> Severity {
        self.mapper.resolve(raw, scanner)
    }

    /// Ingestion timestamp used when the scanner supplies no scan date.
    pub fn ingested_at(&self) -> DateTime<Utc> {
        self.ingested_at
    }
}

// ============================================================================
// Record-level Errors
// ============================================================================

/// A single finding could not be converted into a canonical record.
///
/// These errors never cross the engine boundary: the offending record is
/// dropped and logged, and the batch continues.
#[derive(Error, Debug)]
pub enum RecordError {
    /// Finding entry is not a JSON object
    #[error("Finding is not a JSON object")]
    NotAnObject,

    /// Finding carries no usable identifier
    #[error("Finding is missing required identifier field '{0}'")]
    MissingId(&'static str),
}
