//! Normalization engine.
//!
//! The engine owns the adapter registry and orchestrates one normalization
//! pass: dispatch on the declared scanner type, split the payload, convert
//! each finding, and isolate per-record failures so one malformed finding
//! never aborts the batch.

use serde_json::Value;
use std::collections::HashMap;
use std::sync::Arc;
use thiserror::Error;
use tracing::{debug, warn};

use crate::model::CanonicalRecord;
use crate::normalize::scanners::{NessusAdapter, NucleiAdapter};
use crate::normalize::severity::{MappingTable, SeverityMapper};
use crate::normalize::traits::{NormalizeContext, ScannerAdapter};

/// Fatal, dispatch-level normalization errors.
///
/// These abort the call before any record is produced; record-level
/// failures never surface here (they are dropped and logged instead).
#[derive(Error, Debug)]
pub enum NormalizeError {
    /// No adapter is registered for the declared scanner type
    #[error("Scanner type '{0}' is not supported")]
    UnsupportedScanner(String),

    /// Raw payload bytes are not valid JSON
    #[error("Failed to parse payload: {0}")]
    InvalidPayload(#[from] serde_json::Error),

    /// Infrastructure failure outside the normalization pass itself
    #[error("Unknown error: {0}")]
    Unknown(String),
}

/// Dispatches payloads to scanner adapters and aggregates their records.
///
/// The registry is built at construction time, so unsupported scanner
/// types are rejected before any adapter executes. Each `normalize` call
/// is a pure function of the payload and the immutable mapping table:
/// the engine holds no mutable state and calls may run concurrently
/// without coordination.
pub struct NormalizationEngine {
    adapters: HashMap<&'static str, Box<dyn ScannerAdapter>>,
    mapper: SeverityMapper,
}

impl NormalizationEngine {
    /// Creates an engine with the built-in adapters (Nessus, Nuclei)
    /// resolving severities against the given mapping table.
    pub fn new(table: Arc<MappingTable>) -> Self {
        let engine = Self {
            adapters: HashMap::new(),
            mapper: SeverityMapper::new(table),
        };
        engine
            .with_adapter(Box::new(NessusAdapter))
            .with_adapter(Box::new(NucleiAdapter))
    }

    /// Registers an adapter under its scanner tag.
    ///
    /// Later registrations replace earlier ones for the same tag, so a
    /// built-in adapter can be overridden.
    pub fn with_adapter(mut self, adapter: Box<dyn ScannerAdapter>) -> Self {
        self.adapters.insert(adapter.scanner_id(), adapter);
        self
    }

    /// Tags this engine can dispatch, in no particular order.
    pub fn supported_scanners(&self) -> Vec<&'static str> {
        self.adapters.keys().copied().collect()
    }

    /// Normalizes a scanner payload into canonical records.
    ///
    /// # Errors
    ///
    /// Returns [`NormalizeError::UnsupportedScanner`] when no adapter is
    /// registered for `scanner_type`; no output is produced in that case.
    /// A finding the adapter cannot convert is dropped with a warning and
    /// the remaining entries are still processed, so callers may receive
    /// fewer records than the payload had findings.
    pub fn normalize(
        &self,
        payload: &Value,
        scanner_type: &str,
    ) -> Result<Vec<CanonicalRecord>, NormalizeError> {
        let adapter = self
            .adapters
            .get(scanner_type)
            .ok_or_else(|| NormalizeError::UnsupportedScanner(scanner_type.to_string()))?;

        let ctx = NormalizeContext::new(self.mapper.clone());
        let findings = adapter.findings(payload);

        let mut records = Vec::with_capacity(findings.len());
        for (index, finding) in findings.into_iter().enumerate() {
            match adapter.convert(finding, &ctx) {
                Ok(record) => records.push(record),
                Err(error) => {
                    warn!(
                        scanner = scanner_type,
                        index,
                        %error,
                        "Dropping malformed finding"
                    );
                }
            }
        }

        debug!(
            scanner = scanner_type,
            records = records.len(),
            "Normalization pass complete"
        );
        Ok(records)
    }
}
