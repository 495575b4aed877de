//! Normalization module - scanner-agnostic finding conversion.
//!
//! This module provides the core abstractions of the normalizer:
//! - **Traits**: [`ScannerAdapter`] for per-scanner payload conversion
//! - **Severity**: config-loaded vocabulary mapping via [`MappingTable`]
//! - **CVSS**: score extraction and v3.1 vector scoring via [`cvss`]
//! - **Engine**: dispatch and batch orchestration via [`NormalizationEngine`]

pub mod cvss;
pub mod engine;
pub mod scanners;
pub mod severity;
pub mod traits;

// Re-export commonly used types
pub use cvss::{CvssParseError, CvssVector};
pub use engine::{NormalizationEngine, NormalizeError};
pub use scanners::{NessusAdapter, NucleiAdapter};
pub use severity::{MappingError, MappingTable, SeverityMapper};
pub use traits::{NormalizeContext, RecordError, ScannerAdapter};
