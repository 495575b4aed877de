//! Canonical record model shared by all scanner adapters.
//!
//! Every supported scanner normalizes into [`CanonicalRecord`], the single
//! shape consumed by storage, scoring, and model training downstream.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::str::FromStr;
use thiserror::Error;

/// Canonical severity label.
///
/// Scanners use wildly different vocabularies ("4", "crit", "Important");
/// the mapping table resolves all of them into this enum. `Unknown` is the
/// default and the fallback for any label the table does not cover.
///
/// Ordering is by impact, so `Critical` compares greatest.
#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
pub enum Severity {
    #[default]
    Unknown,
    Info,
    Low,
    Medium,
    High,
    Critical,
}

impl Severity {
    /// Buckets a CVSS v3.x base score per the qualitative rating scale.
    ///
    /// Not used during record construction (the mapping table is
    /// authoritative for scanner labels); exposed for downstream scoring
    /// consumers that only have a number.
    pub fn from_cvss(score: f64) -> Self {
        match score {
            s if s >= 9.0 => Severity::Critical,
            s if s >= 7.0 => Severity::High,
            s if s >= 4.0 => Severity::Medium,
            s if s >= 0.1 => Severity::Low,
            _ => Severity::Info,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Severity::Unknown => "Unknown",
            Severity::Info => "Info",
            Severity::Low => "Low",
            Severity::Medium => "Medium",
            Severity::High => "High",
            Severity::Critical => "Critical",
        }
    }
}

impl std::fmt::Display for Severity {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Label did not match any canonical severity.
#[derive(Debug, Error)]
#[error("unrecognized canonical severity label: '{0}'")]
pub struct ParseSeverityError(pub String);

impl FromStr for Severity {
    type Err = ParseSeverityError;

    /// Case-insensitive parse of a canonical label ("critical", "HIGH", ...).
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "unknown" => Ok(Severity::Unknown),
            "info" => Ok(Severity::Info),
            "low" => Ok(Severity::Low),
            "medium" => Ok(Severity::Medium),
            "high" => Ok(Severity::High),
            "critical" => Ok(Severity::Critical),
            _ => Err(ParseSeverityError(s.to_string())),
        }
    }
}

/// Normalized representation of one vulnerability finding.
///
/// One record is produced per source finding, once per normalization pass.
/// Records carry no mutating API: corrections happen by re-running
/// normalization on corrected input, never by editing a record.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CanonicalRecord {
    /// Source-scanner identifier, opaque (plugin id, template id, ...)
    pub id: String,

    /// Human-readable finding title
    pub title: Option<String>,

    /// Finding description as supplied by the scanner
    pub description: Option<String>,

    /// Canonical severity; defaults to `Unknown`, never absent
    pub severity: Severity,

    /// CVSS base score in [0.0, 10.0].
    ///
    /// `None` only when the scanner supplied no score encoding at all;
    /// a present-but-unparseable encoding degrades to `Some(0.0)`.
    pub cvss_score: Option<f64>,

    /// CVE identifiers, in source order, no dedup beyond source
    pub cve: Vec<String>,

    /// Remediation text
    pub solution: Option<String>,

    /// Reference URLs, order preserved
    pub references: Vec<String>,

    /// Affected hosts. Entries may be null markers when the scanner
    /// reported a finding without a resolvable host.
    pub affected_hosts: Vec<Option<String>>,

    /// Tag of the adapter that produced this record ("nessus", "nuclei")
    pub scanner: String,

    /// Scanner-supplied timestamp, or ingestion time when absent
    pub scan_date: DateTime<Utc>,

    /// Original per-finding payload, verbatim and never summarized
    pub raw_data: serde_json::Value,
}
