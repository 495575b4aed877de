//! CVSS base-score extraction.
//!
//! Scanners encode scores in two ways: a directly supplied numeric base
//! score, or a CVSS v3.x metric-vector string. This module probes the
//! scanner-specific locations for both encodings and, for vectors, computes
//! the base score with the published CVSS v3.1 formula.
//!
//! Extraction never fails: a missing, malformed, or unsupported encoding
//! degrades to `0.0` so that score problems can never abort record
//! construction.

use serde_json::Value;
use std::str::FromStr;
use thiserror::Error;

// ============================================================================
// Extraction entry points
// ============================================================================

/// Derives a CVSS base score from a finding, always in `[0.0, 10.0]`.
///
/// Probe order per scanner tag:
/// - `"nessus"`: `cvss3_base_score`, then `cvss_base_score` (number or
///   numeric string), then the `cvss3_vector`/`cvss_vector` strings.
/// - `"nuclei"`: `info.classification.cvss-score`, then
///   `info.classification.cvss-metrics`.
///
/// Unknown scanner tags and findings without any usable encoding yield
/// `0.0`.
pub fn extract(finding: &Value, scanner: &str) -> f64 {
    extract_supplied(finding, scanner).unwrap_or(0.0)
}

/// Like [`extract`], but distinguishes "scanner supplied nothing" (`None`)
/// from "scanner supplied something unusable" (`Some(0.0)`).
///
/// Adapters use this to fill the canonical record's optional score field.
pub fn extract_supplied(finding: &Value, scanner: &str) -> Option<f64> {
    let direct = direct_candidate(finding, scanner);
    let vector = vector_candidate(finding, scanner);

    if direct.is_none() && vector.is_none() {
        return None;
    }

    if let Some(score) = direct.and_then(as_base_score) {
        return Some(score);
    }

    Some(
        vector
            .and_then(Value::as_str)
            .and_then(|v| v.parse::<CvssVector>().ok())
            .map(|v| v.score())
            .unwrap_or(0.0),
    )
}

/// Location of a directly supplied numeric score, if the scanner has one.
fn direct_candidate<'a>(finding: &'a Value, scanner: &str) -> Option<&'a Value> {
    let candidate = match scanner {
        "nessus" => finding
            .get("cvss3_base_score")
            .or_else(|| finding.get("cvss_base_score")),
        "nuclei" => finding.pointer("/info/classification/cvss-score"),
        _ => None,
    };
    candidate.filter(|v| !v.is_null())
}

/// Location of a metric-vector string, if the scanner has one.
fn vector_candidate<'a>(finding: &'a Value, scanner: &str) -> Option<&'a Value> {
    let candidate = match scanner {
        "nessus" => finding
            .get("cvss3_vector")
            .or_else(|| finding.get("cvss_vector")),
        "nuclei" => finding.pointer("/info/classification/cvss-metrics"),
        _ => None,
    };
    candidate.filter(|v| !v.is_null())
}

/// Reads a number or numeric string, validating the CVSS range.
fn as_base_score(value: &Value) -> Option<f64> {
    let score = match value {
        Value::Number(n) => n.as_f64()?,
        Value::String(s) => s.trim().parse::<f64>().ok()?,
        _ => return None,
    };
    (score.is_finite() && (0.0..=10.0).contains(&score)).then_some(score)
}

// ============================================================================
// CVSS v3.1 vector scoring
// ============================================================================

/// A vector string was not a well-formed CVSS v3.x base vector.
#[derive(Error, Debug)]
pub enum CvssParseError {
    /// Vector lacks the `CVSS:3.x` prefix (v2 vectors land here)
    #[error("Not a CVSS v3 vector: '{0}'")]
    UnsupportedVersion(String),

    /// A metric group is not `KEY:VALUE` shaped
    #[error("Malformed metric group: '{0}'")]
    MalformedMetric(String),

    /// A base metric has an unrecognized value
    #[error("Invalid value '{value}' for metric '{metric}'")]
    InvalidValue { metric: &'static str, value: String },

    /// A mandatory base metric is absent
    #[error("Missing base metric '{0}'")]
    MissingMetric(&'static str),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AttackVector {
    Network,
    Adjacent,
    Local,
    Physical,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AttackComplexity {
    Low,
    High,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PrivilegesRequired {
    None,
    Low,
    High,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UserInteraction {
    None,
    Required,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Scope {
    Unchanged,
    Changed,
}

/// Impact sub-metric value, shared by confidentiality/integrity/availability.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Impact {
    None,
    Low,
    High,
}

impl AttackVector {
    fn weight(self) -> f64 {
        match self {
            AttackVector::Network => 0.85,
            AttackVector::Adjacent => 0.62,
            AttackVector::Local => 0.55,
            AttackVector::Physical => 0.2,
        }
    }
}

impl AttackComplexity {
    fn weight(self) -> f64 {
        match self {
            AttackComplexity::Low => 0.77,
            AttackComplexity::High => 0.44,
        }
    }
}

impl PrivilegesRequired {
    /// PR weight depends on whether the scope changes.
    fn weight(self, scope: Scope) -> f64 {
        match (self, scope) {
            (PrivilegesRequired::None, _) => 0.85,
            (PrivilegesRequired::Low, Scope::Unchanged) => 0.62,
            (PrivilegesRequired::Low, Scope::Changed) => 0.68,
            (PrivilegesRequired::High, Scope::Unchanged) => 0.27,
            (PrivilegesRequired::High, Scope::Changed) => 0.5,
        }
    }
}

impl UserInteraction {
    fn weight(self) -> f64 {
        match self {
            UserInteraction::None => 0.85,
            UserInteraction::Required => 0.62,
        }
    }
}

impl Impact {
    fn weight(self) -> f64 {
        match self {
            Impact::None => 0.0,
            Impact::Low => 0.22,
            Impact::High => 0.56,
        }
    }
}

/// Parsed CVSS v3.x base vector.
///
/// Accepts `CVSS:3.0` and `CVSS:3.1` prefixes, metric groups in any order,
/// and ignores non-base groups (temporal/environmental metrics may be
/// appended by scanners). When a base metric repeats, the last occurrence
/// wins.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CvssVector {
    pub attack_vector: AttackVector,
    pub attack_complexity: AttackComplexity,
    pub privileges_required: PrivilegesRequired,
    pub user_interaction: UserInteraction,
    pub scope: Scope,
    pub confidentiality: Impact,
    pub integrity: Impact,
    pub availability: Impact,
}

impl FromStr for CvssVector {
    type Err = CvssParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        let mut groups = s.split('/');

        match groups.next() {
            Some(prefix) if prefix == "CVSS:3.0" || prefix == "CVSS:3.1" => {}
            _ => return Err(CvssParseError::UnsupportedVersion(s.to_string())),
        }

        let mut av = None;
        let mut ac = None;
        let mut pr = None;
        let mut ui = None;
        let mut scope = None;
        let mut c = None;
        let mut i = None;
        let mut a = None;

        for group in groups {
            let (metric, value) = group
                .split_once(':')
                .ok_or_else(|| CvssParseError::MalformedMetric(group.to_string()))?;

            match metric {
                "AV" => {
                    av = Some(match value {
                        "N" => AttackVector::Network,
                        "A" => AttackVector::Adjacent,
                        "L" => AttackVector::Local,
                        "P" => AttackVector::Physical,
                        _ => {
                            return Err(CvssParseError::InvalidValue {
                                metric: "AV",
                                value: value.to_string(),
                            })
                        }
                    })
                }
                "AC" => {
                    ac = Some(match value {
                        "L" => AttackComplexity::Low,
                        "H" => AttackComplexity::High,
                        _ => {
                            return Err(CvssParseError::InvalidValue {
                                metric: "AC",
                                value: value.to_string(),
                            })
                        }
                    })
                }
                "PR" => {
                    pr = Some(match value {
                        "N" => PrivilegesRequired::None,
                        "L" => PrivilegesRequired::Low,
                        "H" => PrivilegesRequired::High,
                        _ => {
                            return Err(CvssParseError::InvalidValue {
                                metric: "PR",
                                value: value.to_string(),
                            })
                        }
                    })
                }
                "UI" => {
                    ui = Some(match value {
                        "N" => UserInteraction::None,
                        "R" => UserInteraction::Required,
                        _ => {
                            return Err(CvssParseError::InvalidValue {
                                metric: "UI",
                                value: value.to_string(),
                            })
                        }
                    })
                }
                "S" => {
                    scope = Some(match value {
                        "U" => Scope::Unchanged,
                        "C" => Scope::Changed,
                        _ => {
                            return Err(CvssParseError::InvalidValue {
                                metric: "S",
                                value: value.to_string(),
                            })
                        }
                    })
                }
                "C" | "I" | "A" => {
                    let name = match metric {
                        "C" => "C",
                        "I" => "I",
                        _ => "A",
                    };
                    let impact = match value {
                        "N" => Impact::None,
                        "L" => Impact::Low,
                        "H" => Impact::High,
                        _ => {
                            return Err(CvssParseError::InvalidValue {
                                metric: name,
                                value: value.to_string(),
                            })
                        }
                    };
                    match metric {
                        "C" => c = Some(impact),
                        "I" => i = Some(impact),
                        _ => a = Some(impact),
                    }
                }
                // Temporal/environmental groups are not part of the base score.
                _ => {}
            }
        }

        Ok(CvssVector {
            attack_vector: av.ok_or(CvssParseError::MissingMetric("AV"))?,
            attack_complexity: ac.ok_or(CvssParseError::MissingMetric("AC"))?,
            privileges_required: pr.ok_or(CvssParseError::MissingMetric("PR"))?,
            user_interaction: ui.ok_or(CvssParseError::MissingMetric("UI"))?,
            scope: scope.ok_or(CvssParseError::MissingMetric("S"))?,
            confidentiality: c.ok_or(CvssParseError::MissingMetric("C"))?,
            integrity: i.ok_or(CvssParseError::MissingMetric("I"))?,
            availability: a.ok_or(CvssParseError::MissingMetric("A"))?,
        })
    }
}

impl CvssVector {
    /// Computes the CVSS v3.1 base score per the published formula.
    ///
    /// Matches the official vector→score reference pairs exactly, including
    /// the scope-changed 1.08 multiplier and the "round up" rule.
    pub fn score(&self) -> f64 {
        let iss = 1.0
            - (1.0 - self.confidentiality.weight())
                * (1.0 - self.integrity.weight())
                * (1.0 - self.availability.weight());

        let impact = match self.scope {
            Scope::Unchanged => 6.42 * iss,
            Scope::Changed => 7.52 * (iss - 0.029) - 3.25 * (iss - 0.02).powi(15),
        };

        if impact <= 0.0 {
            return 0.0;
        }

        let exploitability = 8.22
            * self.attack_vector.weight()
            * self.attack_complexity.weight()
            * self.privileges_required.weight(self.scope)
            * self.user_interaction.weight();

        match self.scope {
            Scope::Unchanged => round_up((impact + exploitability).min(10.0)),
            Scope::Changed => round_up((1.08 * (impact + exploitability)).min(10.0)),
        }
    }
}

/// CVSS v3.1 "round up to one decimal" rule.
///
/// Integer-arithmetic variant from the specification appendix, which avoids
/// the floating-point artifacts of naively computing `ceil(x * 10) / 10`.
fn round_up(input: f64) -> f64 {
    let int_input = (input * 100_000.0).round() as i64;
    if int_input % 10_000 == 0 {
        int_input as f64 / 100_000.0
    } else {
        (int_input / 10_000 + 1) as f64 / 10.0
    }
}
