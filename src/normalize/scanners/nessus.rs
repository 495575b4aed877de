//! Nessus payload adapter.
//!
//! Nessus exports an object holding a `vulnerabilities` array; each entry
//! maps 1:1 to one canonical record.

use serde_json::Value;
use tracing::warn;

use super::{opt_id, opt_label, opt_str, str_list};
use crate::model::CanonicalRecord;
use crate::normalize::cvss;
use crate::normalize::traits::{NormalizeContext, RecordError, ScannerAdapter};

/// Adapter for Nessus scan exports.
///
/// Per-field defaults: optional text fields absent when missing, `cve`,
/// `see_also`, and `hosts` empty when missing, `scan_date` always the
/// ingestion time (Nessus findings carry no per-finding timestamp).
pub struct NessusAdapter;

impl ScannerAdapter for NessusAdapter {
    fn scanner_id(&self) -> &'static str {
        "nessus"
    }

    fn findings<'a>(&self, payload: &'a Value) -> Vec<&'a Value> {
        match payload.get("vulnerabilities").and_then(Value::as_array) {
            Some(entries) => entries.iter().collect(),
            None => {
                warn!(
                    scanner = "nessus",
                    "Payload has no 'vulnerabilities' array, producing empty batch"
                );
                Vec::new()
            }
        }
    }

    fn convert(
        &self,
        finding: &Value,
        ctx: &NormalizeContext,
    ) -> Result<CanonicalRecord, RecordError> {
        let obj = finding.as_object().ok_or(RecordError::NotAnObject)?;

        let id = opt_id(obj.get("plugin_id")).ok_or(RecordError::MissingId("plugin_id"))?;
        let severity = opt_label(obj.get("severity"));

        // Hosts keep their source order; unresolvable entries stay as null
        // markers rather than being dropped.
        let affected_hosts = obj
            .get("hosts")
            .and_then(Value::as_array)
            .map(|hosts| hosts.iter().map(|h| opt_str(Some(h))).collect())
            .unwrap_or_default();

        Ok(CanonicalRecord {
            id,
            title: opt_str(obj.get("plugin_name")),
            description: opt_str(obj.get("description")),
            severity: ctx.resolve_severity(severity.as_deref(), self.scanner_id()),
            cvss_score: cvss::extract_supplied(finding, self.scanner_id()),
            cve: str_list(obj.get("cve")),
            solution: opt_str(obj.get("solution")),
            references: str_list(obj.get("see_also")),
            affected_hosts,
            scanner: self.scanner_id().to_string(),
            scan_date: ctx.ingested_at(),
            raw_data: finding.clone(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::Severity;
    use crate::normalize::severity::{MappingTable, SeverityMapper};
    use serde_json::json;
    use std::sync::Arc;

    fn ctx() -> NormalizeContext {
        let mapping = r#"
severity_mapping:
  nessus:
    "4": Critical
    high: High
"#;
        let table = MappingTable::from_reader(mapping.as_bytes()).unwrap();
        NormalizeContext::new(SeverityMapper::new(Arc::new(table)))
    }

    #[test]
    fn test_findings_reads_vulnerabilities_array() {
        let payload = json!({"vulnerabilities": [{"plugin_id": "1"}, {"plugin_id": "2"}]});
        assert_eq!(NessusAdapter.findings(&payload).len(), 2);
    }

    #[test]
    fn test_findings_tolerates_shape_mismatch() {
        assert!(NessusAdapter.findings(&json!({})).is_empty());
        assert!(NessusAdapter.findings(&json!([1, 2])).is_empty());
        assert!(NessusAdapter
            .findings(&json!({"vulnerabilities": "nope"}))
            .is_empty());
    }

    #[test]
    fn test_convert_full_finding() {
        let finding = json!({
            "plugin_id": "12345",
            "plugin_name": "OpenSSL Heartbeat Information Disclosure",
            "description": "A buffer over-read exists.",
            "severity": "High",
            "cvss_base_score": 7.5,
            "cve": ["CVE-2014-0160"],
            "solution": "Upgrade OpenSSL.",
            "see_also": ["https://heartbleed.com"],
            "hosts": ["10.0.0.5", null, "10.0.0.7"]
        });

        let ctx = ctx();
        let record = NessusAdapter.convert(&finding, &ctx).unwrap();

        assert_eq!(record.id, "12345");
        assert_eq!(
            record.title.as_deref(),
            Some("OpenSSL Heartbeat Information Disclosure")
        );
        assert_eq!(record.severity, Severity::High);
        assert_eq!(record.cvss_score, Some(7.5));
        assert_eq!(record.cve, vec!["CVE-2014-0160".to_string()]);
        assert_eq!(
            record.affected_hosts,
            vec![Some("10.0.0.5".to_string()), None, Some("10.0.0.7".to_string())]
        );
        assert_eq!(record.scanner, "nessus");
        assert_eq!(record.scan_date, ctx.ingested_at());
        assert_eq!(record.raw_data, finding);
    }

    #[test]
    fn test_convert_minimal_finding_uses_defaults() {
        let finding = json!({"plugin_id": 99});
        let record = NessusAdapter.convert(&finding, &ctx()).unwrap();

        assert_eq!(record.id, "99");
        assert_eq!(record.title, None);
        assert_eq!(record.description, None);
        assert_eq!(record.severity, Severity::Unknown);
        assert_eq!(record.cvss_score, None);
        assert!(record.cve.is_empty());
        assert_eq!(record.solution, None);
        assert!(record.references.is_empty());
        assert!(record.affected_hosts.is_empty());
    }

    #[test]
    fn test_convert_numeric_severity_code() {
        let finding = json!({"plugin_id": "1", "severity": 4});
        let record = NessusAdapter.convert(&finding, &ctx()).unwrap();
        assert_eq!(record.severity, Severity::Critical);
    }

    #[test]
    fn test_convert_rejects_unidentifiable_findings() {
        assert!(matches!(
            NessusAdapter.convert(&json!("not an object"), &ctx()),
            Err(RecordError::NotAnObject)
        ));
        assert!(matches!(
            NessusAdapter.convert(&json!({"plugin_name": "X"}), &ctx()),
            Err(RecordError::MissingId("plugin_id"))
        ));
    }
}
