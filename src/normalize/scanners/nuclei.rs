//! Nuclei payload adapter.
//!
//! Nuclei emits a list of finding entries (one JSON object per template
//! match); each entry maps 1:1 to one canonical record. Most descriptive
//! fields live under the nested `info` object, CVE identifiers under
//! `info.classification`.

use chrono::{DateTime, Utc};
use serde_json::Value;
use tracing::warn;

use super::{opt_id, opt_str, str_list};
use crate::model::CanonicalRecord;
use crate::normalize::cvss;
use crate::normalize::traits::{NormalizeContext, RecordError, ScannerAdapter};

/// Adapter for Nuclei JSON output.
///
/// Per-field defaults: optional text fields absent when missing;
/// `affected_hosts` is always a single-element list built from the entry's
/// `host` field, a null marker when the host is absent; `scan_date` is the
/// entry's RFC 3339 `timestamp` or the ingestion time when missing or
/// unparseable.
pub struct NucleiAdapter;

impl ScannerAdapter for NucleiAdapter {
    fn scanner_id(&self) -> &'static str {
        "nuclei"
    }

    fn findings<'a>(&self, payload: &'a Value) -> Vec<&'a Value> {
        match payload.as_array() {
            Some(entries) => entries.iter().collect(),
            None => {
                warn!(
                    scanner = "nuclei",
                    "Payload is not a finding array, producing empty batch"
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

        let id = opt_id(obj.get("template-id")).ok_or(RecordError::MissingId("template-id"))?;

        // `info` may be missing entirely; every field under it then takes
        // its documented default.
        let info = obj.get("info").unwrap_or(&Value::Null);
        let severity = opt_str(info.get("severity"));

        let scan_date = opt_str(obj.get("timestamp"))
            .and_then(|ts| DateTime::parse_from_rfc3339(&ts).ok())
            .map(|ts| ts.with_timezone(&Utc))
            .unwrap_or_else(|| ctx.ingested_at());

        Ok(CanonicalRecord {
            id,
            title: opt_str(info.get("name")),
            description: opt_str(info.get("description")),
            severity: ctx.resolve_severity(severity.as_deref(), self.scanner_id()),
            cvss_score: cvss::extract_supplied(finding, self.scanner_id()),
            cve: str_list(info.pointer("/classification/cve-id")),
            solution: opt_str(info.get("remediation")),
            references: str_list(info.get("reference")),
            affected_hosts: vec![opt_str(obj.get("host"))],
            scanner: self.scanner_id().to_string(),
            scan_date,
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
  nuclei:
    critical: Critical
    medium: Medium
"#;
        let table = MappingTable::from_reader(mapping.as_bytes()).unwrap();
        NormalizeContext::new(SeverityMapper::new(Arc::new(table)))
    }

    #[test]
    fn test_findings_requires_array_payload() {
        assert_eq!(
            NucleiAdapter
                .findings(&json!([{"template-id": "a"}, {"template-id": "b"}]))
                .len(),
            2
        );
        assert!(NucleiAdapter.findings(&json!({"not": "a list"})).is_empty());
    }

    #[test]
    fn test_convert_full_finding() {
        let finding = json!({
            "template-id": "CVE-2021-44228",
            "info": {
                "name": "Apache Log4j RCE",
                "description": "JNDI lookup injection.",
                "severity": "critical",
                "classification": {
                    "cve-id": ["CVE-2021-44228"],
                    "cvss-metrics": "CVSS:3.1/AV:N/AC:L/PR:N/UI:N/S:C/C:H/I:H/A:H"
                },
                "remediation": "Update to log4j 2.17.0.",
                "reference": ["https://logging.apache.org/log4j/2.x/security.html"]
            },
            "host": "https://target.example",
            "timestamp": "2023-04-01T12:30:45.123456789+02:00"
        });

        let record = NucleiAdapter.convert(&finding, &ctx()).unwrap();

        assert_eq!(record.id, "CVE-2021-44228");
        assert_eq!(record.title.as_deref(), Some("Apache Log4j RCE"));
        assert_eq!(record.severity, Severity::Critical);
        assert_eq!(record.cvss_score, Some(10.0));
        assert_eq!(record.cve, vec!["CVE-2021-44228".to_string()]);
        assert_eq!(
            record.affected_hosts,
            vec![Some("https://target.example".to_string())]
        );
        assert_eq!(record.scanner, "nuclei");
        assert_eq!(
            record.scan_date,
            DateTime::parse_from_rfc3339("2023-04-01T12:30:45.123456789+02:00")
                .unwrap()
                .with_timezone(&Utc)
        );
        assert_eq!(record.raw_data, finding);
    }

    #[test]
    fn test_convert_missing_host_yields_null_marker() {
        let finding = json!({"template-id": "tls-version"});
        let record = NucleiAdapter.convert(&finding, &ctx()).unwrap();
        assert_eq!(record.affected_hosts, vec![None]);
    }

    #[test]
    fn test_convert_minimal_finding_uses_defaults() {
        let finding = json!({"template-id": "dns-misconfig"});
        let ctx = ctx();
        let record = NucleiAdapter.convert(&finding, &ctx).unwrap();

        assert_eq!(record.id, "dns-misconfig");
        assert_eq!(record.title, None);
        assert_eq!(record.severity, Severity::Unknown);
        assert_eq!(record.cvss_score, None);
        assert!(record.cve.is_empty());
        assert!(record.references.is_empty());
        assert_eq!(record.scan_date, ctx.ingested_at());
    }

    #[test]
    fn test_convert_bad_timestamp_falls_back_to_ingestion() {
        let finding = json!({"template-id": "x", "timestamp": "yesterday-ish"});
        let ctx = ctx();
        let record = NucleiAdapter.convert(&finding, &ctx).unwrap();
        assert_eq!(record.scan_date, ctx.ingested_at());
    }

    #[test]
    fn test_convert_single_string_reference() {
        let finding = json!({
            "template-id": "x",
            "info": {"reference": "https://example.com/advisory"}
        });
        let record = NucleiAdapter.convert(&finding, &ctx()).unwrap();
        assert_eq!(
            record.references,
            vec!["https://example.com/advisory".to_string()]
        );
    }

    #[test]
    fn test_convert_rejects_missing_template_id() {
        assert!(matches!(
            NucleiAdapter.convert(&json!({"info": {}}), &ctx()),
            Err(RecordError::MissingId("template-id"))
        ));
    }
}
