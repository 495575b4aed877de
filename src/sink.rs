//! Durable storage handoff for canonical records.
//!
//! The normalizer has no opinion on storage beyond requiring the record
//! sequence to be fully materialized before handoff; [`Sink`] is the seam
//! where downstream storage plugs in.

use async_trait::async_trait;
use std::path::Path;
use thiserror::Error;
use tracing::info;

use crate::model::CanonicalRecord;

#[derive(Error, Debug)]
pub enum SinkError {
    #[error("Failed to serialize records: {0}")]
    Serialize(#[from] serde_json::Error),
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Hands a materialized record sequence to durable storage.
#[async_trait]
pub trait Sink: Send + Sync {
    async fn save(&self, records: &[CanonicalRecord], destination: &Path)
        -> Result<(), SinkError>;
}

/// Writes records as a pretty-printed JSON array, creating parent
/// directories as needed.
pub struct JsonFileSink;

#[async_trait]
impl Sink for JsonFileSink {
    async fn save(
        &self,
        records: &[CanonicalRecord],
        destination: &Path,
    ) -> Result<(), SinkError> {
        if let Some(parent) = destination.parent() {
            tokio::fs::create_dir_all(parent).await?;
        }

        let body = serde_json::to_vec_pretty(records)?;
        tokio::fs::write(destination, body).await?;

        info!(
            records = records.len(),
            destination = %destination.display(),
            "Saved normalized records"
        );
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::Severity;
    use chrono::Utc;
    use serde_json::json;

    fn sample_record() -> CanonicalRecord {
        CanonicalRecord {
            id: "12345".to_string(),
            title: Some("X".to_string()),
            description: None,
            severity: Severity::High,
            cvss_score: Some(9.8),
            cve: vec!["CVE-2020-1".to_string()],
            solution: None,
            references: Vec::new(),
            affected_hosts: vec![Some("10.0.0.1".to_string())],
            scanner: "nessus".to_string(),
            scan_date: Utc::now(),
            raw_data: json!({"plugin_id": "12345", "severity": "High"}),
        }
    }

    #[tokio::test]
    async fn test_save_round_trips_every_field() {
        let dir = tempfile::tempdir().unwrap();
        let destination = dir.path().join("out").join("normalized.json");
        let records = vec![sample_record()];

        JsonFileSink.save(&records, &destination).await.unwrap();

        let body = tokio::fs::read(&destination).await.unwrap();
        let parsed: Vec<CanonicalRecord> = serde_json::from_slice(&body).unwrap();
        assert_eq!(parsed, records);
    }

    #[tokio::test]
    async fn test_save_empty_batch_writes_empty_array() {
        let dir = tempfile::tempdir().unwrap();
        let destination = dir.path().join("empty.json");

        JsonFileSink.save(&[], &destination).await.unwrap();

        let body = tokio::fs::read_to_string(&destination).await.unwrap();
        assert_eq!(body.trim(), "[]");
    }
}
