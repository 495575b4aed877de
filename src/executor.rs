use crate::model::CanonicalRecord;
use crate::normalize::{NormalizationEngine, NormalizeError};
use serde_json::Value;
use std::sync::Arc;
use tokio::sync::Semaphore;
use tracing::{info, instrument};

/// Concurrency-limited driver for normalization passes.
///
/// The engine itself is synchronous and pure; this executor bounds how
/// many already-loaded payloads are normalized at once when callers fan
/// out over many scan files.
pub struct NormalizerExecutor {
    semaphore: Arc<Semaphore>,
}

impl NormalizerExecutor {
    pub fn new(concurrency_limit: usize) -> Self {
        Self {
            semaphore: Arc::new(Semaphore::new(concurrency_limit)),
        }
    }

    #[instrument(skip(self, engine, content))]
    pub async fn execute(
        &self,
        engine: Arc<NormalizationEngine>,
        content: Vec<u8>,
        scanner_type: &str,
    ) -> Result<Vec<CanonicalRecord>, NormalizeError> {
        let _permit = self
            .semaphore
            .acquire()
            .await
            .map_err(|e| NormalizeError::Unknown(format!("Semaphore error: {}", e)))?;

        info!("Starting normalization for scanner: {}", scanner_type);

        let payload: Value = serde_json::from_slice(&content)?;
        let result = engine.normalize(&payload, scanner_type);

        info!("Finished normalization for scanner: {}", scanner_type);
        result
    }
}
