use serde_json::Value;
use std::sync::Arc;

use super::error::DetectionError;
use super::models::{DetectionJob, DetectionResult, ProviderStatus};
use super::provider::ContentDetectionApi;

/// One-shot image check; the provider payload is kept as-is in `raw`.
#[derive(Clone)]
pub struct ImageDetector {
    api: Arc<dyn ContentDetectionApi>,
}

impl ImageDetector {
    pub fn new(api: Arc<dyn ContentDetectionApi>) -> Self {
        Self { api }
    }

    pub async fn detect(&self, job: &DetectionJob) -> Result<DetectionResult, DetectionError> {
        let payload = self.api.check_image(&job.source).await?;
        let score = ai_generated_score(&payload).unwrap_or_else(|| {
            log::warn!(
                "Job {}: {} response has no type.ai_generated score, defaulting to 0: {}",
                job.job_id,
                self.api.name(),
                payload
            );
            0.0
        });

        Ok(match ProviderStatus::of_image(&payload) {
            ProviderStatus::Failure => {
                log::info!("Job {}: {} reported failure", job.job_id, self.api.name());
                DetectionResult::failed(payload, Some(score))
            }
            _ => DetectionResult::finished(payload, Some(score)),
        })
    }
}

pub(crate) fn ai_generated_score(payload: &Value) -> Option<f64> {
    payload.pointer("/type/ai_generated").and_then(Value::as_f64)
}
