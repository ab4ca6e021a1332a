use serde_json::Value;
use shared::AudioVerdict;
use std::sync::Arc;

use super::error::DetectionError;
use super::models::{DetectionJob, DetectionResult};
use super::provider::AudioDetectionApi;

#[derive(Clone)]
pub struct AudioDetector {
    api: Arc<dyn AudioDetectionApi>,
}

impl AudioDetector {
    pub fn new(api: Arc<dyn AudioDetectionApi>) -> Self {
        Self { api }
    }

    /// Never fails on a malformed payload: the score falls back to 0.
    pub async fn detect(&self, job: &DetectionJob) -> Result<DetectionResult, DetectionError> {
        let payload = self.api.classify_audio(&job.source).await?;
        Ok(match extract_confidence(&payload) {
            Ok(score) => DetectionResult::finished(payload, Some(score)),
            Err(reason) => {
                log::warn!(
                    "Job {}: {} mapping error: {}, response: {}",
                    job.job_id,
                    self.api.name(),
                    reason,
                    payload
                );
                DetectionResult::failed(payload, Some(0.0))
            }
        })
    }

    pub fn verdict(result: &DetectionResult) -> AudioVerdict {
        AudioVerdict {
            is_ai_generated: result.score.unwrap_or(0.0),
        }
    }
}

/// Confidence of the first output class.
///
/// Which class actually means "AI generated" is unverified against live
/// responses; this is the only place that knows the payload layout.
pub fn extract_confidence(payload: &Value) -> Result<f64, String> {
    match payload.get("status_code").and_then(Value::as_i64) {
        Some(200) => {}
        other => return Err(format!("non-success status_code {:?}", other)),
    }
    let response = payload
        .get("response")
        .ok_or_else(|| "missing response".to_string())?;
    response
        .pointer("/output/0/confidence")
        .and_then(Value::as_f64)
        .ok_or_else(|| "missing response.output[0].confidence".to_string())
}
