//! Video detection.
//!
//! The provider either answers the submission with a terminal status or hands
//! back a job identifier that has to be polled:
//!
//! ```text
//! Submitted ──finished/failure──────────────▶ Finished / Failed
//!     │
//!     └─ongoing + request.id─▶ Polling ─┬─finished─▶ Finished
//!                                       ├─failure──▶ Failed
//!                                       └─budget───▶ TimedOut
//! ```
//!
//! Polls run sequentially inside the request future. Dropping that future
//! (client disconnect) stops polling.

use serde_json::Value;
use std::sync::Arc;
use std::time::Duration;
use tokio::time::Instant;

use super::error::DetectionError;
use super::models::{provider_request_id, DetectionJob, DetectionResult, ProviderStatus};
use super::provider::ContentDetectionApi;
use crate::config::PollingConfig;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PollingPolicy {
    pub interval: Duration,
    pub max_wait: Duration,
}

impl PollingPolicy {
    pub fn new(interval: Duration, max_wait: Duration) -> Self {
        Self { interval, max_wait }
    }

    /// Number of polls that fit in the wait budget, at least one.
    pub fn max_polls(&self) -> u32 {
        let interval = self.interval.as_millis().max(1);
        let polls = self.max_wait.as_millis() / interval;
        polls.clamp(1, u32::MAX as u128) as u32
    }
}

impl Default for PollingPolicy {
    fn default() -> Self {
        Self::from(&PollingConfig::default())
    }
}

impl From<&PollingConfig> for PollingPolicy {
    fn from(config: &PollingConfig) -> Self {
        Self::new(config.interval(), config.max_wait())
    }
}

#[derive(Clone)]
pub struct VideoDetector {
    api: Arc<dyn ContentDetectionApi>,
    policy: PollingPolicy,
}

impl VideoDetector {
    pub fn new(api: Arc<dyn ContentDetectionApi>, policy: PollingPolicy) -> Self {
        Self { api, policy }
    }

    pub async fn detect(&self, job: &DetectionJob) -> Result<DetectionResult, DetectionError> {
        let submitted = self.api.submit_video(&job.source).await?;

        match ProviderStatus::of_video(&submitted) {
            ProviderStatus::Finished => {
                log::info!("Job {}: video finished on submission", job.job_id);
                Ok(finished(submitted))
            }
            ProviderStatus::Failure => {
                log::info!("Job {}: video check failed on submission", job.job_id);
                Ok(failed(submitted))
            }
            ProviderStatus::Ongoing => {
                let request_id = provider_request_id(&submitted).ok_or_else(|| {
                    log::error!(
                        "Job {}: non-terminal submission without request id: {}",
                        job.job_id,
                        submitted
                    );
                    DetectionError::ProviderProtocol(format!(
                        "{} reported a pending video check without a job identifier",
                        self.api.name()
                    ))
                })?;
                log::info!(
                    "Job {}: video check pending as {}, polling every {:?} for up to {:?}",
                    job.job_id,
                    request_id,
                    self.policy.interval,
                    self.policy.max_wait
                );
                self.poll_until_terminal(job, &request_id).await
            }
        }
    }

    async fn poll_until_terminal(
        &self,
        job: &DetectionJob,
        request_id: &str,
    ) -> Result<DetectionResult, DetectionError> {
        let started = Instant::now();

        match tokio::time::timeout(self.policy.max_wait, self.poll_loop(job, request_id)).await {
            Ok(Ok(Some(result))) => return Ok(result),
            Ok(Err(e)) => return Err(e),
            Ok(Ok(None)) | Err(_) => {}
        }

        log::error!(
            "Job {}: video check {} still pending after {:?}",
            job.job_id,
            request_id,
            started.elapsed()
        );
        Err(DetectionError::TimedOut {
            job_id: request_id.to_string(),
            waited: started.elapsed(),
        })
    }

    /// `None` once the poll budget is spent without a terminal status.
    async fn poll_loop(
        &self,
        job: &DetectionJob,
        request_id: &str,
    ) -> Result<Option<DetectionResult>, DetectionError> {
        let max_polls = self.policy.max_polls();

        for attempt in 1..=max_polls {
            tokio::time::sleep(self.policy.interval).await;

            let status = self.api.video_status(request_id).await?;
            match ProviderStatus::of_video(&status) {
                ProviderStatus::Finished => {
                    log::info!(
                        "Job {}: video check {} finished after {} poll(s)",
                        job.job_id,
                        request_id,
                        attempt
                    );
                    return Ok(Some(finished(status)));
                }
                ProviderStatus::Failure => {
                    log::warn!(
                        "Job {}: video check {} failed after {} poll(s)",
                        job.job_id,
                        request_id,
                        attempt
                    );
                    return Ok(Some(failed(status)));
                }
                ProviderStatus::Ongoing => {
                    log::debug!(
                        "Job {}: poll {}/{} for {} still ongoing",
                        job.job_id,
                        attempt,
                        max_polls,
                        request_id
                    );
                }
            }
        }

        Ok(None)
    }
}

fn finished(payload: Value) -> DetectionResult {
    let score = max_frame_score(&payload);
    DetectionResult::finished(payload, score)
}

fn failed(payload: Value) -> DetectionResult {
    DetectionResult::failed(payload, None)
}

/// Highest `type.ai_generated` across the analysed frames.
fn max_frame_score(payload: &Value) -> Option<f64> {
    payload
        .pointer("/data/frames")?
        .as_array()?
        .iter()
        .filter_map(super::image::ai_generated_score)
        .reduce(f64::max)
}
