use serde::Serialize;
use serde_json::Value;
use shared::{AudioVerdict, MediaKind};
use std::sync::Arc;

use super::audio::AudioDetector;
use super::error::DetectionError;
use super::image::ImageDetector;
use super::models::DetectionJob;
use super::provider::{AudioDetectionApi, ContentDetectionApi};
use super::video::{PollingPolicy, VideoDetector};

/// What a detect-* caller gets back.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum Verdict {
    /// Image and video: the provider's own payload.
    Passthrough(Value),
    Audio(AudioVerdict),
}

#[derive(Clone)]
pub struct DetectionService {
    image: ImageDetector,
    video: VideoDetector,
    audio: AudioDetector,
}

impl DetectionService {
    pub fn new(
        content_api: Arc<dyn ContentDetectionApi>,
        audio_api: Arc<dyn AudioDetectionApi>,
        policy: PollingPolicy,
    ) -> Self {
        Self {
            image: ImageDetector::new(content_api.clone()),
            video: VideoDetector::new(content_api, policy),
            audio: AudioDetector::new(audio_api),
        }
    }

    pub async fn detect(&self, job: &DetectionJob) -> Result<Verdict, DetectionError> {
        log::info!(
            "Job {}: {} detection for {:?}",
            job.job_id,
            job.kind,
            job.source
        );

        let verdict = match job.kind {
            MediaKind::Image => Verdict::Passthrough(self.image.detect(job).await?.raw),
            MediaKind::Video => Verdict::Passthrough(self.video.detect(job).await?.raw),
            MediaKind::Audio => {
                let result = self.audio.detect(job).await?;
                Verdict::Audio(AudioDetector::verdict(&result))
            }
        };

        let elapsed = chrono::Utc::now() - job.submitted_at;
        log::info!(
            "Job {}: {} detection completed in {}ms",
            job.job_id,
            job.kind,
            elapsed.num_milliseconds()
        );
        Ok(verdict)
    }
}
