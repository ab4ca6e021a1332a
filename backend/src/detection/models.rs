use chrono::{DateTime, Utc};
use serde::Serialize;
use serde_json::Value;
use shared::{DetectionStatus, MediaKind};
use uuid::Uuid;

#[derive(Clone)]
pub enum MediaSource {
    Inline {
        bytes: Vec<u8>,
        file_name: Option<String>,
    },
    RemoteUrl(String),
}

impl MediaSource {
    pub fn describe(&self) -> String {
        match self {
            MediaSource::Inline { bytes, file_name } => format!(
                "inline upload '{}' ({} bytes)",
                file_name.as_deref().unwrap_or("unnamed"),
                bytes.len()
            ),
            MediaSource::RemoteUrl(url) => format!("remote url {}", url),
        }
    }
}

impl std::fmt::Debug for MediaSource {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.describe())
    }
}

#[derive(Debug, Clone)]
pub struct DetectionJob {
    pub job_id: String,
    pub submitted_at: DateTime<Utc>,
    pub kind: MediaKind,
    pub source: MediaSource,
}

impl DetectionJob {
    pub fn new(kind: MediaKind, source: MediaSource) -> Self {
        Self {
            job_id: Uuid::new_v4().to_string(),
            submitted_at: Utc::now(),
            kind,
            source,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DetectionResult {
    pub status: DetectionStatus,
    pub score: Option<f64>,
    pub raw: Value,
}

impl DetectionResult {
    pub fn finished(raw: Value, score: Option<f64>) -> Self {
        Self {
            status: DetectionStatus::Finished,
            score,
            raw,
        }
    }

    pub fn failed(raw: Value, score: Option<f64>) -> Self {
        Self {
            status: DetectionStatus::Failed,
            score,
            raw,
        }
    }
}

/// The `status` field every content-detection payload carries.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ProviderStatus {
    Finished,
    Failure,
    Ongoing,
}

impl ProviderStatus {
    /// Image checks are synchronous: `success` is the verdict.
    pub fn of_image(payload: &Value) -> Self {
        match status_field(payload) {
            Some("finished") | Some("success") => ProviderStatus::Finished,
            Some("failure") => ProviderStatus::Failure,
            _ => ProviderStatus::Ongoing,
        }
    }

    /// For video only `finished` ends the job; `success` merely acknowledges
    /// the submission.
    pub fn of_video(payload: &Value) -> Self {
        match status_field(payload) {
            Some("finished") => ProviderStatus::Finished,
            Some("failure") => ProviderStatus::Failure,
            _ => ProviderStatus::Ongoing,
        }
    }
}

fn status_field(payload: &Value) -> Option<&str> {
    payload.get("status").and_then(Value::as_str)
}

/// Provider-side job identifier (`request.id`) of an asynchronous check.
pub fn provider_request_id(payload: &Value) -> Option<String> {
    match payload.pointer("/request/id")? {
        Value::String(id) if !id.is_empty() => Some(id.clone()),
        Value::Number(id) => Some(id.to_string()),
        _ => None,
    }
}
