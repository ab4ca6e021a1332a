//! Provider seams.
//!
//! Adapters talk to third-party detection services only through these traits,
//! so the concrete HTTP clients can be swapped for scripted ones in tests.

use async_trait::async_trait;
use reqwest::StatusCode;
use serde_json::Value;

use super::error::DetectionError;
use super::models::MediaSource;

/// Content/video detection API (submit, and poll-by-job-id for video).
#[async_trait]
pub trait ContentDetectionApi: Send + Sync {
    fn name(&self) -> &str;

    async fn check_image(&self, source: &MediaSource) -> Result<Value, DetectionError>;

    async fn submit_video(&self, source: &MediaSource) -> Result<Value, DetectionError>;

    async fn video_status(&self, request_id: &str) -> Result<Value, DetectionError>;
}

/// Synchronous audio deepfake detection API.
#[async_trait]
pub trait AudioDetectionApi: Send + Sync {
    fn name(&self) -> &str;

    async fn classify_audio(&self, source: &MediaSource) -> Result<Value, DetectionError>;
}

/// Reads a provider response body as JSON.
pub async fn read_payload(
    provider: &str,
    response: reqwest::Response,
) -> Result<Value, DetectionError> {
    let status = response.status();
    let body = response.text().await?;
    decode_payload(provider, status, &body)
}

/// JSON bodies are accepted whatever the HTTP status, since providers report
/// failures in-band.
pub fn decode_payload(
    provider: &str,
    status: StatusCode,
    body: &str,
) -> Result<Value, DetectionError> {
    match serde_json::from_str::<Value>(body) {
        Ok(payload) => {
            if !status.is_success() {
                log::warn!("{} answered {} with payload: {}", provider, status, payload);
            }
            Ok(payload)
        }
        Err(e) => {
            let truncated: String = body.chars().take(200).collect();
            if status.is_success() {
                Err(DetectionError::ProviderProtocol(format!(
                    "{} returned a non-JSON body ({}): {}",
                    provider, e, truncated
                )))
            } else {
                Err(DetectionError::ProviderUnavailable(format!(
                    "{} answered {}: {}",
                    provider, status, truncated
                )))
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn json_is_accepted_even_on_error_status() {
        let payload = decode_payload(
            "sightengine",
            StatusCode::BAD_REQUEST,
            r#"{"status":"failure","error":{"message":"bad media"}}"#,
        )
        .unwrap();
        assert_eq!(payload["status"], "failure");
    }

    #[test]
    fn non_json_success_is_a_protocol_error() {
        let err = decode_payload("hive", StatusCode::OK, "<html>ok</html>").unwrap_err();
        assert!(matches!(err, DetectionError::ProviderProtocol(_)));
    }

    #[test]
    fn non_json_failure_means_unavailable() {
        let err =
            decode_payload("hive", StatusCode::BAD_GATEWAY, "upstream down").unwrap_err();
        assert!(matches!(err, DetectionError::ProviderUnavailable(_)));
    }
}
