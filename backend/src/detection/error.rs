use actix_web::http::StatusCode;
use actix_web::{HttpResponse, ResponseError};
use shared::ErrorResponse;
use std::time::Duration;

#[derive(Debug, thiserror::Error)]
pub enum DetectionError {
    #[error("Invalid input: {0}")]
    InvalidInput(String),
    #[error("Provider protocol error: {0}")]
    ProviderProtocol(String),
    #[error("Provider unavailable: {0}")]
    ProviderUnavailable(String),
    #[error("Detection job {job_id} did not finish within {waited:?}")]
    TimedOut { job_id: String, waited: Duration },
}

impl From<reqwest::Error> for DetectionError {
    fn from(err: reqwest::Error) -> Self {
        DetectionError::ProviderUnavailable(err.to_string())
    }
}

impl ResponseError for DetectionError {
    fn status_code(&self) -> StatusCode {
        match self {
            DetectionError::InvalidInput(_) => StatusCode::BAD_REQUEST,
            DetectionError::ProviderProtocol(_) => StatusCode::BAD_GATEWAY,
            DetectionError::ProviderUnavailable(_) => StatusCode::SERVICE_UNAVAILABLE,
            DetectionError::TimedOut { .. } => StatusCode::GATEWAY_TIMEOUT,
        }
    }

    fn error_response(&self) -> HttpResponse {
        HttpResponse::build(self.status_code()).json(ErrorResponse {
            error: self.to_string(),
        })
    }
}
