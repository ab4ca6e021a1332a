use async_trait::async_trait;
use reqwest::multipart::{Form, Part};
use serde_json::Value;
use std::time::Duration;

use super::error::DetectionError;
use super::models::MediaSource;
use super::provider::{read_payload, ContentDetectionApi};
use crate::config::{ProviderCredentials, SightengineConfig};

/// Client for the Sightengine check endpoints (image and video).
#[derive(Clone)]
pub struct SightengineClient {
    client: reqwest::Client,
    base_url: String,
    models: String,
    api_user: String,
    api_secret: String,
}

impl std::fmt::Debug for SightengineClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SightengineClient")
            .field("base_url", &self.base_url)
            .field("models", &self.models)
            .finish_non_exhaustive()
    }
}

impl SightengineClient {
    pub fn new(
        credentials: &ProviderCredentials,
        config: &SightengineConfig,
        timeout: Duration,
    ) -> Result<Self, DetectionError> {
        let client = reqwest::Client::builder().timeout(timeout).build()?;
        Ok(Self {
            client,
            base_url: config.base_url.trim_end_matches('/').to_string(),
            models: config.models.clone(),
            api_user: credentials.api_user.clone(),
            api_secret: credentials.api_secret.clone(),
        })
    }

    fn image_check_url(&self) -> String {
        format!("{}/check.json", self.base_url)
    }

    fn video_check_url(&self) -> String {
        format!("{}/video/check.json", self.base_url)
    }

    fn credential_params(&self) -> Vec<(&'static str, String)> {
        vec![
            ("api_user", self.api_user.clone()),
            ("api_secret", self.api_secret.clone()),
        ]
    }

    fn check_params(&self) -> Vec<(&'static str, String)> {
        let mut params = vec![("models", self.models.clone())];
        params.extend(self.credential_params());
        params
    }

    /// Uploads bytes as the `media` part, or passes the URL as `url_param`.
    async fn check(
        &self,
        endpoint: String,
        source: &MediaSource,
        url_param: &'static str,
    ) -> Result<Value, DetectionError> {
        let response = match source {
            MediaSource::Inline { bytes, file_name } => {
                let mut part = Part::bytes(bytes.clone());
                if let Some(name) = file_name {
                    part = part.file_name(name.clone());
                }
                let form = self
                    .check_params()
                    .into_iter()
                    .fold(Form::new(), |form, (key, value)| form.text(key, value))
                    .part("media", part);
                self.client.post(&endpoint).multipart(form).send().await?
            }
            MediaSource::RemoteUrl(url) => {
                let mut params = self.check_params();
                params.push((url_param, url.clone()));
                self.client.get(&endpoint).query(&params).send().await?
            }
        };
        read_payload(self.name(), response).await
    }
}

#[async_trait]
impl ContentDetectionApi for SightengineClient {
    fn name(&self) -> &str {
        "sightengine"
    }

    async fn check_image(&self, source: &MediaSource) -> Result<Value, DetectionError> {
        self.check(self.image_check_url(), source, "url").await
    }

    async fn submit_video(&self, source: &MediaSource) -> Result<Value, DetectionError> {
        self.check(self.video_check_url(), source, "stream_url").await
    }

    async fn video_status(&self, request_id: &str) -> Result<Value, DetectionError> {
        let mut params = vec![("request_id", request_id.to_string())];
        params.extend(self.credential_params());
        let response = self
            .client
            .get(self.video_check_url())
            .query(&params)
            .send()
            .await?;
        read_payload(self.name(), response).await
    }
}
