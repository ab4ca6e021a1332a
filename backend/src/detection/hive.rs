use async_trait::async_trait;
use reqwest::multipart::{Form, Part};
use serde_json::Value;
use std::time::Duration;

use super::error::DetectionError;
use super::models::MediaSource;
use super::provider::{read_payload, AudioDetectionApi};
use crate::config::{HiveConfig, ProviderCredentials};

/// Client for Hive's synchronous task endpoint.
#[derive(Clone)]
pub struct HiveClient {
    client: reqwest::Client,
    base_url: String,
    model: String,
    api_key: String,
}

impl std::fmt::Debug for HiveClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("HiveClient")
            .field("base_url", &self.base_url)
            .field("model", &self.model)
            .finish_non_exhaustive()
    }
}

impl HiveClient {
    pub fn new(
        credentials: &ProviderCredentials,
        config: &HiveConfig,
        timeout: Duration,
    ) -> Result<Self, DetectionError> {
        let client = reqwest::Client::builder().timeout(timeout).build()?;
        Ok(Self {
            client,
            base_url: config.base_url.trim_end_matches('/').to_string(),
            model: config.model.clone(),
            api_key: credentials.api_key.clone(),
        })
    }

    fn sync_task_url(&self) -> String {
        format!("{}/task/sync", self.base_url)
    }
}

#[async_trait]
impl AudioDetectionApi for HiveClient {
    fn name(&self) -> &str {
        "hive"
    }

    async fn classify_audio(&self, source: &MediaSource) -> Result<Value, DetectionError> {
        let request = self
            .client
            .post(self.sync_task_url())
            .header("Authorization", format!("Bearer {}", self.api_key));

        let request = match source {
            MediaSource::Inline { bytes, file_name } => {
                let part = Part::bytes(bytes.clone())
                    .file_name(file_name.clone().unwrap_or_else(|| "upload".to_string()));
                let form = Form::new()
                    .text("model", self.model.clone())
                    .part("media", part);
                request.multipart(form)
            }
            MediaSource::RemoteUrl(url) => {
                request.form(&[("model", self.model.as_str()), ("media_url", url.as_str())])
            }
        };

        let response = request.send().await?;
        read_payload(self.name(), response).await
    }
}
