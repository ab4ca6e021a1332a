//! Scripted providers for adapter and route tests.

use async_trait::async_trait;
use serde_json::Value;
use std::collections::VecDeque;
use std::sync::Mutex;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::Duration;

use super::error::DetectionError;
use super::models::MediaSource;
use super::provider::{AudioDetectionApi, ContentDetectionApi};

type Script = Mutex<VecDeque<Result<Value, DetectionError>>>;

fn next(script: &Script, fallback: &Option<Value>) -> Result<Value, DetectionError> {
    match script.lock().unwrap().pop_front() {
        Some(step) => step,
        None => fallback
            .clone()
            .ok_or_else(|| DetectionError::ProviderProtocol("script exhausted".to_string())),
    }
}

#[derive(Default)]
pub struct ScriptedContentApi {
    images: Script,
    submissions: Script,
    polls: Script,
    poll_fallback: Option<Value>,
    poll_delay: Option<Duration>,
    pub image_calls: AtomicUsize,
    pub submit_calls: AtomicUsize,
    pub poll_calls: AtomicUsize,
    pub polled_ids: Mutex<Vec<String>>,
}

impl ScriptedContentApi {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_image(self, step: Result<Value, DetectionError>) -> Self {
        self.images.lock().unwrap().push_back(step);
        self
    }

    pub fn with_submit(self, step: Result<Value, DetectionError>) -> Self {
        self.submissions.lock().unwrap().push_back(step);
        self
    }

    pub fn with_poll(self, step: Result<Value, DetectionError>) -> Self {
        self.polls.lock().unwrap().push_back(step);
        self
    }

    /// Answer every poll past the script with `payload`.
    pub fn polling_forever(mut self, payload: Value) -> Self {
        self.poll_fallback = Some(payload);
        self
    }

    /// Every status call takes `delay` before answering.
    pub fn with_poll_delay(mut self, delay: Duration) -> Self {
        self.poll_delay = Some(delay);
        self
    }

    pub fn polls(&self) -> usize {
        self.poll_calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl ContentDetectionApi for ScriptedContentApi {
    fn name(&self) -> &str {
        "scripted-content"
    }

    async fn check_image(&self, _source: &MediaSource) -> Result<Value, DetectionError> {
        self.image_calls.fetch_add(1, Ordering::SeqCst);
        next(&self.images, &None)
    }

    async fn submit_video(&self, _source: &MediaSource) -> Result<Value, DetectionError> {
        self.submit_calls.fetch_add(1, Ordering::SeqCst);
        next(&self.submissions, &None)
    }

    async fn video_status(&self, request_id: &str) -> Result<Value, DetectionError> {
        self.poll_calls.fetch_add(1, Ordering::SeqCst);
        self.polled_ids.lock().unwrap().push(request_id.to_string());
        if let Some(delay) = self.poll_delay {
            tokio::time::sleep(delay).await;
        }
        next(&self.polls, &self.poll_fallback)
    }
}

#[derive(Default)]
pub struct ScriptedAudioApi {
    responses: Script,
    pub calls: AtomicUsize,
}

impl ScriptedAudioApi {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_response(self, step: Result<Value, DetectionError>) -> Self {
        self.responses.lock().unwrap().push_back(step);
        self
    }
}

#[async_trait]
impl AudioDetectionApi for ScriptedAudioApi {
    fn name(&self) -> &str {
        "scripted-audio"
    }

    async fn classify_audio(&self, _source: &MediaSource) -> Result<Value, DetectionError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        next(&self.responses, &None)
    }
}
