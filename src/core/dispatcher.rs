//! Per-chunk request dispatch and pacing

use std::time::Duration;

use async_trait::async_trait;
use tokio::time::sleep;
use tracing::{debug, warn};

use crate::core::errors::{Result, TranslationError};
use crate::core::models::{ChatCompletionRequest, ChatCompletionResponse, ChatMessage};

/// A chat completion provider
#[async_trait]
pub trait ChatEndpoint: Send + Sync {
    /// Send one request. Errors are returned as-is, never retried.
    async fn complete(&self, request: &ChatCompletionRequest) -> Result<ChatCompletionResponse>;
}

/// Waits between dispatches to stay under provider rate limits
#[async_trait]
pub trait Pacer: Send + Sync {
    async fn pause(&self);
}

/// Sleeps for a fixed duration on every pause
#[derive(Debug, Clone, Copy)]
pub struct FixedDelayPacer {
    delay: Duration,
}

impl FixedDelayPacer {
    pub fn new(delay: Duration) -> Self {
        Self { delay }
    }

    pub fn from_millis(ms: u64) -> Self {
        Self::new(Duration::from_millis(ms))
    }

    pub fn delay(&self) -> Duration {
        self.delay
    }
}

#[async_trait]
impl Pacer for FixedDelayPacer {
    async fn pause(&self) {
        debug!("Pausing {:?} before the next request", self.delay);
        sleep(self.delay).await;
    }
}

/// Turns one chunk into one chat completion call
#[derive(Debug, Clone)]
pub struct Dispatcher<E> {
    endpoint: E,
    model: String,
    top_p: f32,
}

impl<E: ChatEndpoint> Dispatcher<E> {
    pub fn new(endpoint: E, model: impl Into<String>, top_p: f32) -> Self {
        Self {
            endpoint,
            model: model.into(),
            top_p,
        }
    }

    /// Build the request body for a chunk
    pub fn build_request(&self, chunk: &str, instruction: &str) -> ChatCompletionRequest {
        ChatCompletionRequest {
            model: self.model.clone(),
            messages: vec![ChatMessage::system(instruction), ChatMessage::user(chunk)],
            top_p: self.top_p,
        }
    }

    /// Translate a single chunk.
    ///
    /// Returns the first choice's content. A missing or empty content is
    /// logged and comes back as an empty string; a response without any
    /// choice is an error.
    pub async fn translate_chunk(&self, chunk: &str, instruction: &str) -> Result<String> {
        let request = self.build_request(chunk, instruction);
        let response = self.endpoint.complete(&request).await?;

        let choice = response.choices.into_iter().next().ok_or_else(|| {
            TranslationError::InvalidResponseError {
                message: "No choices in response".to_string(),
            }
        })?;

        let content = choice
            .message
            .and_then(|m| m.content)
            .unwrap_or_default();

        if content.is_empty() {
            warn!("Possible error: translation result is empty");
        }

        Ok(content)
    }
}
