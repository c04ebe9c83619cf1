//! OpenAI-compatible chat completion client

use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use tracing::debug;

use crate::core::config::TranslatorConfig;
use crate::core::dispatcher::ChatEndpoint;
use crate::core::errors::{Result, TranslationError};
use crate::core::models::{ChatCompletionRequest, ChatCompletionResponse};

/// HTTP client for a chat completions endpoint.
///
/// No request timeout is set: a provider that never answers stalls the
/// caller.
#[derive(Debug, Clone)]
pub struct OpenAiClient {
    client: reqwest::Client,
    config: Arc<TranslatorConfig>,
}

impl OpenAiClient {
    /// Create a new client, rejecting configurations without a credential
    pub fn new(config: TranslatorConfig) -> Result<Self> {
        config.validate()?;

        let client = reqwest::Client::builder()
            .pool_idle_timeout(Some(Duration::from_secs(30)))
            .build()?;

        Ok(Self {
            client,
            config: Arc::new(config),
        })
    }

    /// Configuration this client was built with
    pub fn config(&self) -> &TranslatorConfig {
        &self.config
    }
}

#[async_trait]
impl ChatEndpoint for OpenAiClient {
    async fn complete(&self, request: &ChatCompletionRequest) -> Result<ChatCompletionResponse> {
        debug!(
            "POST {} model={} messages={}",
            self.config.api_endpoint,
            request.model,
            request.messages.len()
        );

        let response = self
            .client
            .post(&self.config.api_endpoint)
            .header("Authorization", format!("Bearer {}", self.config.api_key))
            .header("Content-Type", "application/json")
            .json(request)
            .send()
            .await
            .map_err(|e| TranslationError::NetworkError {
                message: e.to_string(),
            })?;

        let status = response.status();

        if !status.is_success() {
            let message = response.text().await.unwrap_or_default();
            return Err(TranslationError::ApiError {
                status: status.as_u16(),
                message,
            });
        }

        response
            .json::<ChatCompletionResponse>()
            .await
            .map_err(|e| TranslationError::InvalidResponseError {
                message: e.to_string(),
            })
    }
}
