use crate::config::EngineConfig;
use crate::llm::{GenerateRequest, GenerateResponse};
use async_trait::async_trait;
use reqwest::Client;
use std::sync::Arc;
use std::time::Duration;
use thiserror::Error;
use tracing::{debug, instrument, trace, warn};

#[derive(Error, Debug)]
pub enum ModelError {
    #[error("Request timeout - the generation endpoint took too long to respond")]
    Timeout,
    #[error("Connection error - unable to reach the generation endpoint: {0}")]
    Connect(String),
    #[error("Network error: {0}")]
    Transport(String),
    #[error("HTTP error {status}: {body}")]
    Status { status: u16, body: String },
    #[error("Unexpected response shape: {0}")]
    UnexpectedShape(String),
    #[error("Failed to create HTTP client: {0}")]
    ClientBuild(String),
}

impl ModelError {
    fn is_retryable(&self) -> bool {
        match self {
            ModelError::Timeout | ModelError::Connect(_) | ModelError::Transport(_) => true,
            ModelError::Status { status, .. } => (500..=599).contains(status),
            ModelError::UnexpectedShape(_) | ModelError::ClientBuild(_) => false,
        }
    }
}

impl From<reqwest::Error> for ModelError {
    fn from(e: reqwest::Error) -> Self {
        if e.is_timeout() {
            ModelError::Timeout
        } else if e.is_connect() {
            ModelError::Connect(e.to_string())
        } else {
            ModelError::Transport(e.to_string())
        }
    }
}

/// Anything that can turn a prompt into the model's raw answer text.
#[async_trait]
pub trait ModelClient: Send + Sync {
    async fn generate(&self, prompt: &str) -> Result<String, ModelError>;
}

#[async_trait]
impl<T: ModelClient + ?Sized> ModelClient for Arc<T> {
    async fn generate(&self, prompt: &str) -> Result<String, ModelError> {
        (**self).generate(prompt).await
    }
}

/// HTTP client for the `generateContent`-style endpoint.
pub struct GenerationClient {
    http: Client,
    api_url: String,
    api_key: String,
    model: String,
    max_retries: u32,
}

impl GenerationClient {
    const RETRY_DELAY_MS: u64 = 500;

    pub fn new(config: &EngineConfig) -> Result<Self, ModelError> {
        let http = Client::builder()
            .timeout(config.request_timeout())
            .build()
            .map_err(|e| ModelError::ClientBuild(e.to_string()))?;

        Ok(Self {
            http,
            api_url: config.api_url.clone(),
            api_key: config.api_key.clone(),
            model: config.model.clone(),
            max_retries: config.max_retries,
        })
    }

    async fn send_once(&self, body: &GenerateRequest) -> Result<String, ModelError> {
        let response = self
            .http
            .post(&self.api_url)
            .header("x-goog-api-key", &self.api_key)
            .header("Content-Type", "application/json")
            .json(body)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let body = response
                .text()
                .await
                .unwrap_or_else(|_| "Unknown error".to_string());
            return Err(ModelError::Status {
                status: status.as_u16(),
                body,
            });
        }

        let raw = response.text().await?;
        trace!(body = %raw.chars().take(500).collect::<String>(), "Generation endpoint replied");

        let envelope: GenerateResponse = serde_json::from_str(&raw)
            .map_err(|e| ModelError::UnexpectedShape(e.to_string()))?;
        envelope.answer_text().ok_or_else(|| {
            ModelError::UnexpectedShape("response carries no candidate text".to_string())
        })
    }
}

#[async_trait]
impl ModelClient for GenerationClient {
    #[instrument(skip_all, fields(model = %self.model, prompt_len = prompt.len()))]
    async fn generate(&self, prompt: &str) -> Result<String, ModelError> {
        let body = GenerateRequest::from_prompt(prompt);
        let mut attempt = 0;

        loop {
            match self.send_once(&body).await {
                Ok(answer) => {
                    debug!(attempt, answer_len = answer.len(), "Model call succeeded");
                    return Ok(answer);
                }
                Err(e) if e.is_retryable() && attempt < self.max_retries => {
                    attempt += 1;
                    warn!(attempt, max_retries = self.max_retries, error = %e, "Model call failed, retrying");
                    tokio::time::sleep(Duration::from_millis(Self::RETRY_DELAY_MS * attempt as u64))
                        .await;
                }
                Err(e) => return Err(e),
            }
        }
    }
}
