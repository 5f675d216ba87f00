use std::time::Duration;

use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::debug;

/// Completion engine used when none is configured.
pub const DEFAULT_ENGINE: &str = "davinci-codex";

/// Output-length bound used when none is configured.
pub const DEFAULT_MAX_TOKENS: u32 = 150;

/// Errors emitted while generating a summary.
#[derive(Debug, Error)]
pub enum CompletionError {
    #[error("http error: {0}")]
    Http(#[from] reqwest::Error),
    #[error("completion API returned {status}: {body}")]
    Api { status: u16, body: String },
    #[error("completion API returned no choices")]
    EmptyChoices,
}

/// Client for the text-completion endpoint.
pub struct CompletionClient {
    http: reqwest::Client,
    endpoint: String,
    api_key: String,
    engine: String,
    max_tokens: u32,
}

#[derive(Serialize)]
struct CompletionRequest<'a> {
    engine: &'a str,
    prompt: &'a str,
    max_tokens: u32,
}

#[derive(Deserialize)]
struct CompletionResponse {
    choices: Vec<Choice>,
}

#[derive(Deserialize)]
struct Choice {
    text: String,
}

impl CompletionClient {
    pub fn new(endpoint: impl Into<String>, api_key: impl Into<String>) -> Self {
        Self {
            http: reqwest::Client::builder()
                .timeout(Duration::from_secs(30))
                .build()
                .expect("build http client"),
            endpoint: endpoint.into(),
            api_key: api_key.into(),
            engine: DEFAULT_ENGINE.to_string(),
            max_tokens: DEFAULT_MAX_TOKENS,
        }
    }

    pub fn with_engine(mut self, engine: impl Into<String>) -> Self {
        self.engine = engine.into();
        self
    }

    pub fn with_max_tokens(mut self, max_tokens: u32) -> Self {
        self.max_tokens = max_tokens;
        self
    }

    /// Send one prompt and return the first completion's text, trimmed.
    pub async fn complete(&self, prompt: &str) -> Result<String, CompletionError> {
        let url = format!("{}/completions", self.endpoint.trim_end_matches('/'));
        debug!(%url, engine = %self.engine, max_tokens = self.max_tokens, "requesting completion");
        let response = self
            .http
            .post(&url)
            .bearer_auth(&self.api_key)
            .json(&CompletionRequest {
                engine: &self.engine,
                prompt,
                max_tokens: self.max_tokens,
            })
            .send()
            .await?;
        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(CompletionError::Api {
                status: status.as_u16(),
                body,
            });
        }
        let payload: CompletionResponse = response.json().await?;
        let choice = payload
            .choices
            .into_iter()
            .next()
            .ok_or(CompletionError::EmptyChoices)?;
        Ok(choice.text.trim().to_string())
    }
}
