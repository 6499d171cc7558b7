//! Chat completion client for OpenAI-compatible providers.

use std::sync::Mutex;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::Duration;

use async_trait::async_trait;
use thiserror::Error as ThisError;
use tracing::{debug, warn};

use crate::config::{ProviderConfig, RetryPolicy};

use super::types::{ChatMessage, ChatRequest, ChatResponse};

/// Errors from the completion client.
///
/// Variants are string-based rather than wrapping `reqwest::Error` so the
/// type stays `Clone`, which scripted test clients rely on.
#[derive(Debug, Clone, ThisError)]
pub enum Error {
    #[error("request failed: {0}")]
    Http(String),

    #[error("connection failed: {0}")]
    Connect(String),

    #[error("API error {status}: {body}")]
    Api { status: u16, body: String },

    #[error("request timed out after {secs}s")]
    Timeout { secs: u64 },

    #[error("model returned no choices")]
    EmptyChoices,
}

impl Error {
    fn from_reqwest(err: reqwest::Error, timeout: Duration) -> Self {
        if err.is_timeout() {
            Error::Timeout {
                secs: timeout.as_secs(),
            }
        } else if err.is_connect() {
            Error::Connect(err.to_string())
        } else {
            Error::Http(err.to_string())
        }
    }

    /// Whether a retry could plausibly succeed.
    ///
    /// Connection failures, timeouts, and 5xx/429 responses are transient;
    /// auth failures and other 4xx are not.
    pub fn is_transient(&self) -> bool {
        match self {
            Error::Connect(_) | Error::Timeout { .. } => true,
            Error::Api { status, .. } => *status >= 500 || *status == 429,
            Error::Http(_) | Error::EmptyChoices => false,
        }
    }
}

/// The seam between the prediction service and the model provider.
///
/// Takes a prepared message list and returns the raw assistant text.
/// Implemented by [`ChatClient`] for real providers and [`FakeClient`]
/// for tests.
#[async_trait]
pub trait CompletionClient: Send + Sync {
    async fn complete(&self, messages: &[ChatMessage]) -> Result<String, Error>;
}

/// HTTP client for any provider exposing `POST {base_url}/chat/completions`.
pub struct ChatClient {
    http: reqwest::Client,
    base_url: String,
    api_key: String,
    model: String,
    temperature: f32,
    max_tokens: u32,
    timeout: Duration,
    retry: RetryPolicy,
}

impl ChatClient {
    /// Builds a client from provider settings.
    ///
    /// A missing API key is tolerated here; callers are expected to check
    /// for one before issuing requests.
    pub fn new(config: &ProviderConfig) -> Result<Self, Error> {
        let http = reqwest::Client::builder()
            .timeout(config.timeout)
            .build()
            .map_err(|e| Error::Http(e.to_string()))?;

        Ok(Self {
            http,
            base_url: config.base_url.clone(),
            api_key: config.api_key.clone().unwrap_or_default(),
            model: config.model.clone(),
            temperature: config.temperature,
            max_tokens: config.max_tokens,
            timeout: config.timeout,
            retry: config.retry,
        })
    }

    fn endpoint(&self) -> String {
        format!("{}/chat/completions", self.base_url.trim_end_matches('/'))
    }

    async fn send_once(&self, messages: &[ChatMessage]) -> Result<String, Error> {
        let request = ChatRequest {
            model: self.model.clone(),
            messages: messages.to_vec(),
            temperature: Some(self.temperature),
            max_tokens: Some(self.max_tokens),
        };

        debug!(model = %self.model, "sending completion request");

        let response = self
            .http
            .post(self.endpoint())
            .bearer_auth(&self.api_key)
            .json(&request)
            .send()
            .await
            .map_err(|e| Error::from_reqwest(e, self.timeout))?;

        if !response.status().is_success() {
            let status = response.status().as_u16();
            let body = response.text().await.unwrap_or_default();
            return Err(Error::Api { status, body });
        }

        let completion: ChatResponse = response
            .json()
            .await
            .map_err(|e| Error::Http(e.to_string()))?;

        completion
            .choices
            .into_iter()
            .next()
            .map(|choice| choice.message.content)
            .ok_or(Error::EmptyChoices)
    }
}

#[async_trait]
impl CompletionClient for ChatClient {
    /// Sends the messages and returns the first choice's content.
    ///
    /// Transient failures (connect errors, timeouts, 5xx, 429) are retried
    /// up to [`RetryPolicy::max_retries`] times with a fixed backoff.
    async fn complete(&self, messages: &[ChatMessage]) -> Result<String, Error> {
        let mut attempt = 0;
        loop {
            match self.send_once(messages).await {
                Ok(content) => return Ok(content),
                Err(err) if attempt < self.retry.max_retries && err.is_transient() => {
                    attempt += 1;
                    warn!(error = %err, attempt, "completion failed, retrying");
                    tokio::time::sleep(self.retry.backoff).await;
                }
                Err(err) => return Err(err),
            }
        }
    }
}

/// Scripted completion client for tests.
///
/// A single scripted entry is returned on every call; multiple entries are
/// consumed in order, with the script falling back to [`Error::EmptyChoices`]
/// once exhausted.
pub struct FakeClient {
    script: Mutex<Vec<Result<String, Error>>>,
    calls: AtomicUsize,
}

impl FakeClient {
    /// Creates a client that plays back `script` in order.
    pub fn new(script: Vec<Result<String, Error>>) -> Self {
        Self {
            script: Mutex::new(script),
            calls: AtomicUsize::new(0),
        }
    }

    /// A client that always answers with `content`.
    pub fn always(content: impl Into<String>) -> Self {
        Self::new(vec![Ok(content.into())])
    }

    /// A client that always fails with `error`.
    pub fn always_error(error: Error) -> Self {
        Self::new(vec![Err(error)])
    }

    /// Number of `complete` calls made so far.
    pub fn call_count(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl CompletionClient for FakeClient {
    async fn complete(&self, _messages: &[ChatMessage]) -> Result<String, Error> {
        self.calls.fetch_add(1, Ordering::SeqCst);

        let mut script = self.script.lock().unwrap();
        if script.is_empty() {
            return Err(Error::EmptyChoices);
        }
        if script.len() == 1 {
            script[0].clone()
        } else {
            script.remove(0)
        }
    }
}
