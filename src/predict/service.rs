//! Prediction orchestration: input check, model call, extract, validate.

use std::sync::Arc;

use thiserror::Error;
use tracing::{debug, warn};

use crate::config::ProviderConfig;
use crate::http::StatusCode;
use crate::llm::{self, CompletionClient};

use super::extract::extract_json;
use super::prompt::build_messages;
use super::types::PredictionResult;
use super::validate::{ValidateError, validate};

/// Errors surfaced by [`Predictor::predict`].
#[derive(Debug, Error)]
pub enum PredictError {
    #[error("No phrase provided")]
    EmptyPhrase,

    #[error("{key} not found")]
    MissingCredential { key: String },

    #[error("API call failed: {0}")]
    Upstream(#[from] llm::Error),

    #[error(transparent)]
    Invalid(#[from] ValidateError),
}

impl PredictError {
    /// The HTTP status this error maps to.
    pub fn status(&self) -> StatusCode {
        match self {
            PredictError::EmptyPhrase => StatusCode::BadRequest,
            _ => StatusCode::InternalServerError,
        }
    }
}

/// Runs prediction requests against a completion provider.
///
/// Holds the provider settings and the completion client behind the
/// [`CompletionClient`] seam, so tests can substitute a scripted client.
pub struct Predictor {
    client: Arc<dyn CompletionClient>,
    provider: ProviderConfig,
}

impl Predictor {
    pub fn new(client: Arc<dyn CompletionClient>, provider: ProviderConfig) -> Self {
        Self { client, provider }
    }

    /// Provider settings this predictor was built with.
    pub fn provider(&self) -> &ProviderConfig {
        &self.provider
    }

    /// Runs the full pipeline for one phrase.
    ///
    /// Empty input and a missing credential are rejected before any upstream
    /// call is made. Model output containing no JSON at all yields the canned
    /// fallback result rather than an error, since the remote model is not
    /// schema-enforced; output that looks like JSON but fails to parse or has
    /// the wrong shape is an error.
    pub async fn predict(&self, phrase: &str) -> Result<PredictionResult, PredictError> {
        let phrase = phrase.trim();
        if phrase.is_empty() {
            return Err(PredictError::EmptyPhrase);
        }
        if self.provider.api_key.is_none() {
            return Err(PredictError::MissingCredential {
                key: self.provider.key_env.clone(),
            });
        }

        debug!(%phrase, "requesting prediction");

        let raw = self.client.complete(&build_messages(phrase)).await?;
        debug!(raw = %raw, "model responded");

        let Some(candidate) = extract_json(&raw) else {
            warn!("no JSON object in model output, serving fallback");
            return Ok(PredictionResult::fallback());
        };

        Ok(validate(candidate)?)
    }
}
