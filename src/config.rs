//! Service configuration loaded from environment variables.
//!
//! The provider presets mirror the OpenAI-compatible services the predictor
//! can talk to. `NEXTWORD_PROVIDER` selects one; individual fields can then
//! be overridden with more specific variables (see [`Config::from_env`]).

use std::env;
use std::net::SocketAddr;
use std::time::Duration;

use thiserror::Error;

/// Errors raised while loading configuration.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("invalid listen address {addr:?}: {source}")]
    InvalidAddr {
        addr: String,
        #[source]
        source: std::net::AddrParseError,
    },

    #[error("unknown provider {0:?} (expected groq, openai, openrouter, or custom)")]
    UnknownProvider(String),

    #[error("provider \"custom\" requires NEXTWORD_BASE_URL")]
    MissingBaseUrl,

    #[error("provider \"custom\" requires NEXTWORD_MODEL")]
    MissingModel,

    #[error("invalid NEXTWORD_TIMEOUT_SECS {value:?}: {source}")]
    InvalidTimeout {
        value: String,
        #[source]
        source: std::num::ParseIntError,
    },
}

const DEFAULT_ADDR: &str = "127.0.0.1:8080";
const DEFAULT_TEMPERATURE: f32 = 0.3;
const DEFAULT_MAX_TOKENS: u32 = 800;
const DEFAULT_TIMEOUT: Duration = Duration::from_secs(30);

/// Retry behavior for upstream completion calls.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RetryPolicy {
    /// How many times a failed call is retried (0 disables retries).
    pub max_retries: u32,
    /// Delay before each retry attempt.
    pub backoff: Duration,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            max_retries: 1,
            backoff: Duration::from_millis(500),
        }
    }
}

/// Connection settings for one OpenAI-compatible completion provider.
#[derive(Debug, Clone)]
pub struct ProviderConfig {
    /// Short provider name, e.g. `"groq"`.
    pub name: String,
    /// API root, e.g. `https://api.groq.com/openai/v1`. The client appends
    /// `/chat/completions`.
    pub base_url: String,
    /// Name of the environment variable the API key is read from.
    pub key_env: String,
    /// The API key, if the `key_env` variable was set and non-empty.
    pub api_key: Option<String>,
    /// Model identifier sent with each request.
    pub model: String,
    /// Sampling temperature.
    pub temperature: f32,
    /// Completion token cap.
    pub max_tokens: u32,
    /// Per-request timeout.
    pub timeout: Duration,
    /// Retry behavior for transient failures.
    pub retry: RetryPolicy,
}

impl ProviderConfig {
    /// Groq's OpenAI-compatible endpoint. The default provider.
    pub fn groq() -> Self {
        Self {
            name: "groq".to_owned(),
            base_url: "https://api.groq.com/openai/v1".to_owned(),
            key_env: "GROQ_API_KEY".to_owned(),
            api_key: None,
            model: "llama-3.3-70b-versatile".to_owned(),
            temperature: DEFAULT_TEMPERATURE,
            max_tokens: DEFAULT_MAX_TOKENS,
            timeout: DEFAULT_TIMEOUT,
            retry: RetryPolicy::default(),
        }
    }

    /// OpenAI's own API.
    pub fn openai() -> Self {
        Self {
            name: "openai".to_owned(),
            base_url: "https://api.openai.com/v1".to_owned(),
            key_env: "OPENAI_API_KEY".to_owned(),
            model: "gpt-4o-mini".to_owned(),
            ..Self::groq()
        }
    }

    /// OpenRouter's aggregation API.
    pub fn openrouter() -> Self {
        Self {
            name: "openrouter".to_owned(),
            base_url: "https://openrouter.ai/api/v1".to_owned(),
            key_env: "OPENROUTER_API_KEY".to_owned(),
            model: "meta-llama/llama-3.3-70b-instruct".to_owned(),
            ..Self::groq()
        }
    }

    fn preset(name: &str) -> Option<Self> {
        match name {
            "groq" => Some(Self::groq()),
            "openai" => Some(Self::openai()),
            "openrouter" => Some(Self::openrouter()),
            _ => None,
        }
    }
}

/// Top-level service configuration.
#[derive(Debug, Clone)]
pub struct Config {
    /// Address the HTTP server binds to.
    pub listen_addr: SocketAddr,
    /// Upstream completion provider.
    pub provider: ProviderConfig,
}

impl Config {
    /// Load configuration from environment variables.
    ///
    /// | Variable                | Meaning                                  | Default          |
    /// |-------------------------|------------------------------------------|------------------|
    /// | `NEXTWORD_ADDR`         | listen address                           | `127.0.0.1:8080` |
    /// | `NEXTWORD_PROVIDER`     | `groq`, `openai`, `openrouter`, `custom` | `groq`           |
    /// | `NEXTWORD_MODEL`        | model override                           | per provider     |
    /// | `NEXTWORD_BASE_URL`     | base URL override (required for custom)  | per provider     |
    /// | `NEXTWORD_TIMEOUT_SECS` | upstream request timeout                 | `30`             |
    /// | `NEXTWORD_API_KEY_ENV`  | key variable name (custom provider only) | `NEXTWORD_API_KEY` |
    ///
    /// The API key itself is read from the variable the provider names
    /// (`GROQ_API_KEY` for groq, and so on). A missing key is not an error
    /// here; prediction requests will fail until it is set.
    pub fn from_env() -> Result<Self, ConfigError> {
        let addr_raw = env_or("NEXTWORD_ADDR", DEFAULT_ADDR);
        let listen_addr: SocketAddr =
            addr_raw.parse().map_err(|source| ConfigError::InvalidAddr {
                addr: addr_raw.clone(),
                source,
            })?;

        let provider_name = env_or("NEXTWORD_PROVIDER", "groq").to_lowercase();
        let mut provider = match ProviderConfig::preset(&provider_name) {
            Some(preset) => preset,
            None if provider_name == "custom" => Self::custom_provider()?,
            None => return Err(ConfigError::UnknownProvider(provider_name)),
        };

        if let Some(model) = non_empty("NEXTWORD_MODEL") {
            provider.model = model;
        }
        if let Some(base_url) = non_empty("NEXTWORD_BASE_URL") {
            provider.base_url = base_url;
        }
        if let Some(raw) = non_empty("NEXTWORD_TIMEOUT_SECS") {
            let secs: u64 = raw.parse().map_err(|source| ConfigError::InvalidTimeout {
                value: raw.clone(),
                source,
            })?;
            provider.timeout = Duration::from_secs(secs);
        }

        provider.api_key = non_empty(&provider.key_env);

        Ok(Self {
            listen_addr,
            provider,
        })
    }

    // A fully caller-specified provider: base URL and model are mandatory,
    // and the key variable name itself is configurable.
    fn custom_provider() -> Result<ProviderConfig, ConfigError> {
        let base_url = non_empty("NEXTWORD_BASE_URL").ok_or(ConfigError::MissingBaseUrl)?;
        let model = non_empty("NEXTWORD_MODEL").ok_or(ConfigError::MissingModel)?;
        let key_env =
            non_empty("NEXTWORD_API_KEY_ENV").unwrap_or_else(|| "NEXTWORD_API_KEY".to_owned());

        Ok(ProviderConfig {
            name: "custom".to_owned(),
            base_url,
            key_env,
            model,
            ..ProviderConfig::groq()
        })
    }
}

fn env_or(key: &str, default: &str) -> String {
    non_empty(key).unwrap_or_else(|| default.to_owned())
}

fn non_empty(key: &str) -> Option<String> {
    env::var(key).ok().filter(|v| !v.trim().is_empty())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn groq_preset() {
        let p = ProviderConfig::groq();
        assert_eq!(p.name, "groq");
        assert_eq!(p.base_url, "https://api.groq.com/openai/v1");
        assert_eq!(p.key_env, "GROQ_API_KEY");
        assert_eq!(p.model, "llama-3.3-70b-versatile");
        assert_eq!(p.temperature, 0.3);
        assert_eq!(p.max_tokens, 800);
        assert_eq!(p.timeout, Duration::from_secs(30));
    }

    #[test]
    fn openai_preset() {
        let p = ProviderConfig::openai();
        assert_eq!(p.name, "openai");
        assert_eq!(p.base_url, "https://api.openai.com/v1");
        assert_eq!(p.key_env, "OPENAI_API_KEY");
        assert_eq!(p.model, "gpt-4o-mini");
    }

    #[test]
    fn openrouter_preset() {
        let p = ProviderConfig::openrouter();
        assert_eq!(p.name, "openrouter");
        assert_eq!(p.key_env, "OPENROUTER_API_KEY");
    }

    #[test]
    fn preset_lookup() {
        assert!(ProviderConfig::preset("groq").is_some());
        assert!(ProviderConfig::preset("openai").is_some());
        assert!(ProviderConfig::preset("openrouter").is_some());
        assert!(ProviderConfig::preset("anthropic").is_none());
    }

    #[test]
    fn default_retry_policy() {
        let retry = RetryPolicy::default();
        assert_eq!(retry.max_retries, 1);
        assert_eq!(retry.backoff, Duration::from_millis(500));
    }
}
