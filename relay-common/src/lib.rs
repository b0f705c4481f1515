//! Common types and utilities shared across the relay crates.
//!
//! Every service in the workspace (analyze API, price API, chat relay bot)
//! depends on this crate for its error type, the provider-agnostic LLM
//! configuration and the logging bootstrap. It stays dependency-light so the
//! leaf crates do not inherit heavy transitive costs.
//!
//! # Overview
//!
//! - [`LlmConfig`]: which LLM provider to talk to, and with what credentials
//! - [`observability`]: centralised tracing/logging initialisation
//! - [`RelayError`] and [`Result`]: shared error handling
//!
//! # Examples
//!
//! ```rust
//! use relay_common::LlmConfig;
//!
//! let cfg = LlmConfig::openai("sk-test", "gpt-4o-mini");
//! assert!(cfg.is_configured());
//! assert!(!LlmConfig::None.is_configured());
//! ```
use serde::{Deserialize, Serialize};

pub mod observability;

/// Configuration for an LLM provider.
///
/// `OpenAi` covers every OpenAI-compatible chat-completions endpoint; point
/// `base_url` at a gateway such as OpenRouter to use a different provider.
/// See the `relay-llm` crate for the concrete client.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub enum LlmConfig {
    OpenAi {
        api_key: String,
        model: String,
        #[serde(skip_serializing_if = "Option::is_none")]
        base_url: Option<String>,
    },
    /// No credentials were supplied.
    #[default]
    None,
}

impl LlmConfig {
    /// OpenAI client against the default API base.
    pub fn openai(api_key: impl Into<String>, model: impl Into<String>) -> Self {
        Self::OpenAi {
            api_key: api_key.into(),
            model: model.into(),
            base_url: None,
        }
    }

    /// Build from an optional key; blank keys count as missing.
    pub fn from_optional_key(
        api_key: Option<&str>,
        model: &str,
        base_url: Option<&str>,
    ) -> Self {
        match api_key.map(str::trim).filter(|k| !k.is_empty()) {
            Some(key) => Self::OpenAi {
                api_key: key.to_string(),
                model: model.to_string(),
                base_url: base_url.map(str::to_string),
            },
            None => Self::None,
        }
    }

    pub fn is_configured(&self) -> bool {
        !matches!(self, Self::None)
    }
}

/// Error types used across the relay services.
#[derive(thiserror::Error, Debug)]
pub enum RelayError {
    /// The upstream service could not be reached or answered with a non-2xx status.
    #[error("Upstream error: {0}")]
    Upstream(String),

    /// The upstream service answered, but not in the shape we expect.
    #[error("Unexpected upstream response: {0}")]
    UnexpectedResponse(String),

    /// Configuration was incomplete or invalid.
    #[error("Configuration error: {0}")]
    Config(String),

    /// Anything else bubbling up from a lower layer.
    #[error("Internal error: {0}")]
    Internal(#[from] anyhow::Error),

    /// Operation exceeded the configured timeout.
    #[error("Timeout occurred")]
    Timeout,
}

/// Convenient alias for results that use [`RelayError`].
pub type Result<T> = std::result::Result<T, RelayError>;
