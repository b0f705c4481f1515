//! Provider-agnostic LLM integration for the relay services.
//!
//! This crate exposes a common [`traits::LlmClient`] interface and the
//! OpenAI-compatible chat-completions client used by both the analyze API
//! (OpenAI) and the chat relay bot (OpenRouter). [`client_from_config`] turns a
//! [`relay_common::LlmConfig`] into a shareable client.
//!
//! # Examples
//! ```no_run
//! use relay_common::{LlmConfig, Result};
//! use relay_llm::client_from_config;
//!
//! # fn main() -> Result<()> {
//! let cfg = LlmConfig::openai("sk-...", relay_llm::DEFAULT_OPENAI_MODEL);
//! let client = client_from_config(&cfg)?;
//! assert_eq!(client.model_name(), "gpt-4o-mini");
//! # Ok(())
//! # }
//! ```
pub mod openai;
pub mod traits;

use openai::OpenAiClient;
use relay_common::{LlmConfig, RelayError};
use std::sync::Arc;
use traits::LlmClient;

pub const DEFAULT_OPENAI_MODEL: &str = "gpt-4o-mini";

/// Build a shared client for the configured provider.
pub fn client_from_config(
    config: &LlmConfig,
) -> relay_common::Result<Arc<dyn LlmClient>> {
    match config {
        LlmConfig::OpenAi {
            api_key,
            model,
            base_url,
        } => {
            let client = match base_url {
                Some(base) => OpenAiClient::with_base_url(api_key.clone(), model.clone(), base)?,
                None => OpenAiClient::new(api_key.clone(), model.clone())?,
            };
            Ok(Arc::new(client))
        }
        LlmConfig::None => Err(RelayError::Config("No LLM configured".to_string())),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn missing_config_is_an_error() {
        assert!(matches!(
            client_from_config(&LlmConfig::None),
            Err(RelayError::Config(_))
        ));
    }

    #[test]
    fn openai_config_builds_client() {
        let cfg = LlmConfig::OpenAi {
            api_key: "sk-test".into(),
            model: "openai/gpt-4o-mini".into(),
            base_url: Some("https://openrouter.ai/api/v1".into()),
        };
        let client = client_from_config(&cfg).expect("client");
        assert_eq!(client.model_name(), "openai/gpt-4o-mini");
    }
}
