use async_trait::async_trait;
use relay_common::Result;
use serde::{Deserialize, Serialize};
use serde_json::Value;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LlmResponse {
    /// Assistant message content.
    pub text: String,
    pub model: Option<String>,
    pub tokens_used: Option<u32>,
    /// The provider's complete JSON reply, kept for callers that echo it back.
    pub raw: Option<Value>,
}

/// A JSON schema the provider is asked to constrain its output to.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StructuredOutput {
    pub name: String,
    pub schema: Value,
}

impl StructuredOutput {
    pub fn new(name: impl Into<String>, schema: Value) -> Self {
        Self {
            name: name.into(),
            schema,
        }
    }
}

#[async_trait]
pub trait LlmClient: Send + Sync {
    /// Generate a response to the given prompt with optional system prompt.
    async fn generate(
        &self,
        prompt: &str,
        system_prompt: Option<&str>,
        max_tokens: Option<u32>,
        temperature: Option<f32>,
    ) -> Result<LlmResponse>;

    /// Generate a JSON reply shaped by `output`, as deterministically as the
    /// provider allows.
    ///
    /// Providers without schema support fall back to a plain zero-temperature
    /// call and leave validation to the caller.
    async fn generate_structured(
        &self,
        prompt: &str,
        system_prompt: &str,
        output: &StructuredOutput,
    ) -> Result<LlmResponse> {
        tracing::debug!(schema = %output.name, "structured output not supported; plain generate");
        self.generate(prompt, Some(system_prompt), None, Some(0.0))
            .await
    }

    /// Get the model name being used
    fn model_name(&self) -> &str;
}
