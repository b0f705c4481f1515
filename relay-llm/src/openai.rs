use crate::traits::{LlmClient, LlmResponse, StructuredOutput};
use async_trait::async_trait;
use relay_common::{RelayError, Result};
use relay_http::{Auth, HttpClient, HttpError, RequestOpts};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::time::Duration;

const OPENAI_API_BASE: &str = "https://api.openai.com/v1/";
const COMPLETIONS_PATH: &str = "chat/completions";
/// Overall deadline for one completion call; there is no retry.
const REQUEST_TIMEOUT: Duration = Duration::from_secs(30);

/// Client for OpenAI-compatible `chat/completions` endpoints.
pub struct OpenAiClient {
    client: HttpClient,
    api_key: String,
    model: String,
}

#[derive(Debug, Serialize)]
struct ChatCompletionRequest<'a> {
    model: &'a str,
    messages: Vec<ChatMessage<'a>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    temperature: Option<f32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    top_p: Option<f32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    max_tokens: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    response_format: Option<ResponseFormat<'a>>,
}

#[derive(Debug, Serialize)]
struct ChatMessage<'a> {
    role: &'static str,
    content: &'a str,
}

#[derive(Debug, Serialize)]
struct ResponseFormat<'a> {
    #[serde(rename = "type")]
    kind: &'static str,
    json_schema: JsonSchemaFormat<'a>,
}

#[derive(Debug, Serialize)]
struct JsonSchemaFormat<'a> {
    name: &'a str,
    schema: &'a Value,
}

#[derive(Debug, Deserialize)]
struct ChatCompletionResponse {
    #[serde(default)]
    model: Option<String>,
    #[serde(default)]
    choices: Vec<Choice>,
    #[serde(default)]
    usage: Option<Usage>,
}

#[derive(Debug, Deserialize)]
struct Choice {
    #[serde(default)]
    message: Option<ChoiceMessage>,
}

#[derive(Debug, Deserialize)]
struct ChoiceMessage {
    #[serde(default)]
    content: Option<String>,
}

#[derive(Debug, Deserialize)]
struct Usage {
    #[serde(default)]
    total_tokens: Option<u32>,
}

impl OpenAiClient {
    /// Client against the public OpenAI API.
    pub fn new(api_key: String, model: String) -> Result<Self> {
        Self::with_base_url(api_key, model, OPENAI_API_BASE)
    }

    /// Client against any OpenAI-compatible gateway, e.g. OpenRouter.
    pub fn with_base_url(api_key: String, model: String, base_url: &str) -> Result<Self> {
        let base = if base_url.ends_with('/') {
            base_url.to_string()
        } else {
            format!("{base_url}/")
        };
        let client = HttpClient::new(&base)
            .map_err(|e| RelayError::Config(format!("HttpClient init failed: {e}")))?
            .with_timeout(REQUEST_TIMEOUT);

        Ok(Self {
            client,
            api_key,
            model,
        })
    }

    async fn complete(&self, req: &ChatCompletionRequest<'_>) -> Result<LlmResponse> {
        tracing::debug!(
            model = %self.model,
            messages = req.messages.len(),
            structured = req.response_format.is_some(),
            "openai.chat.request"
        );

        let opts = RequestOpts {
            auth: Some(Auth::Bearer(&self.api_key)),
            ..Default::default()
        };
        let raw: Value = self
            .client
            .post_json_opts(COMPLETIONS_PATH, req, opts)
            .await
            .map_err(http_to_relay)?;

        let parsed: ChatCompletionResponse = serde_json::from_value(raw.clone()).map_err(|e| {
            tracing::warn!(error = %e, "openai.chat.unexpected_shape");
            RelayError::UnexpectedResponse(format!("chat completion did not decode: {e}"))
        })?;

        let tokens_used = parsed.usage.and_then(|u| u.total_tokens);
        let text = parsed
            .choices
            .into_iter()
            .next()
            .and_then(|c| c.message)
            .and_then(|m| m.content)
            .ok_or_else(|| {
                tracing::warn!(reply = %raw, "openai.chat.missing_content");
                RelayError::UnexpectedResponse("missing choices[0].message.content".to_string())
            })?;

        Ok(LlmResponse {
            text,
            model: parsed.model,
            tokens_used,
            raw: Some(raw),
        })
    }
}

#[async_trait]
impl LlmClient for OpenAiClient {
    async fn generate(
        &self,
        prompt: &str,
        system_prompt: Option<&str>,
        max_tokens: Option<u32>,
        temperature: Option<f32>,
    ) -> Result<LlmResponse> {
        let req = ChatCompletionRequest {
            model: &self.model,
            messages: build_messages(system_prompt, prompt),
            temperature,
            top_p: None,
            max_tokens,
            response_format: None,
        };
        self.complete(&req).await
    }

    async fn generate_structured(
        &self,
        prompt: &str,
        system_prompt: &str,
        output: &StructuredOutput,
    ) -> Result<LlmResponse> {
        let req = ChatCompletionRequest {
            model: &self.model,
            messages: build_messages(Some(system_prompt), prompt),
            temperature: Some(0.0),
            top_p: Some(1.0),
            max_tokens: None,
            response_format: Some(ResponseFormat {
                kind: "json_schema",
                json_schema: JsonSchemaFormat {
                    name: &output.name,
                    schema: &output.schema,
                },
            }),
        };
        self.complete(&req).await
    }

    fn model_name(&self) -> &str {
        &self.model
    }
}

fn build_messages<'a>(system_prompt: Option<&'a str>, prompt: &'a str) -> Vec<ChatMessage<'a>> {
    let mut messages = Vec::with_capacity(2);
    if let Some(system) = system_prompt {
        messages.push(ChatMessage {
            role: "system",
            content: system,
        });
    }
    messages.push(ChatMessage {
        role: "user",
        content: prompt,
    });
    messages
}

fn http_to_relay(e: HttpError) -> RelayError {
    match e {
        HttpError::Timeout(_) => RelayError::Timeout,
        HttpError::Decode(msg, _) => RelayError::UnexpectedResponse(msg),
        HttpError::Url(msg) | HttpError::Build(msg) => RelayError::Config(msg),
        other => RelayError::Upstream(other.to_string()),
    }
}
