use crate::cache::VerdictCache;
use crate::error::AnalyzeError;
use crate::normalize::{normalize, parse_model_content};
use crate::prompt::{VERDICT_SYSTEM_PROMPT, verdict_output};
use crate::types::AnalyzeResponse;
use relay_common::LlmConfig;
use relay_llm::client_from_config;
use relay_llm::traits::{LlmClient, StructuredOutput};
use std::sync::Arc;

/// Shortest accepted text, in characters, after stripping.
pub const MIN_TEXT_CHARS: usize = 10;
const SNIPPET_CHARS: usize = 120;

/// The analyze flow: length check, cache, LLM call, normalization.
pub struct VerdictService {
    llm: Option<Arc<dyn LlmClient>>,
    cache: VerdictCache,
    output: StructuredOutput,
}

impl VerdictService {
    /// `None` keeps the service up but answers cache misses with
    /// [`AnalyzeError::Unavailable`].
    pub fn new(llm: Option<Arc<dyn LlmClient>>) -> Self {
        Self {
            llm,
            cache: VerdictCache::new(),
            output: verdict_output(),
        }
    }

    pub fn from_config(config: &LlmConfig) -> relay_common::Result<Self> {
        let llm: Option<Arc<dyn LlmClient>> = match config {
            LlmConfig::None => None,
            configured => Some(client_from_config(configured)?),
        };
        Ok(Self::new(llm))
    }

    pub fn cache(&self) -> &VerdictCache {
        &self.cache
    }

    pub fn is_llm_configured(&self) -> bool {
        self.llm.is_some()
    }

    pub fn model_name(&self) -> Option<&str> {
        self.llm.as_deref().map(|l| l.model_name())
    }

    /// Classify `text`, serving repeated texts from the cache.
    pub async fn analyze(&self, text: &str) -> Result<Arc<AnalyzeResponse>, AnalyzeError> {
        let text = text.trim();
        let text_len = text.chars().count();
        if text_len < MIN_TEXT_CHARS {
            return Err(AnalyzeError::TextTooShort {
                min: MIN_TEXT_CHARS,
                actual: text_len,
            });
        }

        tracing::info!(
            text_len,
            llm = self.llm.is_some(),
            model = self.model_name().unwrap_or("-"),
            "verdict.analyze.request"
        );
        tracing::debug!(snippet = %snippet(text), "verdict.analyze.snippet");

        if let Some(hit) = self.cache.get(text) {
            tracing::info!(text_len, "verdict.cache.hit");
            return Ok(hit);
        }

        let Some(llm) = self.llm.as_ref() else {
            tracing::error!("no LLM credentials configured; cannot process request");
            return Err(AnalyzeError::Unavailable);
        };

        let reply = llm
            .generate_structured(text, VERDICT_SYSTEM_PROMPT, &self.output)
            .await
            .map_err(|e| {
                tracing::warn!(error = %e, "verdict.llm.failed");
                AnalyzeError::from(e)
            })?;

        let raw = parse_model_content(&reply.text).map_err(|e| {
            tracing::info!(content = %reply.text, error = %e, "verdict.llm.content_not_json");
            AnalyzeError::from(e)
        })?;

        let verdict = Arc::new(normalize(raw, reply.raw));
        self.cache.insert(text.to_string(), Arc::clone(&verdict));
        tracing::info!(
            result = %verdict.result,
            confidence = verdict.confidence,
            cached = self.cache.len(),
            "verdict.analyze.done"
        );
        Ok(verdict)
    }
}

fn snippet(text: &str) -> String {
    text.chars()
        .take(SNIPPET_CHARS)
        .map(|c| if c == '\n' { ' ' } else { c })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn snippet_is_single_line_and_bounded() {
        let long = "рядок\n".repeat(100);
        let s = snippet(&long);
        assert_eq!(s.chars().count(), SNIPPET_CHARS);
        assert!(!s.contains('\n'));
    }

    #[test]
    fn unconfigured_service_has_no_model() {
        let svc = VerdictService::from_config(&LlmConfig::None).unwrap();
        assert!(!svc.is_llm_configured());
        assert_eq!(svc.model_name(), None);
    }
}
