use relay_common::RelayError;

/// The model's content could not be read as a verdict.
#[derive(Debug, thiserror::Error)]
pub enum VerdictError {
    #[error("model content is not a valid verdict: {0}")]
    Malformed(#[from] serde_json::Error),

    #[error("model content is a JSON {0}, expected an object")]
    NotAnObject(&'static str),
}

/// Failure of a single analyze request. Every variant is terminal for that request.
#[derive(Debug, thiserror::Error)]
pub enum AnalyzeError {
    #[error("Text is too short")]
    TextTooShort { min: usize, actual: usize },

    #[error("LLM unavailable (missing OPENAI_API_KEY)")]
    Unavailable,

    #[error("LLM temporarily unavailable")]
    Upstream(#[source] RelayError),

    #[error("Unexpected LLM response")]
    UnexpectedResponse(#[source] RelayError),

    #[error("LLM response parse error")]
    Parse(#[from] VerdictError),
}

impl From<RelayError> for AnalyzeError {
    fn from(e: RelayError) -> Self {
        match e {
            RelayError::UnexpectedResponse(_) => Self::UnexpectedResponse(e),
            other => Self::Upstream(other),
        }
    }
}
