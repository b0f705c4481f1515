use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Structured output as the model produced it. Any field may be missing.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct RawVerdict {
    #[serde(default)]
    pub result: Option<String>,
    /// Provider-supplied probability; advisory only, never emitted.
    #[serde(default)]
    pub confidence: Option<f64>,
    #[serde(default)]
    pub emotion: Option<String>,
    #[serde(default)]
    pub reasons: Option<Vec<String>>,
    #[serde(default)]
    pub sources: Option<Vec<String>>,
}

/// Normalized verdict returned by `POST /analyze`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AnalyzeResponse {
    pub result: String,
    /// One of 0.1, 0.5 or 0.9.
    pub confidence: f64,
    pub emotion: String,
    pub reasons: Vec<String>,
    pub sources: Vec<String>,
    /// The provider's complete chat-completion reply.
    pub raw_model_output: Option<Value>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum VerdictClass {
    Real,
    Fake,
    Uncertain,
}

impl VerdictClass {
    pub fn from_label(label: &str) -> Self {
        match label {
            "real" => Self::Real,
            "fake" => Self::Fake,
            _ => Self::Uncertain,
        }
    }

    /// Fixed trust level emitted for the class.
    pub fn confidence(self) -> f64 {
        match self {
            Self::Real => 0.9,
            Self::Fake => 0.1,
            Self::Uncertain => 0.5,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Tone {
    Emotional,
    Factual,
    Mixed,
}

impl Tone {
    pub fn from_label(label: &str) -> Self {
        match label {
            "emotional" => Self::Emotional,
            "factual" => Self::Factual,
            _ => Self::Mixed,
        }
    }

    /// Sentence explaining how the tone affected the verdict.
    pub fn reason(self) -> &'static str {
        match self {
            Self::Emotional => {
                "Емоційний/маніпулятивний тон тексту вплинув на зниження довіри до новини."
            }
            Self::Factual => {
                "Тон тексту переважно нейтральний/фактологічний, тому головну роль відіграють факти та джерела."
            }
            Self::Mixed => {
                "У тексті поєднуються емоційні елементи та фактична інформація; тон враховано під час оцінки."
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn labels_are_case_sensitive() {
        assert_eq!(VerdictClass::from_label("real"), VerdictClass::Real);
        assert_eq!(VerdictClass::from_label("Real"), VerdictClass::Uncertain);
        assert_eq!(Tone::from_label("FACTUAL"), Tone::Mixed);
    }

    #[test]
    fn confidence_table() {
        assert_eq!(VerdictClass::Real.confidence(), 0.9);
        assert_eq!(VerdictClass::Fake.confidence(), 0.1);
        assert_eq!(VerdictClass::from_label("partly true").confidence(), 0.5);
    }
}
