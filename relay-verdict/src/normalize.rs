//! Strict decoding of the model content and the deterministic remap applied on top.
use crate::error::VerdictError;
use crate::types::{AnalyzeResponse, RawVerdict, Tone, VerdictClass};
use serde::Deserialize;
use serde_json::Value;

const DEFAULT_RESULT: &str = "uncertain";
const DEFAULT_EMOTION: &str = "mixed";

/// Decode the assistant message content into a [`RawVerdict`].
///
/// The content must be a JSON object. Missing or `null` fields are tolerated,
/// wrongly typed ones are not.
pub fn parse_model_content(content: &str) -> Result<RawVerdict, VerdictError> {
    let value: Value = serde_json::from_str(content)?;
    if !value.is_object() {
        return Err(VerdictError::NotAnObject(json_kind(&value)));
    }
    Ok(RawVerdict::deserialize(value)?)
}

/// Resolve defaults, remap confidence and append the tone reason.
pub fn normalize(raw: RawVerdict, raw_model_output: Option<Value>) -> AnalyzeResponse {
    let result = raw.result.unwrap_or_else(|| DEFAULT_RESULT.to_string());
    let emotion = raw.emotion.unwrap_or_else(|| DEFAULT_EMOTION.to_string());

    let mut reasons = raw.reasons.unwrap_or_default();
    let tone_reason = Tone::from_label(&emotion).reason();
    if !reasons.iter().any(|r| r == tone_reason) {
        reasons.push(tone_reason.to_string());
    }

    tracing::debug!(
        result = %result,
        model_confidence = ?raw.confidence,
        emotion = %emotion,
        "verdict.normalized"
    );

    AnalyzeResponse {
        confidence: VerdictClass::from_label(&result).confidence(),
        result,
        emotion,
        reasons,
        sources: raw.sources.unwrap_or_default(),
        raw_model_output,
    }
}

fn json_kind(v: &Value) -> &'static str {
    match v {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn full_reply_is_remapped() {
        let raw = parse_model_content(
            r#"{"result":"real","confidence":0.42,"emotion":"factual",
                "reasons":["Є посилання на джерела"],"sources":["https://example.org"]}"#,
        )
        .unwrap();
        let out = normalize(raw, None);

        assert_eq!(out.result, "real");
        assert_eq!(out.confidence, 0.9);
        assert_eq!(out.emotion, "factual");
        assert_eq!(
            out.reasons,
            vec![
                "Є посилання на джерела".to_string(),
                Tone::Factual.reason().to_string()
            ]
        );
        assert_eq!(out.sources, vec!["https://example.org".to_string()]);
    }

    #[test]
    fn missing_and_null_fields_take_defaults() {
        let raw = parse_model_content(r#"{"confidence": null, "reasons": null}"#).unwrap();
        let out = normalize(raw, None);

        assert_eq!(out.result, "uncertain");
        assert_eq!(out.confidence, 0.5);
        assert_eq!(out.emotion, "mixed");
        assert_eq!(out.reasons, vec![Tone::Mixed.reason().to_string()]);
        assert!(out.sources.is_empty());
    }

    #[test]
    fn tone_reason_is_not_duplicated() {
        let reason = Tone::Emotional.reason();
        let content = json!({
            "result": "fake",
            "emotion": "emotional",
            "reasons": ["Клікбейтний заголовок", reason],
        })
        .to_string();
        let out = normalize(parse_model_content(&content).unwrap(), None);

        assert_eq!(out.confidence, 0.1);
        assert_eq!(out.reasons.iter().filter(|r| *r == reason).count(), 1);
        assert_eq!(out.reasons.len(), 2);
    }

    #[test]
    fn unknown_result_label_is_uncertain_but_kept() {
        let out = normalize(
            parse_model_content(r#"{"result":"satire","emotion":"ironic"}"#).unwrap(),
            None,
        );
        assert_eq!(out.result, "satire");
        assert_eq!(out.confidence, 0.5);
        assert_eq!(out.reasons, vec![Tone::Mixed.reason().to_string()]);
    }

    #[test]
    fn raw_output_is_carried_through() {
        let provider = json!({"id": "chatcmpl-1", "choices": []});
        let out = normalize(RawVerdict::default(), Some(provider.clone()));
        assert_eq!(out.raw_model_output, Some(provider));
    }

    #[test]
    fn rejects_non_json_and_non_objects() {
        assert!(matches!(
            parse_model_content("The news looks fake."),
            Err(VerdictError::Malformed(_))
        ));
        assert!(matches!(
            parse_model_content("[]"),
            Err(VerdictError::NotAnObject("array"))
        ));
        assert!(matches!(
            parse_model_content("\"real\""),
            Err(VerdictError::NotAnObject("string"))
        ));
    }

    #[test]
    fn rejects_wrongly_typed_fields() {
        assert!(parse_model_content(r#"{"result":"real","reasons":"one reason"}"#).is_err());
        assert!(parse_model_content(r#"{"confidence":"high"}"#).is_err());
    }
}
