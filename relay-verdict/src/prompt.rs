use relay_llm::traits::StructuredOutput;
use serde_json::json;

pub const VERDICT_SYSTEM_PROMPT: &str = "Ти бот для виявлення фейкових новин українською. \
Класифікуй текст як fake / real / uncertain. \
Дай короткі причини та список емоцій (factual/emotional/mixed). \
Пояснення значень: \
confidence — ймовірність, що новина правдива (0=повністю фейк, 1=повністю правдива); \
emotion=factual — нейтральний/сухий виклад; \
emotion=emotional — емоційний або маніпулятивний тон; \
emotion=mixed — змішаний тон (є і фактологія, і емоційні елементи). \
Поверни рівно JSON-об'єкт із ключами: \
result, confidence (0-1), emotion, reasons (list), sources (list). \
Строго дотримуйся формату JSON.";

/// JSON schema the provider must follow for a verdict.
pub fn verdict_output() -> StructuredOutput {
    StructuredOutput::new(
        "verdict",
        json!({
            "type": "object",
            "properties": {
                "result": {"type": "string", "enum": ["fake", "real", "uncertain"]},
                "confidence": {"type": "number"},
                "emotion": {"type": "string"},
                "reasons": {"type": "array", "items": {"type": "string"}},
                "sources": {"type": "array", "items": {"type": "string"}},
            },
            "required": ["result", "confidence", "emotion", "reasons", "sources"],
            "additionalProperties": false,
        }),
    )
}
