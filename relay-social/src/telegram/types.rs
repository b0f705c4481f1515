use serde::{Deserialize, Serialize};
use serde_json::Value;

/// `{ok, result, description}` wrapper around every Bot API reply.
#[derive(Debug, Clone, Deserialize)]
pub struct ApiEnvelope<T> {
    pub ok: bool,
    #[serde(default = "Option::default")]
    pub result: Option<T>,
    #[serde(default)]
    pub description: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Update {
    pub update_id: i64,
    #[serde(default)]
    pub message: Option<Message>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Message {
    pub message_id: i64,
    pub chat: Chat,
    #[serde(default)]
    pub from: Option<User>,
    #[serde(default)]
    pub date: Option<i64>,
    #[serde(default)]
    pub text: Option<String>,

    // Non-text payloads are only inspected for their kind.
    #[serde(default)]
    pub photo: Option<Value>,
    #[serde(default)]
    pub sticker: Option<Value>,
    #[serde(default)]
    pub document: Option<Value>,
    #[serde(default)]
    pub voice: Option<Value>,
    #[serde(default)]
    pub audio: Option<Value>,
    #[serde(default)]
    pub video: Option<Value>,
    #[serde(default)]
    pub location: Option<Value>,
    #[serde(default)]
    pub contact: Option<Value>,
}

impl Message {
    /// Short label for the payload kind, e.g. `text` or `photo`.
    pub fn content_type(&self) -> &'static str {
        let kinds = [
            ("text", self.text.is_some()),
            ("photo", self.photo.is_some()),
            ("sticker", self.sticker.is_some()),
            ("document", self.document.is_some()),
            ("voice", self.voice.is_some()),
            ("audio", self.audio.is_some()),
            ("video", self.video.is_some()),
            ("location", self.location.is_some()),
            ("contact", self.contact.is_some()),
        ];
        kinds
            .into_iter()
            .find_map(|(kind, present)| present.then_some(kind))
            .unwrap_or("other")
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Chat {
    pub id: i64,
    /// `private`, `group`, `supergroup` or `channel`.
    #[serde(rename = "type")]
    pub kind: String,
    #[serde(default)]
    pub title: Option<String>,
    #[serde(default)]
    pub username: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct User {
    pub id: i64,
    #[serde(default)]
    pub is_bot: bool,
    #[serde(default)]
    pub first_name: String,
    #[serde(default)]
    pub username: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn content_type_reflects_payload() {
        let text: Message = serde_json::from_value(json!({
            "message_id": 1,
            "chat": {"id": 7, "type": "private"},
            "text": "привіт"
        }))
        .unwrap();
        assert_eq!(text.content_type(), "text");

        let photo: Message = serde_json::from_value(json!({
            "message_id": 2,
            "chat": {"id": -100, "type": "supergroup", "title": "Кухня"},
            "photo": [{"file_id": "abc", "width": 90, "height": 90}]
        }))
        .unwrap();
        assert_eq!(photo.content_type(), "photo");
        assert_eq!(photo.chat.kind, "supergroup");

        let poll: Message = serde_json::from_value(json!({
            "message_id": 3,
            "chat": {"id": 7, "type": "private"},
            "poll": {"id": "1"}
        }))
        .unwrap();
        assert_eq!(poll.content_type(), "other");
    }

    #[test]
    fn envelope_error_has_no_result() {
        let env: ApiEnvelope<Vec<Update>> = serde_json::from_value(json!({
            "ok": false,
            "error_code": 409,
            "description": "Conflict: terminated by other getUpdates request"
        }))
        .unwrap();
        assert!(!env.ok);
        assert!(env.result.is_none());
        assert!(env.description.unwrap().starts_with("Conflict"));
    }
}
