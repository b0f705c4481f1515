//! Minimal Telegram Bot API wrapper: `getMe`, `getUpdates`, `sendMessage`.
use crate::telegram::types::{ApiEnvelope, Message, Update, User};
use relay_http::{HttpClient, HttpError, RequestOpts};
use serde::Serialize;
use serde::de::DeserializeOwned;
use std::borrow::Cow;
use std::time::Duration;

const TELEGRAM_API_BASE: &str = "https://api.telegram.org/";
/// Slack on top of the long-poll window before the request itself times out.
const POLL_GRACE: Duration = Duration::from_secs(10);

#[derive(Debug, thiserror::Error)]
pub enum TelegramError {
    #[error("telegram request failed: {0}")]
    Http(#[from] HttpError),
    #[error("telegram api error: {0}")]
    Api(String),
    #[error("telegram reply for {0} carried no result")]
    MissingResult(&'static str),
}

#[derive(Clone)]
pub struct TelegramApi {
    http: HttpClient,
    token: String,
}

#[derive(Serialize)]
struct SendMessage<'a> {
    chat_id: i64,
    text: &'a str,
}

impl TelegramApi {
    pub fn new(token: String) -> Result<Self, TelegramError> {
        Self::with_base_url(token, TELEGRAM_API_BASE)
    }

    /// Point the client at another Bot API server, e.g. a local one.
    pub fn with_base_url(token: String, base_url: &str) -> Result<Self, TelegramError> {
        let base = if base_url.ends_with('/') {
            Cow::Borrowed(base_url)
        } else {
            Cow::Owned(format!("{base_url}/"))
        };
        let http = HttpClient::new(&base)?;
        Ok(Self { http, token })
    }

    /// The bot's own account; a cheap way to validate the token.
    pub async fn get_me(&self) -> Result<User, TelegramError> {
        let env: ApiEnvelope<User> = self
            .http
            .get_json(&self.method_path("getMe"), self.opts(None))
            .await?;
        unwrap_envelope(env, "getMe")
    }

    /// Long-poll for updates newer than `offset`.
    pub async fn get_updates(
        &self,
        offset: Option<i64>,
        timeout_secs: u64,
    ) -> Result<Vec<Update>, TelegramError> {
        let mut query: Vec<(&str, Cow<'_, str>)> =
            vec![("timeout", timeout_secs.to_string().into())];
        if let Some(offset) = offset {
            query.push(("offset", offset.to_string().into()));
        }

        let opts = RequestOpts {
            query: Some(query),
            ..self.opts(Some(Duration::from_secs(timeout_secs) + POLL_GRACE))
        };
        let env: ApiEnvelope<Vec<Update>> = self
            .http
            .get_json(&self.method_path("getUpdates"), opts)
            .await?;
        let updates = unwrap_envelope(env, "getUpdates")?;
        tracing::debug!(count = updates.len(), ?offset, "telegram.updates");
        Ok(updates)
    }

    pub async fn send_message(&self, chat_id: i64, text: &str) -> Result<Message, TelegramError> {
        let env: ApiEnvelope<Message> = self
            .http
            .post_json_opts(
                &self.method_path("sendMessage"),
                &SendMessage { chat_id, text },
                self.opts(None),
            )
            .await?;
        let sent = unwrap_envelope(env, "sendMessage")?;
        tracing::debug!(chat_id, message_id = sent.message_id, "telegram.sent");
        Ok(sent)
    }

    // `./` keeps `bot123:abc` from being read as a URL scheme.
    fn method_path(&self, method: &str) -> String {
        format!("./bot{}/{method}", self.token)
    }

    fn opts(&self, timeout: Option<Duration>) -> RequestOpts<'static> {
        RequestOpts {
            timeout,
            redact_path: true,
            ..Default::default()
        }
    }
}

fn unwrap_envelope<T: DeserializeOwned>(
    env: ApiEnvelope<T>,
    method: &'static str,
) -> Result<T, TelegramError> {
    if !env.ok {
        return Err(TelegramError::Api(
            env.description
                .unwrap_or_else(|| format!("{method} returned ok=false")),
        ));
    }
    env.result.ok_or(TelegramError::MissingResult(method))
}
