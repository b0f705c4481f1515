//! Chat relay: Telegram text in, LLM reply out. No conversation state is kept.
use relay_llm::traits::LlmClient;
use relay_social::telegram::{TelegramApi, TelegramError, Update};
use std::sync::Arc;
use std::time::Duration;
use tokio_util::sync::CancellationToken;

const POLL_TIMEOUT_SECS: u64 = 30;
const POLL_ERROR_BACKOFF: Duration = Duration::from_secs(1);

pub struct RelayBot {
    telegram: TelegramApi,
    llm: Arc<dyn LlmClient>,
    system_prompt: String,
    poll_timeout_secs: u64,
}

impl RelayBot {
    pub fn new(telegram: TelegramApi, llm: Arc<dyn LlmClient>, system_prompt: String) -> Self {
        Self {
            telegram,
            llm,
            system_prompt,
            poll_timeout_secs: POLL_TIMEOUT_SECS,
        }
    }

    pub fn with_poll_timeout(mut self, secs: u64) -> Self {
        self.poll_timeout_secs = secs;
        self
    }

    /// Poll until `cancel` fires. Failures are logged and polling resumes.
    pub async fn run(&self, cancel: CancellationToken) {
        tracing::info!(model = self.llm.model_name(), "bot.started");
        let mut offset = None;
        loop {
            let polled = tokio::select! {
                _ = cancel.cancelled() => break,
                polled = self.poll_once(offset) => polled,
            };
            match polled {
                Ok(next) => offset = next,
                Err(e) => {
                    tracing::warn!(error = %e, "bot.poll.failed");
                    tokio::select! {
                        _ = cancel.cancelled() => break,
                        _ = tokio::time::sleep(POLL_ERROR_BACKOFF) => {}
                    }
                }
            }
        }
        tracing::info!("bot.stopped");
    }

    /// Fetch one batch of updates, answer the text messages and return the next offset.
    pub async fn poll_once(&self, offset: Option<i64>) -> Result<Option<i64>, TelegramError> {
        let updates = self
            .telegram
            .get_updates(offset, self.poll_timeout_secs)
            .await?;

        let mut next = offset;
        for update in updates {
            next = Some(update.update_id + 1);
            self.handle_update(update).await;
        }
        Ok(next)
    }

    async fn handle_update(&self, update: Update) {
        let Some(message) = update.message else {
            tracing::debug!(update_id = update.update_id, "bot.update.skipped");
            return;
        };
        let chat_id = message.chat.id;
        tracing::info!(
            content_type = message.content_type(),
            chat_type = %message.chat.kind,
            chat_id,
            "bot.message"
        );

        let Some(text) = message.text.as_deref() else {
            return;
        };

        let reply = match self
            .llm
            .generate(text, Some(&self.system_prompt), None, None)
            .await
        {
            Ok(reply) => reply.text,
            Err(e) => {
                tracing::warn!(chat_id, error = %e, "bot.llm.failed");
                return;
            }
        };
        if reply.trim().is_empty() {
            tracing::warn!(chat_id, "bot.llm.empty_reply");
            return;
        }

        if let Err(e) = self.telegram.send_message(chat_id, &reply).await {
            tracing::warn!(chat_id, error = %e, "bot.send.failed");
        }
    }
}
