//! Messaging platform clients used by the chat relay bot.
//!
//! Only the Telegram Bot API is implemented: long polling and plain-text replies.
pub mod telegram;
