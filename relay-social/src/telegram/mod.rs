//! Telegram Bot API surface: client wrapper and response models.
//!
//! The bot token is part of every request path, so all calls go out with path
//! redaction enabled and the token never reaches the logs.
pub mod client;
pub mod types;

pub use client::{TelegramApi, TelegramError};
pub use types::{Chat, Message, Update, User};
