//! One-shot messages carried across a redirect in the session.

use serde::{Deserialize, Serialize};
use tower_sessions::Session;

pub const FLASH_KEY: &str = "flash";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FlashLevel {
    Info,
    Success,
    Error,
}

impl FlashLevel {
    pub fn css_class(&self) -> &'static str {
        match self {
            FlashLevel::Info => "is-info",
            FlashLevel::Success => "is-success",
            FlashLevel::Error => "is-danger",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FlashMessage {
    pub level: FlashLevel,
    pub message: String,
}

/// Queue a message for the next rendered page, replacing any pending one.
pub async fn push(
    session: &Session,
    level: FlashLevel,
    message: impl Into<String>,
) -> Result<(), tower_sessions::session::Error> {
    let flash = FlashMessage {
        level,
        message: message.into(),
    };
    session.insert(FLASH_KEY, flash).await
}

/// Remove and return the pending message, if any.
pub async fn take(
    session: &Session,
) -> Result<Option<FlashMessage>, tower_sessions::session::Error> {
    session.remove::<FlashMessage>(FLASH_KEY).await
}
