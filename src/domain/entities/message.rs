use serde::{Deserialize, Serialize};

/// Sender email used for every synthetic bot reply
pub const BOT_EMAIL: &str = "bot@getpantheon.com";

/// Display name used for every synthetic bot reply
pub const BOT_NAME: &str = "Bot";

/// A chat message as it travels between clients and the hub.
///
/// The serialized field names are the wire names clients send and receive.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct ChatMessage {
    #[serde(rename = "email")]
    pub sender_email: String,
    #[serde(rename = "username")]
    pub sender_name: String,
    #[serde(rename = "message")]
    pub body: String,
}

impl ChatMessage {
    pub fn new(
        sender_email: impl Into<String>,
        sender_name: impl Into<String>,
        body: impl Into<String>,
    ) -> Self {
        Self {
            sender_email: sender_email.into(),
            sender_name: sender_name.into(),
            body: body.into(),
        }
    }

    /// Build a reply spoken by the synthetic bot participant
    pub fn from_bot(body: impl Into<String>) -> Self {
        Self::new(BOT_EMAIL, BOT_NAME, body)
    }
}
