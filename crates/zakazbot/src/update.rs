//! Inbound webhook envelope types.
//!
//! The subset of the Bot API update object this handler reads. Extra
//! fields are ignored; the fields we do read are typed, so a malformed
//! envelope fails the parse instead of half-working.

use serde::Deserialize;

/// One inbound update delivered by the messaging platform.
#[derive(Debug, Clone, Deserialize)]
pub struct TelegramUpdate {
    pub update_id: i64,
    #[serde(default)]
    pub message: Option<IncomingMessage>,
    #[serde(default)]
    pub callback_query: Option<CallbackQuery>,
}

/// A chat message inside an update.
#[derive(Debug, Clone, Deserialize)]
pub struct IncomingMessage {
    pub from: Sender,
    #[serde(default)]
    pub text: Option<String>,
    #[serde(default)]
    pub contact: Option<Contact>,
}

/// Who sent the message. `from.id` doubles as the reply chat id.
#[derive(Debug, Clone, Deserialize)]
pub struct Sender {
    pub id: i64,
    pub first_name: String,
    #[serde(default)]
    pub username: Option<String>,
}

/// Shared-contact attachment.
#[derive(Debug, Clone, Deserialize)]
pub struct Contact {
    pub phone_number: String,
}

/// Inline-button press. Part of the envelope; the command handler
/// currently ignores these.
#[derive(Debug, Clone, Deserialize)]
pub struct CallbackQuery {
    pub id: String,
    pub from: Sender,
    #[serde(default)]
    pub data: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_a_full_text_update() {
        let json = r#"{
            "update_id": 42,
            "message": {
                "message_id": 7,
                "from": { "id": 123456789, "first_name": "Азиз", "username": "aziz" },
                "text": "/stats"
            }
        }"#;
        let update: TelegramUpdate = serde_json::from_str(json).unwrap();
        let message = update.message.unwrap();
        assert_eq!(message.from.id, 123456789);
        assert_eq!(message.text.as_deref(), Some("/stats"));
    }

    #[test]
    fn update_without_message_still_parses() {
        let update: TelegramUpdate = serde_json::from_str(r#"{ "update_id": 1 }"#).unwrap();
        assert!(update.message.is_none());
        assert!(update.callback_query.is_none());
    }

    #[test]
    fn callback_query_is_carried_along() {
        let json = r#"{
            "update_id": 2,
            "callback_query": {
                "id": "abc",
                "from": { "id": 5, "first_name": "А" },
                "data": "noop"
            }
        }"#;
        let update: TelegramUpdate = serde_json::from_str(json).unwrap();
        assert_eq!(update.callback_query.unwrap().data.as_deref(), Some("noop"));
    }
}
