//! Field extraction from the loosely-shaped gateway webhook envelope.

use serde_json::Value;

/// Event discriminator of an inbound user message.
pub const INCOMING_MESSAGE: &str = "incomingMessageReceived";

type FieldPath = &'static [&'static str];

// Candidate locations in priority order; first non-empty string wins.
const CHAT_ID_PATHS: &[FieldPath] = &[
    &["body", "senderData", "chatId"],
    &["senderData", "chatId"],
    &["body", "chatId"],
    &["chatId"],
];

const SENDER_PATHS: &[FieldPath] = &[&["body", "senderData", "sender"], &["senderData", "sender"]];

// Typed text first, then quoted/linked text, then taps on buttons and list rows.
const TEXT_PATHS: &[FieldPath] = &[
    &["body", "messageData", "textMessageData", "textMessage"],
    &["messageData", "textMessageData", "textMessage"],
    &["body", "messageData", "extendedTextMessageData", "text"],
    &["messageData", "extendedTextMessageData", "text"],
    &["body", "messageData", "buttonsResponseMessage", "selectedButtonText"],
    &["messageData", "buttonsResponseMessage", "selectedButtonText"],
    &["body", "messageData", "listResponseMessage", "title"],
    &["messageData", "listResponseMessage", "title"],
];

/// Logical fields pulled out of one webhook payload.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct WebhookFields {
    pub type_webhook: Option<String>,
    pub chat_id: Option<String>,
    pub sender_id: Option<String>,
    pub text: Option<String>,
}

impl WebhookFields {
    /// Extracts all fields. Message fields are only read for incoming-message
    /// events; other event types carry just the discriminator.
    pub fn extract(payload: &Value) -> Self {
        let type_webhook = lookup(payload, &["typeWebhook"]);
        let mut fields = WebhookFields {
            type_webhook,
            ..Default::default()
        };
        if !fields.is_incoming_message() {
            return fields;
        }
        fields.chat_id = first_present(payload, CHAT_ID_PATHS);
        fields.sender_id = first_present(payload, SENDER_PATHS);
        fields.text = first_present(payload, TEXT_PATHS);
        fields
    }

    pub fn is_incoming_message(&self) -> bool {
        self.type_webhook.as_deref() == Some(INCOMING_MESSAGE)
    }

    /// Whether the event was produced by the instance itself.
    pub fn is_self_echo(&self, instance_id: &str) -> bool {
        !instance_id.is_empty()
            && self
                .sender_id
                .as_deref()
                .is_some_and(|sender| sender.contains(instance_id))
    }
}

fn first_present(payload: &Value, paths: &[FieldPath]) -> Option<String> {
    paths.iter().find_map(|path| lookup(payload, path))
}

fn lookup(payload: &Value, path: &[&str]) -> Option<String> {
    let mut node = payload;
    for key in path {
        node = node.get(key)?;
    }
    node.as_str()
        .filter(|value| !value.is_empty())
        .map(str::to_string)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn reads_nested_body_envelope() {
        let payload = json!({
            "typeWebhook": "incomingMessageReceived",
            "body": {
                "senderData": { "chatId": "123@c.us", "sender": "456@c.us" },
                "messageData": { "textMessageData": { "textMessage": "меню" } }
            }
        });
        let fields = WebhookFields::extract(&payload);
        assert!(fields.is_incoming_message());
        assert_eq!(fields.chat_id.as_deref(), Some("123@c.us"));
        assert_eq!(fields.sender_id.as_deref(), Some("456@c.us"));
        assert_eq!(fields.text.as_deref(), Some("меню"));
    }

    #[test]
    fn reads_flat_envelope() {
        let payload = json!({
            "typeWebhook": "incomingMessageReceived",
            "senderData": { "chatId": "1@c.us", "sender": "1@c.us" },
            "messageData": { "textMessageData": { "textMessage": "2" } }
        });
        let fields = WebhookFields::extract(&payload);
        assert_eq!(fields.chat_id.as_deref(), Some("1@c.us"));
        assert_eq!(fields.text.as_deref(), Some("2"));
    }

    #[test]
    fn button_taps_and_extended_text_are_read() {
        let tap = json!({
            "typeWebhook": "incomingMessageReceived",
            "body": {
                "senderData": { "chatId": "1@c.us" },
                "messageData": {
                    "typeMessage": "buttonsResponseMessage",
                    "buttonsResponseMessage": {
                        "stanzaId": "ABC",
                        "selectedButtonId": "btn_2",
                        "selectedButtonText": "🛏️ Номерной фонд"
                    }
                }
            }
        });
        assert_eq!(
            WebhookFields::extract(&tap).text.as_deref(),
            Some("🛏️ Номерной фонд")
        );

        let row = json!({
            "typeWebhook": "incomingMessageReceived",
            "senderData": { "chatId": "1@c.us" },
            "messageData": { "listResponseMessage": { "title": "Комфорт", "rowId": "option_0_0" } }
        });
        assert_eq!(WebhookFields::extract(&row).text.as_deref(), Some("Комфорт"));

        let extended = json!({
            "typeWebhook": "incomingMessageReceived",
            "senderData": { "chatId": "1@c.us" },
            "messageData": { "extendedTextMessageData": { "text": "контакты" } }
        });
        assert_eq!(WebhookFields::extract(&extended).text.as_deref(), Some("контакты"));
    }

    #[test]
    fn typed_text_outranks_button_text() {
        let payload = json!({
            "typeWebhook": "incomingMessageReceived",
            "senderData": { "chatId": "1@c.us" },
            "messageData": {
                "textMessageData": { "textMessage": "меню" },
                "buttonsResponseMessage": { "selectedButtonText": "📞 Контакты" }
            }
        });
        assert_eq!(WebhookFields::extract(&payload).text.as_deref(), Some("меню"));
    }

    #[test]
    fn earlier_paths_win_and_empty_values_are_skipped() {
        let payload = json!({
            "typeWebhook": "incomingMessageReceived",
            "body": { "senderData": { "chatId": "" }, "chatId": "body@c.us" },
            "senderData": { "chatId": "flat@c.us" },
            "chatId": "top@c.us"
        });
        let fields = WebhookFields::extract(&payload);
        assert_eq!(fields.chat_id.as_deref(), Some("flat@c.us"));
        assert_eq!(fields.text, None);
        assert_eq!(fields.sender_id, None);
    }

    #[test]
    fn non_message_events_skip_field_lookup() {
        let payload = json!({
            "typeWebhook": "outgoingMessageStatus",
            "senderData": { "chatId": "1@c.us" }
        });
        let fields = WebhookFields::extract(&payload);
        assert!(!fields.is_incoming_message());
        assert_eq!(fields.chat_id, None);
    }

    #[test]
    fn non_object_payloads_are_tolerated() {
        for payload in [json!(null), json!([1, 2]), json!("text"), json!({ "typeWebhook": 5 })] {
            let fields = WebhookFields::extract(&payload);
            assert_eq!(fields, WebhookFields::default());
        }
    }

    #[test]
    fn self_echo_matches_instance_id_substring() {
        let fields = WebhookFields {
            sender_id: Some("1101000001@c.us".into()),
            ..Default::default()
        };
        assert!(fields.is_self_echo("1101000001"));
        assert!(!fields.is_self_echo("2202"));
        assert!(!fields.is_self_echo(""));
        assert!(!WebhookFields::default().is_self_echo("1101000001"));
    }
}
