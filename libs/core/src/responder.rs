use lakebot_greenapi::{GatewayResult, SharedGateway, format};
use tracing::{info, warn};

use crate::catalog::Topic;
use crate::commands::{self, Action};
use crate::menu;

const NUMBER_HINT: &str = "Просто отправьте номер нужного варианта!";

/// Turns dispatch actions into outbound gateway messages.
#[derive(Clone)]
pub struct Responder {
    gateway: SharedGateway,
}

impl Responder {
    pub fn new(gateway: SharedGateway) -> Self {
        Self { gateway }
    }

    /// Welcome text plus the main menu. Falls back to a numbered text menu
    /// when even the gateway's own button fallback failed.
    pub async fn send_welcome(&self, chat_id: &str) -> GatewayResult {
        let labels = menu::labels();
        let result = self
            .gateway
            .button_menu(chat_id, Topic::Welcome.text(), &labels)
            .await;
        if result.is_success() {
            return result;
        }

        warn!(chat_id, "welcome menu not delivered; retrying as plain text");
        let text = format!(
            "{}\n\n{NUMBER_HINT}",
            format::numbered_menu(Topic::Welcome.text(), &labels)
        );
        self.gateway.send_text(chat_id, &text).await
    }

    /// Resolves `text` and performs the matching action.
    pub async fn respond(&self, chat_id: &str, text: &str) -> (Action, GatewayResult) {
        let action = commands::resolve(text);
        info!(chat_id, action = ?action, "dispatching command");
        let result = self.perform(chat_id, action).await;
        (action, result)
    }

    pub async fn perform(&self, chat_id: &str, action: Action) -> GatewayResult {
        match action {
            Action::ReshowMenu => self.send_welcome(chat_id).await,
            Action::SendCatalog(topic) => self.gateway.send_text(chat_id, topic.text()).await,
            Action::SendOperatorAck => {
                self.gateway
                    .send_text(chat_id, Topic::Operator.text())
                    .await
            }
            Action::Reply(text) => self.gateway.send_text(chat_id, text).await,
        }
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use lakebot_greenapi::GatewayKind;
    use lakebot_greenapi::testkit::RecordingGateway;

    use super::*;
    use crate::catalog::NO_TRANSFER;

    fn responder() -> (Arc<RecordingGateway>, Responder) {
        let gateway = Arc::new(RecordingGateway::new());
        (gateway.clone(), Responder::new(gateway))
    }

    #[tokio::test]
    async fn welcome_goes_out_as_buttons() {
        let (gateway, responder) = responder();
        assert!(responder.send_welcome("7@c.us").await.is_success());

        let calls = gateway.calls();
        assert_eq!(calls.len(), 1);
        assert_eq!(calls[0].kind, GatewayKind::ButtonMenu);
        assert_eq!(calls[0].text(), Some(Topic::Welcome.text()));
        let buttons = calls[0].payload.as_ref().unwrap()["buttons"]
            .as_array()
            .unwrap()
            .len();
        assert_eq!(buttons, menu::MAIN_MENU.len());
    }

    #[tokio::test]
    async fn welcome_retries_as_hinted_text_when_everything_fails() {
        let (gateway, responder) = responder();
        gateway.fail(GatewayKind::ButtonMenu);
        gateway.fail(GatewayKind::Message);
        let result = responder.send_welcome("7@c.us").await;
        assert!(!result.is_success());

        let texts = gateway.calls_of(GatewayKind::Message);
        assert_eq!(texts.len(), 2);
        let last = texts[1].text().unwrap();
        assert!(last.starts_with(Topic::Welcome.text()));
        assert!(last.contains("\n1. 🔔 Важная информация\n"));
        assert!(last.ends_with(NUMBER_HINT));
    }

    #[tokio::test]
    async fn respond_sends_catalog_entry_for_digit() {
        let (gateway, responder) = responder();
        let (action, result) = responder.respond("7@c.us", " 6 ").await;
        assert_eq!(action, Action::SendCatalog(Topic::Directions));
        assert!(result.is_success());
        assert_eq!(gateway.calls()[0].text(), Some(Topic::Directions.text()));
    }

    #[tokio::test]
    async fn operator_request_only_acknowledges() {
        let (gateway, responder) = responder();
        let (action, _) = responder.respond("7@c.us", "Оператор").await;
        assert_eq!(action, Action::SendOperatorAck);

        let calls = gateway.calls();
        assert_eq!(calls.len(), 1);
        assert_eq!(calls[0].kind, GatewayKind::Message);
        assert_eq!(calls[0].text(), Some(Topic::Operator.text()));
    }

    #[tokio::test]
    async fn menu_alias_reshows_welcome() {
        let (gateway, responder) = responder();
        responder.respond("7@c.us", "/start").await;
        assert_eq!(gateway.calls_of(GatewayKind::ButtonMenu).len(), 1);
    }

    #[tokio::test]
    async fn transfer_and_unknown_replies() {
        let (gateway, responder) = responder();
        responder.respond("7@c.us", "трансфер").await;
        responder.respond("7@c.us", "сколько стоит рыбалка?").await;

        let texts: Vec<_> = gateway
            .calls()
            .iter()
            .map(|call| call.text().unwrap_or_default().to_string())
            .collect();
        assert_eq!(texts, vec![NO_TRANSFER.to_string(), Topic::Unknown.text().to_string()]);
    }
}
