use std::sync::Arc;

use async_trait::async_trait;
use serde_json::Value;
use tracing::{info, warn};

use crate::format::{self, MenuSection};
use crate::types::{GatewayKind, GatewayResult};

/// Shared gateway handle used across services.
pub type SharedGateway = Arc<dyn Gateway>;

/// Outbound side of the messaging gateway.
///
/// Implementors only provide [`Gateway::send`]; the typed helpers build the
/// payloads and apply the rich-to-plain fallbacks on top of it.
#[async_trait]
pub trait Gateway: Send + Sync {
    /// Performs one remote operation. Never fails across this boundary.
    async fn send(&self, kind: GatewayKind, payload: Option<Value>) -> GatewayResult;

    async fn send_text(&self, chat_id: &str, text: &str) -> GatewayResult {
        let preview: String = text.chars().take(100).collect();
        info!(chat_id, preview = %preview, "sending text message");
        let result = self
            .send(GatewayKind::Message, Some(format::text_payload(chat_id, text)))
            .await;
        if let Some(err) = result.error() {
            warn!(chat_id, error = %err, "text message not delivered");
        }
        result
    }

    /// Sends `options` as native buttons, degrading to one numbered text
    /// message when the gateway rejects the buttons.
    async fn button_menu(&self, chat_id: &str, text: &str, options: &[&str]) -> GatewayResult {
        info!(chat_id, options = options.len(), "sending button menu");
        let result = self
            .send(
                GatewayKind::ButtonMenu,
                Some(format::buttons_payload(chat_id, text, options)),
            )
            .await;
        match result.error() {
            None => result,
            Some(err) => {
                warn!(chat_id, error = %err, "buttons rejected; sending numbered text instead");
                self.send_text(chat_id, &format::numbered_menu(text, options))
                    .await
            }
        }
    }

    async fn list_menu(
        &self,
        chat_id: &str,
        title: &str,
        description: &str,
        sections: &[MenuSection],
    ) -> GatewayResult {
        info!(chat_id, sections = sections.len(), "sending list menu");
        let result = self
            .send(
                GatewayKind::ListMenu,
                Some(format::list_payload(chat_id, title, description, sections)),
            )
            .await;
        match result.error() {
            None => result,
            Some(err) => {
                warn!(chat_id, error = %err, "list rejected; sending numbered text instead");
                self.send_text(
                    chat_id,
                    &format::numbered_list(title, description, sections),
                )
                .await
            }
        }
    }

    async fn instance_state(&self) -> GatewayResult {
        self.send(GatewayKind::GetState, None).await
    }

    async fn settings(&self) -> GatewayResult {
        self.send(GatewayKind::GetSettings, None).await
    }

    async fn wa_settings(&self) -> GatewayResult {
        self.send(GatewayKind::GetWaSettings, None).await
    }

    async fn set_webhook_url(&self, webhook_url: &str) -> GatewayResult {
        self.send(
            GatewayKind::SetWebhookUrl,
            Some(serde_json::json!({ "webhookUrl": webhook_url, "set": true })),
        )
        .await
    }

    async fn update_settings(&self, settings: Value) -> GatewayResult {
        self.send(GatewayKind::UpdateSettings, Some(settings)).await
    }
}
