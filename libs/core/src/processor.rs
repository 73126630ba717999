use std::sync::Arc;

use anyhow::Result;
use dashmap::DashMap;
use lakebot_greenapi::SharedGateway;
use lakebot_session::SharedSessionStore;
use serde::Serialize;
use serde_json::Value;
use tokio::sync::{Mutex, OwnedMutexGuard};
use tracing::{debug, error, info, warn};

use crate::catalog::APOLOGY;
use crate::extract::WebhookFields;
use crate::responder::Responder;

/// Why an event was acknowledged without being handled.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Discard {
    NotAMessage,
    Incomplete,
    SelfEcho,
}

impl Discard {
    pub fn reason(&self) -> &'static str {
        match self {
            Discard::NotAMessage => "not an incoming message",
            Discard::Incomplete => "missing chat id or message text",
            Discard::SelfEcho => "message sent by this instance",
        }
    }

    fn label(&self) -> &'static str {
        match self {
            Discard::NotAMessage => "not_a_message",
            Discard::Incomplete => "incomplete",
            Discard::SelfEcho => "self_echo",
        }
    }
}

/// Summary of one processed webhook, returned to the gateway as-is.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ProcessOutcome {
    pub processed: bool,
    pub reason: Option<String>,
    pub chat_id: Option<String>,
    pub new_user: Option<bool>,
}

impl ProcessOutcome {
    fn discarded(discard: Discard) -> Self {
        Self {
            processed: false,
            reason: Some(discard.reason().to_string()),
            chat_id: None,
            new_user: None,
        }
    }

    fn handled(chat_id: String, new_user: bool) -> Self {
        Self {
            processed: true,
            reason: None,
            chat_id: Some(chat_id),
            new_user: Some(new_user),
        }
    }

    fn failed(chat_id: String, reason: String) -> Self {
        Self {
            processed: false,
            reason: Some(reason),
            chat_id: Some(chat_id),
            new_user: None,
        }
    }
}

/// Per-chat mutual exclusion. Events for one chat id run one at a time;
/// different chat ids never wait on each other.
#[derive(Default)]
struct ChatLocks {
    inner: DashMap<String, Arc<Mutex<()>>>,
}

impl ChatLocks {
    async fn acquire(&self, chat_id: &str) -> OwnedMutexGuard<()> {
        let lock = self.inner.entry(chat_id.to_string()).or_default().clone();
        lock.lock_owned().await
    }

    /// Drops the entry once no holder or waiter references it. Call after the
    /// guard is gone.
    fn release(&self, chat_id: &str) {
        self.inner
            .remove_if(chat_id, |_, lock| Arc::strong_count(lock) == 1);
    }

    #[cfg(test)]
    fn len(&self) -> usize {
        self.inner.len()
    }
}

/// Routes inbound webhook events to the welcome flow or the command dispatcher.
pub struct WebhookProcessor {
    gateway: SharedGateway,
    sessions: SharedSessionStore,
    responder: Responder,
    instance_id: String,
    locks: ChatLocks,
}

impl WebhookProcessor {
    pub fn new(
        gateway: SharedGateway,
        sessions: SharedSessionStore,
        instance_id: impl Into<String>,
    ) -> Self {
        Self {
            responder: Responder::new(gateway.clone()),
            gateway,
            sessions,
            instance_id: instance_id.into(),
            locks: ChatLocks::default(),
        }
    }

    /// Handles one webhook payload. Never fails: internal errors are reported
    /// in the outcome after a best-effort apology to the chat.
    pub async fn process(&self, payload: &Value) -> ProcessOutcome {
        let fields = WebhookFields::extract(payload);
        debug!(
            type_webhook = fields.type_webhook.as_deref().unwrap_or(""),
            chat_id = fields.chat_id.as_deref().unwrap_or(""),
            sender_id = fields.sender_id.as_deref().unwrap_or(""),
            "webhook fields extracted"
        );

        if !fields.is_incoming_message() {
            return self.discard(Discard::NotAMessage);
        }
        let (Some(chat_id), Some(text)) = (fields.chat_id.clone(), fields.text.clone()) else {
            return self.discard(Discard::Incomplete);
        };
        if fields.is_self_echo(&self.instance_id) {
            return self.discard(Discard::SelfEcho);
        }

        let guard = self.locks.acquire(&chat_id).await;
        let outcome = self.handle_serialized(&chat_id, &text).await;
        drop(guard);
        self.locks.release(&chat_id);
        outcome
    }

    async fn handle_serialized(&self, chat_id: &str, text: &str) -> ProcessOutcome {
        match self.handle(chat_id, text).await {
            Ok(new_user) => {
                record_event(if new_user { "new_user" } else { "returning_user" });
                ProcessOutcome::handled(chat_id.to_string(), new_user)
            }
            Err(err) => {
                error!(chat_id, error = %err, "failed to handle message");
                record_event("failed");
                let apology = self.gateway.send_text(chat_id, APOLOGY).await;
                if let Some(send_err) = apology.error() {
                    warn!(chat_id, error = %send_err, "apology not delivered");
                }
                ProcessOutcome::failed(chat_id.to_string(), err.to_string())
            }
        }
    }

    async fn handle(&self, chat_id: &str, text: &str) -> Result<bool> {
        if !self.sessions.exists(chat_id).await? {
            info!(chat_id, "new user");
            self.sessions.create(chat_id).await?;
            let result = self.responder.send_welcome(chat_id).await;
            if !result.is_success() {
                warn!(chat_id, "welcome menu could not be delivered");
            }
            return Ok(true);
        }

        info!(chat_id, "returning user");
        self.sessions.touch(chat_id).await?;
        let (action, result) = self.responder.respond(chat_id, text).await;
        if !result.is_success() {
            warn!(chat_id, action = ?action, "reply could not be delivered");
        }
        Ok(false)
    }

    fn discard(&self, discard: Discard) -> ProcessOutcome {
        debug!(reason = discard.reason(), "webhook discarded");
        record_event(discard.label());
        ProcessOutcome::discarded(discard)
    }
}

fn record_event(outcome: &'static str) {
    metrics::counter!("lakebot_webhook_events_total", "outcome" => outcome).increment(1);
}

#[cfg(test)]
mod tests {
    use lakebot_greenapi::testkit::RecordingGateway;
    use lakebot_session::{MemorySessionStore, SessionStore};
    use serde_json::json;

    use super::*;

    fn message(chat_id: &str) -> Value {
        json!({
            "typeWebhook": "incomingMessageReceived",
            "senderData": { "chatId": chat_id, "sender": chat_id },
            "messageData": { "textMessageData": { "textMessage": "1" } }
        })
    }

    #[tokio::test]
    async fn lock_entries_are_dropped_when_idle() {
        let sessions = Arc::new(MemorySessionStore::new());
        let processor =
            WebhookProcessor::new(Arc::new(RecordingGateway::new()), sessions.clone(), "1101");

        for n in 0..50 {
            processor.process(&message(&format!("{n}@c.us"))).await;
        }
        sessions.clear().await.unwrap();

        assert!(sessions.is_empty());
        assert_eq!(processor.locks.len(), 0);
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 4)]
    async fn lock_entries_are_dropped_after_contention() {
        let processor = Arc::new(WebhookProcessor::new(
            Arc::new(RecordingGateway::new()),
            Arc::new(MemorySessionStore::new()),
            "1101",
        ));
        let tasks: Vec<_> = (0..16)
            .map(|n| {
                let processor = processor.clone();
                tokio::spawn(async move {
                    processor.process(&message(&format!("{}@c.us", n % 2))).await
                })
            })
            .collect();
        for task in tasks {
            assert!(task.await.unwrap().processed);
        }

        assert_eq!(processor.locks.len(), 0);
    }
}
