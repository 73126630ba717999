mod memory;

use std::sync::Arc;

use anyhow::Result;
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use time::OffsetDateTime;

pub use memory::MemorySessionStore;

/// Shared session store handle used across services.
pub type SharedSessionStore = Arc<dyn SessionStore>;

/// Coarse conversation state label.
///
/// Sessions are created in `Welcome` and nothing currently moves them out of it;
/// the label is kept so a richer flow can be layered on without changing the
/// store contract.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SessionState {
    #[default]
    Welcome,
}

impl SessionState {
    pub fn as_str(&self) -> &'static str {
        match self {
            SessionState::Welcome => "welcome",
        }
    }
}

/// Per-chat bookkeeping captured on first contact and updated on every message.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SessionRecord {
    #[serde(with = "time::serde::rfc3339")]
    pub first_contact: OffsetDateTime,
    #[serde(with = "time::serde::rfc3339")]
    pub last_activity: OffsetDateTime,
    pub message_count: u64,
    pub state: SessionState,
}

impl SessionRecord {
    pub fn new(now: OffsetDateTime) -> Self {
        Self {
            first_contact: now,
            last_activity: now,
            message_count: 0,
            state: SessionState::Welcome,
        }
    }

    /// Registers one more inbound message. `last_activity` never moves backwards.
    pub fn touch(&mut self, now: OffsetDateTime) {
        if now > self.last_activity {
            self.last_activity = now;
        }
        self.message_count += 1;
    }
}

/// Listing entry pairing a chat id with its record.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SessionSnapshot {
    pub chat_id: String,
    #[serde(flatten)]
    pub record: SessionRecord,
}

/// Store of chat sessions keyed by chat id.
///
/// Mutations on unknown chat ids are no-ops rather than errors: callers are
/// expected to `create` before they `touch` or `set_state`.
#[async_trait]
pub trait SessionStore: Send + Sync {
    async fn exists(&self, chat_id: &str) -> Result<bool>;
    /// Creates (or overwrites) the session for `chat_id`.
    async fn create(&self, chat_id: &str) -> Result<SessionRecord>;
    /// Bumps activity for a known chat id. Returns `None` when the chat id is unknown.
    async fn touch(&self, chat_id: &str) -> Result<Option<SessionRecord>>;
    async fn get(&self, chat_id: &str) -> Result<Option<SessionRecord>>;
    /// Returns the session state, or `Welcome` for unknown chat ids.
    async fn state(&self, chat_id: &str) -> Result<SessionState>;
    /// Returns whether the chat id was known (and therefore updated).
    async fn set_state(&self, chat_id: &str, state: SessionState) -> Result<bool>;
    async fn list(&self) -> Result<Vec<SessionSnapshot>>;
    /// Removes one session. Returns whether it existed.
    async fn delete(&self, chat_id: &str) -> Result<bool>;
    async fn clear(&self) -> Result<()>;
}

/// Returns an in-memory session store wrapped in an [`Arc`].
pub fn shared_memory_store() -> SharedSessionStore {
    Arc::new(MemorySessionStore::new())
}
