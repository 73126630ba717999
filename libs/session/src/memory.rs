use anyhow::Result;
use async_trait::async_trait;
use dashmap::DashMap;
use time::OffsetDateTime;
use tracing::debug;

use crate::{SessionRecord, SessionSnapshot, SessionState, SessionStore};

/// Process-lifetime store. Unbounded and never expires entries.
#[derive(Default)]
pub struct MemorySessionStore {
    by_chat: DashMap<String, SessionRecord>,
}

impl MemorySessionStore {
    pub fn new() -> Self {
        Self {
            by_chat: DashMap::new(),
        }
    }

    pub fn len(&self) -> usize {
        self.by_chat.len()
    }

    pub fn is_empty(&self) -> bool {
        self.by_chat.is_empty()
    }
}

#[async_trait]
impl SessionStore for MemorySessionStore {
    async fn exists(&self, chat_id: &str) -> Result<bool> {
        Ok(self.by_chat.contains_key(chat_id))
    }

    async fn create(&self, chat_id: &str) -> Result<SessionRecord> {
        let record = SessionRecord::new(OffsetDateTime::now_utc());
        if self
            .by_chat
            .insert(chat_id.to_string(), record.clone())
            .is_some()
        {
            debug!(chat_id, "session overwritten");
        }
        Ok(record)
    }

    async fn touch(&self, chat_id: &str) -> Result<Option<SessionRecord>> {
        Ok(self.by_chat.get_mut(chat_id).map(|mut entry| {
            entry.touch(OffsetDateTime::now_utc());
            entry.clone()
        }))
    }

    async fn get(&self, chat_id: &str) -> Result<Option<SessionRecord>> {
        Ok(self.by_chat.get(chat_id).map(|entry| entry.value().clone()))
    }

    async fn state(&self, chat_id: &str) -> Result<SessionState> {
        Ok(self
            .by_chat
            .get(chat_id)
            .map(|entry| entry.state)
            .unwrap_or_default())
    }

    async fn set_state(&self, chat_id: &str, state: SessionState) -> Result<bool> {
        match self.by_chat.get_mut(chat_id) {
            Some(mut entry) => {
                entry.state = state;
                Ok(true)
            }
            None => Ok(false),
        }
    }

    async fn list(&self) -> Result<Vec<SessionSnapshot>> {
        let mut sessions: Vec<SessionSnapshot> = self
            .by_chat
            .iter()
            .map(|entry| SessionSnapshot {
                chat_id: entry.key().clone(),
                record: entry.value().clone(),
            })
            .collect();
        sessions.sort_by(|a, b| {
            a.record
                .first_contact
                .cmp(&b.record.first_contact)
                .then_with(|| a.chat_id.cmp(&b.chat_id))
        });
        Ok(sessions)
    }

    async fn delete(&self, chat_id: &str) -> Result<bool> {
        let removed = self.by_chat.remove(chat_id).is_some();
        if removed {
            debug!(chat_id, "session deleted");
        }
        Ok(removed)
    }

    async fn clear(&self) -> Result<()> {
        self.by_chat.clear();
        Ok(())
    }
}
