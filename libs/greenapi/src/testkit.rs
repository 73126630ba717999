//! In-memory [`Gateway`] that records calls and fails on demand.

use std::collections::HashSet;
use std::sync::Mutex;

use async_trait::async_trait;
use serde_json::{Value, json};

use crate::gateway::Gateway;
use crate::types::{GatewayError, GatewayKind, GatewayResult};

#[derive(Debug, Clone, PartialEq)]
pub struct RecordedCall {
    pub kind: GatewayKind,
    pub payload: Option<Value>,
}

impl RecordedCall {
    pub fn chat_id(&self) -> Option<&str> {
        self.payload.as_ref()?.get("chatId")?.as_str()
    }

    /// Text body of a `sendMessage` or `sendButtons` call.
    pub fn text(&self) -> Option<&str> {
        self.payload.as_ref()?.get("message")?.as_str()
    }
}

#[derive(Default)]
pub struct RecordingGateway {
    calls: Mutex<Vec<RecordedCall>>,
    failing: Mutex<HashSet<GatewayKind>>,
}

impl RecordingGateway {
    pub fn new() -> Self {
        Self::default()
    }

    /// Makes every subsequent call of `kind` fail with a transport error.
    pub fn fail(&self, kind: GatewayKind) {
        self.lock_failing().insert(kind);
    }

    pub fn calls(&self) -> Vec<RecordedCall> {
        self.lock_calls().clone()
    }

    pub fn calls_of(&self, kind: GatewayKind) -> Vec<RecordedCall> {
        self.lock_calls()
            .iter()
            .filter(|call| call.kind == kind)
            .cloned()
            .collect()
    }

    fn lock_calls(&self) -> std::sync::MutexGuard<'_, Vec<RecordedCall>> {
        self.calls
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    fn lock_failing(&self) -> std::sync::MutexGuard<'_, HashSet<GatewayKind>> {
        self.failing
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
    }
}

#[async_trait]
impl Gateway for RecordingGateway {
    async fn send(&self, kind: GatewayKind, payload: Option<Value>) -> GatewayResult {
        self.lock_calls().push(RecordedCall { kind, payload });
        if self.lock_failing().contains(&kind) {
            GatewayResult::Failure(GatewayError::Transport {
                message: "simulated transport error".into(),
            })
        } else {
            GatewayResult::Success(json!({ "operation": kind.operation() }))
        }
    }
}
