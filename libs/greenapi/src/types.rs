use reqwest::Method;
use serde::ser::{Serialize, SerializeMap, Serializer};
use serde_json::{Value, json};
use thiserror::Error;

/// Remote operations exposed by the gateway.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum GatewayKind {
    Message,
    ButtonMenu,
    ListMenu,
    GetState,
    GetSettings,
    GetWaSettings,
    SetWebhookUrl,
    UpdateSettings,
}

impl GatewayKind {
    /// Operation name as it appears in the request path.
    pub fn operation(&self) -> &'static str {
        match self {
            GatewayKind::Message => "sendMessage",
            GatewayKind::ButtonMenu => "sendButtons",
            GatewayKind::ListMenu => "sendListMessage",
            GatewayKind::GetState => "getStateInstance",
            GatewayKind::GetSettings => "getSettings",
            GatewayKind::GetWaSettings => "getWaSettings",
            GatewayKind::SetWebhookUrl => "setWebhook",
            GatewayKind::UpdateSettings => "setSettings",
        }
    }

    pub fn method(&self) -> Method {
        match self {
            GatewayKind::GetState | GatewayKind::GetSettings | GatewayKind::GetWaSettings => {
                Method::GET
            }
            _ => Method::POST,
        }
    }
}

/// Failure talking to the gateway.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum GatewayError {
    /// The gateway answered with a non-2xx status.
    #[error("gateway returned {status} {status_text}")]
    Http {
        status: u16,
        status_text: String,
        body: Value,
    },
    /// No usable HTTP response (timeout, connection failure, unreadable body).
    #[error("gateway request failed: {message}")]
    Transport { message: String },
}

impl GatewayError {
    /// Error payload surfaced to API callers: the gateway's own body when it sent
    /// one, otherwise a `{message}` object.
    pub fn payload(&self) -> Value {
        match self {
            GatewayError::Http { body, .. } if !is_blank(body) => body.clone(),
            _ => json!({ "message": self.to_string() }),
        }
    }
}

fn is_blank(value: &Value) -> bool {
    match value {
        Value::Null => true,
        Value::String(s) => s.trim().is_empty(),
        _ => false,
    }
}

/// Outcome of a gateway call. Calls never return `Err`; callers inspect this instead.
#[derive(Debug, Clone, PartialEq)]
pub enum GatewayResult {
    Success(Value),
    Failure(GatewayError),
}

impl GatewayResult {
    pub fn is_success(&self) -> bool {
        matches!(self, GatewayResult::Success(_))
    }

    pub fn data(&self) -> Option<&Value> {
        match self {
            GatewayResult::Success(data) => Some(data),
            GatewayResult::Failure(_) => None,
        }
    }

    pub fn error(&self) -> Option<&GatewayError> {
        match self {
            GatewayResult::Success(_) => None,
            GatewayResult::Failure(err) => Some(err),
        }
    }

    /// Response data on success, error payload on failure.
    pub fn payload(&self) -> Value {
        match self {
            GatewayResult::Success(data) => data.clone(),
            GatewayResult::Failure(err) => err.payload(),
        }
    }
}

impl Serialize for GatewayResult {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(2))?;
        map.serialize_entry("success", &self.is_success())?;
        match self {
            GatewayResult::Success(data) => map.serialize_entry("data", data)?,
            GatewayResult::Failure(err) => map.serialize_entry("error", &err.payload())?,
        }
        map.end()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn queries_use_get_and_mutations_post() {
        assert_eq!(GatewayKind::GetState.method(), Method::GET);
        assert_eq!(GatewayKind::GetWaSettings.method(), Method::GET);
        assert_eq!(GatewayKind::Message.method(), Method::POST);
        assert_eq!(GatewayKind::UpdateSettings.method(), Method::POST);
        assert_eq!(GatewayKind::ListMenu.operation(), "sendListMessage");
    }

    #[test]
    fn http_error_prefers_gateway_body() {
        let err = GatewayError::Http {
            status: 400,
            status_text: "Bad Request".into(),
            body: json!({ "message": "chatId is invalid" }),
        };
        assert_eq!(err.payload(), json!({ "message": "chatId is invalid" }));
    }

    #[test]
    fn http_error_without_body_falls_back_to_message() {
        let err = GatewayError::Http {
            status: 502,
            status_text: "Bad Gateway".into(),
            body: Value::String(String::new()),
        };
        assert_eq!(
            err.payload(),
            json!({ "message": "gateway returned 502 Bad Gateway" })
        );
    }

    #[test]
    fn result_serializes_success_flag() {
        let ok = GatewayResult::Success(json!({ "idMessage": "1" }));
        assert_eq!(
            serde_json::to_value(&ok).unwrap(),
            json!({ "success": true, "data": { "idMessage": "1" } })
        );

        let failed = GatewayResult::Failure(GatewayError::Transport {
            message: "timed out".into(),
        });
        assert_eq!(
            serde_json::to_value(&failed).unwrap(),
            json!({ "success": false, "error": { "message": "gateway request failed: timed out" } })
        );
    }
}
