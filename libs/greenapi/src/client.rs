use std::time::Duration;

use async_trait::async_trait;
use reqwest::Method;
use serde_json::{Value, json};
use tracing::{debug, warn};

use crate::gateway::Gateway;
use crate::types::{GatewayError, GatewayKind, GatewayResult};

pub const DEFAULT_API_URL: &str = "https://1103.api.green-api.com";
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(30);

/// Base URL for one gateway instance: `{api_url}/waInstance{id_instance}`.
pub fn instance_base_url(api_url: &str, id_instance: &str) -> String {
    format!("{}/waInstance{}", api_url.trim_end_matches('/'), id_instance)
}

/// HTTP client for a single gateway instance.
#[derive(Clone)]
pub struct GreenApiClient {
    http: reqwest::Client,
    base_url: String,
    api_token: String,
}

impl GreenApiClient {
    /// Builds a client whose every call is bounded by `timeout`.
    pub fn new(
        base_url: impl Into<String>,
        api_token: impl Into<String>,
        timeout: Duration,
    ) -> Result<Self, reqwest::Error> {
        let http = reqwest::Client::builder().timeout(timeout).build()?;
        Ok(Self::with_http(http, base_url, api_token))
    }

    pub fn with_http(
        http: reqwest::Client,
        base_url: impl Into<String>,
        api_token: impl Into<String>,
    ) -> Self {
        Self {
            http,
            base_url: base_url.into().trim_end_matches('/').to_string(),
            api_token: api_token.into(),
        }
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn endpoint(&self, kind: GatewayKind) -> String {
        format!("{}/{}/{}", self.base_url, kind.operation(), self.api_token)
    }

    async fn execute(&self, kind: GatewayKind, payload: Option<Value>) -> GatewayResult {
        let url = self.endpoint(kind);
        let request = if kind.method() == Method::GET {
            self.http.get(url)
        } else {
            self.http.post(url).json(&payload.unwrap_or_else(|| json!({})))
        };

        let response = match request.send().await {
            Ok(response) => response,
            Err(err) => {
                return GatewayResult::Failure(GatewayError::Transport {
                    message: describe(&err),
                });
            }
        };

        let status = response.status();
        let body = match response.bytes().await {
            Ok(bytes) => decode_body(&bytes),
            Err(err) => {
                return GatewayResult::Failure(GatewayError::Transport {
                    message: describe(&err),
                });
            }
        };

        if status.is_success() {
            GatewayResult::Success(body)
        } else {
            GatewayResult::Failure(GatewayError::Http {
                status: status.as_u16(),
                status_text: status.canonical_reason().unwrap_or_default().to_string(),
                body,
            })
        }
    }
}

#[async_trait]
impl Gateway for GreenApiClient {
    async fn send(&self, kind: GatewayKind, payload: Option<Value>) -> GatewayResult {
        let operation = kind.operation();
        let result = self.execute(kind, payload).await;
        match result.error() {
            None => {
                debug!(operation, "green api call succeeded");
                metrics::counter!(
                    "lakebot_gateway_requests_total",
                    "operation" => operation,
                    "outcome" => "ok"
                )
                .increment(1);
            }
            Some(err) => {
                warn!(operation, error = %err, details = %err.payload(), "green api call failed");
                metrics::counter!(
                    "lakebot_gateway_requests_total",
                    "operation" => operation,
                    "outcome" => "error"
                )
                .increment(1);
            }
        }
        result
    }
}

/// JSON when possible, raw text otherwise, `Null` for an empty body.
fn decode_body(bytes: &[u8]) -> Value {
    if bytes.iter().all(u8::is_ascii_whitespace) {
        return Value::Null;
    }
    serde_json::from_slice(bytes)
        .unwrap_or_else(|_| Value::String(String::from_utf8_lossy(bytes).into_owned()))
}

// reqwest's Display embeds the URL, which carries the API token.
fn describe(err: &reqwest::Error) -> String {
    let kind = if err.is_timeout() {
        "timeout"
    } else if err.is_connect() {
        "connection failed"
    } else if err.is_decode() || err.is_body() {
        "unreadable response"
    } else {
        "request failed"
    };
    match std::error::Error::source(err) {
        Some(source) => format!("{kind}: {source}"),
        None => kind.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn instance_base_url_joins_host_and_id() {
        assert_eq!(
            instance_base_url("https://1103.api.green-api.com/", "1101000001"),
            "https://1103.api.green-api.com/waInstance1101000001"
        );
    }

    #[test]
    fn endpoint_places_token_last() {
        let client = GreenApiClient::with_http(
            reqwest::Client::new(),
            "https://api.example/waInstance42/",
            "tok",
        );
        assert_eq!(
            client.endpoint(GatewayKind::Message),
            "https://api.example/waInstance42/sendMessage/tok"
        );
        assert_eq!(
            client.endpoint(GatewayKind::GetState),
            "https://api.example/waInstance42/getStateInstance/tok"
        );
    }

    #[test]
    fn decode_body_handles_text_and_empty() {
        assert_eq!(decode_body(b""), Value::Null);
        assert_eq!(decode_body(b"{\"a\":1}"), json!({ "a": 1 }));
        assert_eq!(decode_body(b"oops"), Value::String("oops".into()));
    }
}
