use std::sync::Arc;
use std::time::Instant;

use axum::{
    Json, Router,
    body::Bytes,
    extract::{DefaultBodyLimit, State},
    http::{HeaderMap, StatusCode, header::HOST},
    middleware::from_fn,
    middleware::from_fn_with_state,
    response::{IntoResponse, Response},
    routing::{get, post},
};
use lakebot_core::{ProcessOutcome, WebhookProcessor};
use lakebot_greenapi::{GatewayResult, SharedGateway};
use lakebot_session::{SessionSnapshot, SharedSessionStore};
use serde::{Deserialize, Serialize, de::DeserializeOwned};
use serde_json::{Value, json};
use time::{Duration, OffsetDateTime, format_description::well_known::Rfc3339};
use tracing::{error, info, warn};

use crate::config::ServiceConfig;
use crate::middleware::{log_requests, with_request_id};

/// Largest accepted request body.
pub const BODY_LIMIT: usize = 10 * 1024 * 1024;

pub const SERVICE_DESCRIPTION: &str = "WhatsApp concierge for the lake resort";

const ACTIVE_WINDOW: Duration = Duration::hours(24);

#[derive(Clone)]
pub struct AppState {
    pub config: Arc<ServiceConfig>,
    pub gateway: SharedGateway,
    pub sessions: SharedSessionStore,
    pub processor: Arc<WebhookProcessor>,
    pub started: Instant,
}

impl AppState {
    pub fn new(config: ServiceConfig, gateway: SharedGateway, sessions: SharedSessionStore) -> Self {
        let processor =
            WebhookProcessor::new(gateway.clone(), sessions.clone(), config.instance_id.clone());
        Self {
            config: Arc::new(config),
            gateway,
            sessions,
            processor: Arc::new(processor),
            started: Instant::now(),
        }
    }
}

/// JSON error body: `{"success": false, "error": "..."}`.
#[derive(Debug)]
pub struct ApiError {
    status: StatusCode,
    message: String,
}

impl ApiError {
    pub fn new(status: StatusCode, message: impl Into<String>) -> Self {
        Self {
            status,
            message: message.into(),
        }
    }

    pub fn bad_request(message: impl Into<String>) -> Self {
        Self::new(StatusCode::BAD_REQUEST, message)
    }

    pub fn internal(message: impl Into<String>) -> Self {
        Self::new(StatusCode::INTERNAL_SERVER_ERROR, message)
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        (
            self.status,
            Json(json!({ "success": false, "error": self.message })),
        )
            .into_response()
    }
}

impl From<anyhow::Error> for ApiError {
    fn from(err: anyhow::Error) -> Self {
        error!(error = %err, "request failed");
        Self::internal(err.to_string())
    }
}

pub fn build_router(state: AppState) -> Router {
    Router::new()
        .route("/", get(health))
        .route("/webhook", get(webhook_probe).post(receive_webhook))
        .route("/api/status", get(status))
        .route("/api/users", get(list_users))
        .route("/api/users/reset", post(reset_users))
        .route("/api/test-message", post(test_message))
        .route("/api/setup-webhook", post(setup_webhook))
        .fallback(not_found)
        .layer(from_fn_with_state(state.clone(), log_requests))
        .layer(from_fn(with_request_id))
        .layer(DefaultBodyLimit::max(BODY_LIMIT))
        .with_state(state)
}

fn now_rfc3339() -> String {
    OffsetDateTime::now_utc()
        .format(&Rfc3339)
        .unwrap_or_default()
}

/// Parses an optional JSON body; an empty body reads as `{}`.
fn parse_body<T: DeserializeOwned>(body: &Bytes) -> Result<T, ApiError> {
    let raw: &[u8] = if body.iter().all(u8::is_ascii_whitespace) {
        b"{}"
    } else {
        &body[..]
    };
    serde_json::from_slice(raw).map_err(|err| ApiError::bad_request(format!("invalid JSON body: {err}")))
}

async fn health(State(state): State<AppState>) -> Json<Value> {
    Json(json!({
        "status": "OK",
        "service": SERVICE_DESCRIPTION,
        "timestamp": now_rfc3339(),
        "uptime": state.started.elapsed().as_secs_f64(),
    }))
}

async fn webhook_probe() -> Json<Value> {
    Json(json!({
        "status": "webhook endpoint active",
        "timestamp": now_rfc3339(),
    }))
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct WebhookAck {
    success: bool,
    #[serde(flatten)]
    outcome: ProcessOutcome,
    timestamp: String,
}

async fn receive_webhook(State(state): State<AppState>, body: Bytes) -> Response {
    info!("webhook received");
    let payload: Value = match serde_json::from_slice(&body) {
        Ok(payload) => payload,
        Err(err) => {
            error!(error = %err, "webhook body is not JSON");
            return ApiError::internal(err.to_string()).into_response();
        }
    };

    let outcome = state.processor.process(&payload).await;
    Json(WebhookAck {
        success: true,
        outcome,
        timestamp: now_rfc3339(),
    })
    .into_response()
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct ConfigSummary {
    id_instance: String,
    api_token_length: usize,
    base_url: String,
}

async fn status(State(state): State<AppState>) -> Result<Json<Value>, ApiError> {
    let (instance_state, settings) =
        tokio::join!(state.gateway.instance_state(), state.gateway.settings());
    let users = state.sessions.list().await?;

    let cutoff = OffsetDateTime::now_utc() - ACTIVE_WINDOW;
    let active = users
        .iter()
        .filter(|user| user.record.last_activity > cutoff)
        .count();

    let config = ConfigSummary {
        id_instance: state.config.instance_id.clone(),
        api_token_length: state.config.api_token.chars().count(),
        base_url: state.config.base_url(),
    };
    Ok(Json(json!({
        "success": true,
        "config": config,
        "state": instance_state.payload(),
        "settings": settings.payload(),
        "users": { "total": users.len(), "active": active },
    })))
}

#[derive(Debug, Serialize)]
struct UserList {
    success: bool,
    total: usize,
    users: Vec<SessionSnapshot>,
}

async fn list_users(State(state): State<AppState>) -> Result<Json<UserList>, ApiError> {
    let users = state.sessions.list().await?;
    Ok(Json(UserList {
        success: true,
        total: users.len(),
        users,
    }))
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
struct ResetRequest {
    #[serde(default)]
    chat_id: Option<String>,
}

async fn reset_users(
    State(state): State<AppState>,
    body: Bytes,
) -> Result<Json<Value>, ApiError> {
    let request: ResetRequest = parse_body(&body)?;
    match request.chat_id.filter(|id| !id.trim().is_empty()) {
        Some(chat_id) => {
            let deleted = state.sessions.delete(&chat_id).await?;
            let message = if deleted {
                format!("user {chat_id} removed")
            } else {
                format!("user {chat_id} not found")
            };
            info!(chat_id = %chat_id, deleted, "session reset requested");
            Ok(Json(json!({ "success": deleted, "message": message })))
        }
        None => {
            state.sessions.clear().await?;
            info!("all sessions cleared");
            Ok(Json(json!({ "success": true, "message": "all users removed" })))
        }
    }
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
struct TestMessageRequest {
    #[serde(default)]
    chat_id: Option<String>,
    #[serde(default)]
    message: Option<String>,
}

async fn test_message(
    State(state): State<AppState>,
    body: Bytes,
) -> Result<Json<Value>, ApiError> {
    let request: TestMessageRequest = parse_body(&body)?;
    let (Some(chat_id), Some(message)) = (
        request.chat_id.filter(|v| !v.is_empty()),
        request.message.filter(|v| !v.is_empty()),
    ) else {
        return Err(ApiError::bad_request("chatId and message are required"));
    };

    let result = state.gateway.send_text(&chat_id, &message).await;
    let summary = if result.is_success() {
        "message sent"
    } else {
        "message not sent"
    };
    Ok(Json(json!({
        "success": result.is_success(),
        "result": result.payload(),
        "message": summary,
    })))
}

/// Remote notification settings applied by `/api/setup-webhook`.
pub fn webhook_settings(webhook_url: &str) -> Value {
    json!({
        "webhookUrl": webhook_url,
        "webhookUrlToken": "",
        "delaySendMessagesMilliseconds": 1000,
        "markIncomingMessagesReaded": "no",
        "proxyInstance": "",
        "outgoingWebhook": "no",
        "incomingWebhook": "yes",
        "deviceWebhook": "no",
        "statusInstanceWebhook": "no",
        "sendFromUTC": "no",
    })
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct SetupReport {
    success: bool,
    webhook_url: String,
    webhook: GatewayResult,
    settings: GatewayResult,
    message: &'static str,
}

async fn setup_webhook(
    State(state): State<AppState>,
    headers: HeaderMap,
) -> Result<Json<SetupReport>, ApiError> {
    let base = match state.config.public_base_url.clone() {
        Some(base) => base,
        None => {
            let host = headers
                .get(HOST)
                .and_then(|value| value.to_str().ok())
                .filter(|host| !host.is_empty())
                .ok_or_else(|| ApiError::bad_request("Host header is required"))?;
            format!("https://{host}")
        }
    };
    let webhook_url = format!("{base}/webhook");
    info!(webhook_url = %webhook_url, "configuring gateway webhook");

    let (webhook, settings) = tokio::join!(
        state.gateway.set_webhook_url(&webhook_url),
        state.gateway.update_settings(webhook_settings(&webhook_url)),
    );
    let success = webhook.is_success() && settings.is_success();
    if !success {
        warn!(webhook_url = %webhook_url, "webhook setup incomplete");
    }

    Ok(Json(SetupReport {
        success,
        webhook_url,
        webhook,
        settings,
        message: if success {
            "webhook configured"
        } else {
            "webhook setup failed"
        },
    }))
}

async fn not_found() -> ApiError {
    ApiError::new(StatusCode::NOT_FOUND, "endpoint not found")
}
