//! Webhook intake and admin API of the lakebot WhatsApp concierge.
pub mod config;
pub mod http;
pub mod middleware;

pub use config::{ConfigError, ServiceConfig};
pub use http::{AppState, build_router};

/// Name reported to the log pipeline.
pub const SERVICE_NAME: &str = "lakebot-webhook";
