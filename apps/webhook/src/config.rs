use std::env;
use std::net::{IpAddr, Ipv4Addr, SocketAddr};
use std::time::Duration;

use lakebot_greenapi::{DEFAULT_API_URL, DEFAULT_TIMEOUT, instance_base_url};
use lakebot_telemetry::is_truthy;
use thiserror::Error;

pub const DEFAULT_PORT: u16 = 3000;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum ConfigError {
    #[error("{0} must be set")]
    Missing(&'static str),
    #[error("{key} has invalid value {value:?}")]
    Invalid { key: &'static str, value: String },
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ServiceConfig {
    pub instance_id: String,
    pub api_token: String,
    pub api_url: String,
    pub bind_addr: IpAddr,
    pub port: u16,
    pub gateway_timeout: Duration,
    /// Overrides `https://{Host}` when building the webhook URL.
    pub public_base_url: Option<String>,
    pub debug: bool,
    pub debug_webhooks: bool,
}

impl ServiceConfig {
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let value = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());

        let instance_id = value("ID_INSTANCE").ok_or(ConfigError::Missing("ID_INSTANCE"))?;
        let api_token =
            value("API_TOKEN_INSTANCE").ok_or(ConfigError::Missing("API_TOKEN_INSTANCE"))?;
        let api_url = value("GREEN_API_URL").unwrap_or_else(|| DEFAULT_API_URL.to_string());
        let port = match value("PORT") {
            Some(raw) => parse("PORT", &raw)?,
            None => DEFAULT_PORT,
        };
        let bind_addr = match value("BIND_ADDR") {
            Some(raw) => parse("BIND_ADDR", &raw)?,
            None => IpAddr::V4(Ipv4Addr::UNSPECIFIED),
        };
        let gateway_timeout = match value("GATEWAY_TIMEOUT_SECS") {
            Some(raw) => match parse::<u64>("GATEWAY_TIMEOUT_SECS", &raw)? {
                0 => {
                    return Err(ConfigError::Invalid {
                        key: "GATEWAY_TIMEOUT_SECS",
                        value: raw,
                    });
                }
                secs => Duration::from_secs(secs),
            },
            None => DEFAULT_TIMEOUT,
        };

        Ok(Self {
            instance_id: instance_id.trim().to_string(),
            api_token: api_token.trim().to_string(),
            api_url: api_url.trim().trim_end_matches('/').to_string(),
            bind_addr,
            port,
            gateway_timeout,
            public_base_url: value("PUBLIC_BASE_URL")
                .map(|url| url.trim().trim_end_matches('/').to_string()),
            debug: value("DEBUG").as_deref().is_some_and(is_truthy),
            debug_webhooks: value("DEBUG_WEBHOOKS").as_deref().is_some_and(is_truthy),
        })
    }

    pub fn addr(&self) -> SocketAddr {
        SocketAddr::new(self.bind_addr, self.port)
    }

    /// `{api_url}/waInstance{instance_id}`
    pub fn base_url(&self) -> String {
        instance_base_url(&self.api_url, &self.instance_id)
    }
}

fn parse<T: std::str::FromStr>(key: &'static str, raw: &str) -> Result<T, ConfigError> {
    raw.trim().parse().map_err(|_| ConfigError::Invalid {
        key,
        value: raw.to_string(),
    })
}
