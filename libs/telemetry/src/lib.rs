//! Logging setup for lakebot services.
//!
//! Output is JSON unless `LOG_FORMAT` is `text`, `pretty` or `plain`. `RUST_LOG`
//! wins over the built-in filter, which is `info` or `debug` when `DEBUG` is set.

mod config;
mod tracing_init;

use anyhow::Result;

pub use config::{TelemetryConfig, is_truthy};
pub use tracing_init::init_tracing;

/// Installs the subscriber configured from the environment.
pub fn install(service_name: &str) -> Result<()> {
    init_tracing(&TelemetryConfig::from_env(service_name))
}
