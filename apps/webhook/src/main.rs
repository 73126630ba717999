use std::sync::Arc;

use anyhow::Result;
use axum::serve;
use lakebot_greenapi::GreenApiClient;
use lakebot_session::shared_memory_store;
use lakebot_telemetry::install as init_telemetry;
use lakebot_webhook::{AppState, SERVICE_NAME, ServiceConfig, build_router};
use tokio::net::TcpListener;
use tracing::info;

#[tokio::main]
async fn main() -> Result<()> {
    dotenvy::dotenv().ok();
    init_telemetry(SERVICE_NAME)?;

    let config = ServiceConfig::from_env()?;
    let gateway = GreenApiClient::new(
        config.base_url(),
        config.api_token.clone(),
        config.gateway_timeout,
    )?;
    let addr = config.addr();
    info!(
        instance_id = %config.instance_id,
        base_url = %gateway.base_url(),
        debug_webhooks = config.debug_webhooks,
        "gateway client ready"
    );

    let state = AppState::new(config, Arc::new(gateway), shared_memory_store());
    let router = build_router(state);
    let listener = TcpListener::bind(addr).await?;
    info!("{SERVICE_NAME} listening on {addr}");

    serve(listener, router)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    info!("{SERVICE_NAME} stopped");
    Ok(())
}

async fn shutdown_signal() {
    let ctrl_c = async {
        tokio::signal::ctrl_c().await.ok();
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut signal) => {
                signal.recv().await;
            }
            Err(_) => std::future::pending::<()>().await,
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => info!("received Ctrl-C, shutting down"),
        _ = terminate => info!("received SIGTERM, shutting down"),
    }
}
