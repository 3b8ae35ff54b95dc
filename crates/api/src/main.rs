use anyhow::Context;

use veritext_api::app::{build_app, AppState};
use veritext_api::config::ServiceConfig;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    veritext_observability::init();

    let config = ServiceConfig::from_env().context("invalid configuration")?;
    let state = AppState::from_config(&config).context("failed to set up classifier client")?;

    let app = build_app(state);

    let listener = tokio::net::TcpListener::bind(config.bind_addr)
        .await
        .with_context(|| format!("failed to bind {}", config.bind_addr))?;

    tracing::info!(
        addr = %listener.local_addr()?,
        classifier = %config.classifier.base_url(),
        request_timeout_ms = config.classifier.request_timeout.as_millis() as u64,
        "listening"
    );

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("server error")?;

    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::warn!(error = %e, "failed to listen for shutdown signal");
        std::future::pending::<()>().await;
    }
    tracing::info!("shutdown signal received");
}
