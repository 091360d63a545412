//! sysdash_agent: serves host metrics as JSON for the dashboard.

use anyhow::Context;
use sysdash_agent::{http, AgentConfig, AppState, Platform};
use tokio::sync::broadcast::error::RecvError;
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    let config = match AgentConfig::from_env() {
        Ok(c) => c,
        Err(msg) => {
            eprintln!("{msg}");
            return Ok(());
        }
    };

    let platform = Platform::current().context("detecting host platform")?;
    let addr = config.addr();
    let state = AppState::for_host(platform, config);

    // Surface settings changes in the log.
    let mut changes = state.settings.subscribe();
    tokio::spawn(async move {
        loop {
            match changes.recv().await {
                Ok(change) => info!(key = %change.key, value = %change.value, "setting updated"),
                Err(RecvError::Lagged(n)) => warn!(skipped = n, "settings log fell behind"),
                Err(RecvError::Closed) => break,
            }
        }
    });

    let app = http::router(state);
    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .with_context(|| format!("binding {addr}"))?;
    info!(%platform, addr = %listener.local_addr()?, "sysdash agent listening");

    axum::serve(listener, app)
        .with_graceful_shutdown(async {
            if let Err(e) = tokio::signal::ctrl_c().await {
                warn!(error = %e, "failed to listen for shutdown signal");
            }
            info!("shutting down");
        })
        .await
        .context("http server failed")?;
    Ok(())
}
