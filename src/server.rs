use std::future::Future;

use tokio::net::TcpListener;

use crate::{app, config::AppConfig, error::Result};

/// Builds the router for `config`, binds its address and serves until
/// `shutdown` resolves.
pub async fn serve<F>(config: &AppConfig, shutdown: F) -> Result<()>
where
    F: Future<Output = ()> + Send + 'static,
{
    let router = app::build(config).await?;

    let addr = config.server_address();
    let listener = TcpListener::bind(&addr).await.inspect_err(|e| {
        tracing::error!(%addr, "Could not bind listener: {}", e);
    })?;
    tracing::info!(
        store = ?config.store.backend,
        addr = %listener.local_addr()?,
        "Inventory service listening"
    );

    axum::serve(listener, router)
        .with_graceful_shutdown(shutdown)
        .await?;

    tracing::info!("Inventory service stopped");
    Ok(())
}

/// Resolves on Ctrl+C or SIGTERM. A signal that cannot be watched is logged
/// and ignored rather than treated as a shutdown request.
pub async fn shutdown_signal() {
    let signal = tokio::select! {
        _ = interrupt() => "SIGINT",
        _ = terminate() => "SIGTERM",
    };
    tracing::info!(signal, "Shutdown requested, draining connections");
}

async fn interrupt() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::warn!("Ctrl+C handler unavailable: {}", e);
        std::future::pending::<()>().await;
    }
}

#[cfg(unix)]
async fn terminate() {
    use tokio::signal::unix::{SignalKind, signal};

    match signal(SignalKind::terminate()) {
        Ok(mut stream) => {
            stream.recv().await;
        }
        Err(e) => {
            tracing::warn!("SIGTERM handler unavailable: {}", e);
            std::future::pending::<()>().await;
        }
    }
}

#[cfg(not(unix))]
async fn terminate() {
    std::future::pending::<()>().await;
}
