use tokio::signal;
use tracing::info;

/// Resolves when SIGINT (Ctrl+C) or, on Unix, SIGTERM is received.
///
/// Passed to `axum::serve(..).with_graceful_shutdown(..)` so in-flight
/// requests drain before the process exits.
pub async fn shutdown_signal() {
    let ctrl_c = async {
        signal::ctrl_c()
            .await
            .expect("failed to install Ctrl+C handler");
    };

    #[cfg(unix)]
    let terminate = async {
        signal::unix::signal(signal::unix::SignalKind::terminate())
            .expect("failed to install SIGTERM handler")
            .recv()
            .await;
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }

    info!("Shutdown signal received, draining in-flight requests");
}
