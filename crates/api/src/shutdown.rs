//! Signal handling for graceful shutdown.

use tokio::signal;

/// Resolve once the process is asked to stop (SIGINT, or SIGTERM on Unix).
///
/// Passed to `axum::serve(..).with_graceful_shutdown(..)`; in-flight
/// requests finish before the server future returns.
pub async fn shutdown_signal(service: &'static str) {
    let interrupt = async {
        if let Err(e) = signal::ctrl_c().await {
            tracing::error!(error = %e, "Cannot listen for SIGINT");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match signal::unix::signal(signal::unix::SignalKind::terminate()) {
            Ok(mut stream) => {
                stream.recv().await;
            }
            Err(e) => {
                tracing::error!(error = %e, "Cannot listen for SIGTERM");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    let received = tokio::select! {
        () = interrupt => "SIGINT",
        () = terminate => "SIGTERM",
    };
    tracing::info!(service, signal = received, "Shutdown requested, draining connections");
}
