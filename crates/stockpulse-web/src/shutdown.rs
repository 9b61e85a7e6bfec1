//! Graceful shutdown trigger for the server.

use std::future::Future;
use std::io;

use tracing::{error, info};

/// Resolves once `signal` fires. If the signal handler fails the server
/// keeps running until the process is killed.
pub async fn on_signal<F>(signal: F)
where
    F: Future<Output = io::Result<()>>,
{
    match signal.await {
        Ok(()) => info!("shutdown signal received"),
        Err(err) => {
            error!(error = %err, "failed to listen for shutdown signal");
            std::future::pending::<()>().await;
        }
    }
}
