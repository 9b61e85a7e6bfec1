use std::process::ExitCode;

use stockpulse_core::telemetry::{self, SERVICE_DIRECTIVE};
use stockpulse_core::{AlphaVantageFetcher, AppConfig};
use stockpulse_warehouse::{Warehouse, WarehouseConfig};
use stockpulse_web::{router, shutdown, AppState, ServerError};
use tokio::net::TcpListener;
use tracing::{error, info, warn};

#[tokio::main]
async fn main() -> ExitCode {
    match run().await {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            error!(error = %err, "server stopped");
            eprintln!("stockpulse-web: {err}");
            ExitCode::FAILURE
        }
    }
}

async fn run() -> Result<(), ServerError> {
    let config = AppConfig::from_env()?;
    telemetry::init(config.log_format, SERVICE_DIRECTIVE);

    let fetcher = AlphaVantageFetcher::from_config(&config)
        .with_span(tracing::info_span!("fetcher", service = "stockpulse-web"));
    if !fetcher.is_configured() {
        warn!("no API key configured; stock lookups will report the service as unconfigured");
    }

    let warehouse_config = WarehouseConfig::at(&config.home);
    let query_log = match tokio::task::spawn_blocking(move || Warehouse::open(warehouse_config)).await {
        Ok(Ok(warehouse)) => {
            info!(path = %warehouse.db_path().display(), "query log ready");
            Some(warehouse)
        }
        Ok(Err(err)) => {
            warn!(error = %err, "query log unavailable; continuing without it");
            None
        }
        Err(err) => {
            warn!(error = %err, "query log task failed; continuing without it");
            None
        }
    };

    let listener = TcpListener::bind(&config.bind_addr).await?;
    info!(addr = %listener.local_addr()?, "stockpulse web listening");

    axum::serve(listener, router(AppState::new(fetcher, query_log)))
        .with_graceful_shutdown(shutdown::on_signal(tokio::signal::ctrl_c()))
        .await?;

    info!("stockpulse web stopped");
    Ok(())
}
