use std::sync::Arc;

use stockpulse_core::{outcome_code, AlphaVantageFetcher, FetchResult, TimeFrame, UtcDateTime};
use stockpulse_warehouse::{QueryLogEntry, Warehouse};
use tracing::{debug, warn};

/// Shared handler state.
#[derive(Clone)]
pub struct AppState {
    pub fetcher: Arc<AlphaVantageFetcher>,
    /// `None` when the query log could not be opened; lookups still work.
    pub query_log: Option<Warehouse>,
}

impl AppState {
    pub fn new(fetcher: AlphaVantageFetcher, query_log: Option<Warehouse>) -> Self {
        Self {
            fetcher: Arc::new(fetcher),
            query_log,
        }
    }

    /// Append a served lookup to the query log. Failures are logged and dropped.
    pub async fn record_query(&self, symbol: &str, time_frame: TimeFrame, result: &FetchResult) {
        let Some(query_log) = self.query_log.clone() else {
            return;
        };

        let entry = QueryLogEntry::new(
            symbol.trim().to_ascii_uppercase(),
            time_frame.as_str(),
            outcome_code(result),
            UtcDateTime::now().format_rfc3339(),
        );

        match tokio::task::spawn_blocking(move || query_log.log_query(&entry)).await {
            Ok(Ok(id)) => debug!(id, "query logged"),
            Ok(Err(error)) => warn!(%error, "failed to log query"),
            Err(error) => warn!(%error, "query log task failed"),
        }
    }
}
