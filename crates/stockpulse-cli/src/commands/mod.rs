mod chart;
mod fetch;
mod history;
mod market;
mod stats;

use serde_json::Value;
use stockpulse_core::{
    outcome_code, AlphaVantageFetcher, AppConfig, Envelope, EnvelopeError, EnvelopeMeta,
    FetchOutcome, TimeFrame, UtcDateTime,
};
use stockpulse_warehouse::{QueryLogEntry, Warehouse, WarehouseConfig};

use crate::cli::{Cli, Command, SeriesArgs};
use crate::error::CliError;

pub struct CommandResult {
    pub data: Option<Value>,
    pub warnings: Vec<String>,
    pub errors: Vec<EnvelopeError>,
    pub latency_ms: u64,
    pub attempts: u32,
}

impl CommandResult {
    pub fn ok(data: Value) -> Self {
        Self {
            data: Some(data),
            warnings: Vec::new(),
            errors: Vec::new(),
            latency_ms: 0,
            attempts: 0,
        }
    }

    pub fn failed(error: EnvelopeError) -> Self {
        Self {
            data: None,
            warnings: Vec::new(),
            errors: vec![error],
            latency_ms: 0,
            attempts: 0,
        }
    }

    pub fn with_warnings(mut self, warnings: Vec<String>) -> Self {
        self.warnings.extend(warnings);
        self
    }

    pub fn with_outcome<T>(mut self, outcome: &FetchOutcome<T>) -> Self {
        self.latency_ms = u64::try_from(outcome.latency.as_millis()).unwrap_or(u64::MAX);
        self.attempts = outcome.attempts;
        self
    }
}

/// What a command needs from the process: a fetcher and where the query log lives.
pub struct Context {
    pub fetcher: AlphaVantageFetcher,
    pub query_log: WarehouseConfig,
}

impl Context {
    pub fn from_config(config: &AppConfig) -> Self {
        Self {
            fetcher: AlphaVantageFetcher::from_config(config),
            query_log: WarehouseConfig::at(&config.home),
        }
    }

    /// Open the query log and run `operation` on the blocking pool, off the
    /// async runtime.
    pub async fn with_query_log<T, F>(&self, operation: F) -> Result<T, CliError>
    where
        F: FnOnce(&Warehouse) -> Result<T, CliError> + Send + 'static,
        T: Send + 'static,
    {
        let config = self.query_log.clone();
        tokio::task::spawn_blocking(move || operation(&Warehouse::open(config)?)).await?
    }
}

pub async fn run(cli: &Cli, context: &Context) -> Result<Envelope<Value>, CliError> {
    let result = match &cli.command {
        Command::Fetch(args) => fetch::run(args, context).await?,
        Command::Stats(args) => stats::run(args, context).await?,
        Command::Chart(args) => chart::run(args, context).await?,
        Command::Quote(args) => market::quote(args, context).await?,
        Command::Overview(args) => market::overview(args, context).await?,
        Command::Search(args) => market::search(args, context).await?,
        Command::History(args) => history::run(args, context).await?,
    };

    let CommandResult {
        data,
        warnings,
        errors,
        latency_ms,
        attempts,
    } = result;

    let mut meta = EnvelopeMeta::new(latency_ms, attempts);
    meta.warnings = warnings;
    Ok(Envelope { meta, data, errors })
}

/// Fetch the series named by `args` and log the query.
///
/// Returns the outcome and any warnings the caller should surface.
async fn lookup(args: &SeriesArgs, context: &Context) -> (FetchOutcome, Vec<String>) {
    let mut warnings = Vec::new();
    if !TimeFrame::is_recognized(&args.time_frame) {
        warnings.push(format!("unknown time frame '{}', using daily", args.time_frame));
    }

    let outcome = context.fetcher.fetch_raw_detailed(&args.symbol, &args.time_frame).await;

    let entry = QueryLogEntry::new(
        args.symbol.trim().to_ascii_uppercase(),
        TimeFrame::parse_or_default(&args.time_frame).as_str(),
        outcome_code(&outcome.result),
        UtcDateTime::now().format_rfc3339(),
    );
    let logged = context
        .with_query_log(move |log| Ok(log.log_query(&entry)?))
        .await;
    if let Err(error) = logged {
        tracing::warn!(%error, "failed to log query");
        warnings.push(format!("query log unavailable: {error}"));
    }

    (outcome, warnings)
}

#[cfg(test)]
pub(crate) mod test_support {
    use std::future::Future;
    use std::path::Path;
    use std::pin::Pin;
    use std::sync::{Arc, Mutex};
    use std::time::Duration;

    use stockpulse_core::{
        AlphaVantageFetcher, HttpClient, HttpError, HttpRequest, HttpResponse, RetryPolicy,
    };
    use stockpulse_warehouse::WarehouseConfig;

    use super::Context;

    /// Answers every request with the same body and counts calls.
    pub struct FixedClient {
        body: Option<String>,
        pub calls: Mutex<usize>,
    }

    impl HttpClient for FixedClient {
        fn execute<'a>(
            &'a self,
            _request: HttpRequest,
        ) -> Pin<Box<dyn Future<Output = Result<HttpResponse, HttpError>> + Send + 'a>> {
            *self.calls.lock().expect("calls lock") += 1;
            let response = match &self.body {
                Some(body) => Ok(HttpResponse::ok_json(body.clone())),
                None => Err(HttpError::new("connection refused")),
            };
            Box::pin(async move { response })
        }
    }

    pub fn daily_body() -> String {
        serde_json::json!({
            "Meta Data": { "2. Symbol": "AAPL", "3. Last Refreshed": "2024-01-04" },
            "Time Series (Daily)": {
                "2024-01-02": { "4. close": "185.64", "5. volume": "82488700" },
                "2024-01-03": { "4. close": "184.25", "5. volume": "58414500" },
                "2024-01-04": { "4. close": "181.91", "5. volume": "71983600" },
            }
        })
        .to_string()
    }

    /// Context whose provider returns `body` (or refuses connections) and
    /// whose query log lives under `home`.
    pub fn context(body: Option<String>, home: &Path) -> (Context, Arc<FixedClient>) {
        let client = Arc::new(FixedClient {
            body,
            calls: Mutex::new(0),
        });
        let fetcher = AlphaVantageFetcher::new(client.clone(), Some("test-key".to_owned()))
            .with_retry_policy(RetryPolicy::fixed(Duration::from_millis(1), 3));
        let context = Context {
            fetcher,
            query_log: WarehouseConfig::at(home),
        };
        (context, client)
    }
}
