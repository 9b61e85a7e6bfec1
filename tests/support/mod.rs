//! Shared fixtures for integration tests: a scripted transport and
//! provider-shaped response bodies.

#![allow(dead_code)]

use std::collections::VecDeque;
use std::future::Future;
use std::pin::Pin;
use std::sync::{Arc, Mutex};
use std::time::Duration;

use serde_json::{json, Map, Value};
use stockpulse_core::{
    AlphaVantageFetcher, HttpClient, HttpError, HttpRequest, HttpResponse, RetryPolicy,
};

pub type Scripted = Result<HttpResponse, HttpError>;

/// Transport that replays a fixed script and records every request.
///
/// Once the script runs out every further call fails as a transport error.
#[derive(Default)]
pub struct ScriptedHttpClient {
    script: Mutex<VecDeque<Scripted>>,
    requests: Mutex<Vec<HttpRequest>>,
}

impl ScriptedHttpClient {
    pub fn new(script: impl IntoIterator<Item = Scripted>) -> Arc<Self> {
        Arc::new(Self {
            script: Mutex::new(script.into_iter().collect()),
            requests: Mutex::new(Vec::new()),
        })
    }

    /// Always fails at the transport layer.
    pub fn unreachable() -> Arc<Self> {
        Self::new(Vec::<Scripted>::new())
    }

    pub fn calls(&self) -> usize {
        self.requests.lock().expect("requests lock").len()
    }

    pub fn requests(&self) -> Vec<HttpRequest> {
        self.requests.lock().expect("requests lock").clone()
    }
}

impl HttpClient for ScriptedHttpClient {
    fn execute<'a>(
        &'a self,
        request: HttpRequest,
    ) -> Pin<Box<dyn Future<Output = Result<HttpResponse, HttpError>> + Send + 'a>> {
        self.requests.lock().expect("requests lock").push(request);
        let next = self
            .script
            .lock()
            .expect("script lock")
            .pop_front()
            .unwrap_or_else(|| Err(HttpError::new("connection refused")));
        Box::pin(async move { next })
    }
}

pub fn ok(body: impl Into<String>) -> Scripted {
    Ok(HttpResponse::ok_json(body))
}

pub fn status(code: u16) -> Scripted {
    Ok(HttpResponse::new(code, ""))
}

pub fn connection_error() -> Scripted {
    Err(HttpError::new("connection refused"))
}

/// Fetcher with a test key and a fixed retry delay.
pub fn fetcher(client: Arc<ScriptedHttpClient>, delay: Duration) -> AlphaVantageFetcher {
    AlphaVantageFetcher::new(client, Some("test-key".to_owned()))
        .with_base_url("http://provider.test/query")
        .with_retry_policy(RetryPolicy::fixed(delay, 3))
}

/// Provider-shaped body with one entry per `(date, close, volume)`.
pub fn series_body(series_key: &str, entries: &[(&str, f64, u64)]) -> String {
    let mut section = Map::new();
    for (date, close, volume) in entries {
        section.insert(
            (*date).to_owned(),
            json!({
                "1. open": format!("{:.4}", close - 1.0),
                "2. high": format!("{:.4}", close + 2.0),
                "3. low": format!("{:.4}", close - 2.0),
                "4. close": format!("{close:.4}"),
                "5. volume": volume.to_string(),
            }),
        );
    }

    let mut body = json!({
        "Meta Data": {
            "1. Information": "Prices",
            "2. Symbol": "TEST",
            "3. Last Refreshed": entries.iter().map(|(d, _, _)| *d).max().unwrap_or_default(),
            "4. Time Zone": "US/Eastern",
        },
    });
    body[series_key] = Value::Object(section);
    body.to_string()
}

pub fn daily_body(entries: &[(&str, f64, u64)]) -> String {
    series_body("Time Series (Daily)", entries)
}

/// `GLOBAL_QUOTE` body for `symbol` at `price`, one point above yesterday.
pub fn quote_body(symbol: &str, price: f64) -> String {
    json!({
        "Global Quote": {
            "01. symbol": symbol,
            "02. open": format!("{:.4}", price - 0.5),
            "03. high": format!("{:.4}", price + 1.0),
            "04. low": format!("{:.4}", price - 1.0),
            "05. price": format!("{price:.4}"),
            "06. volume": "1500000",
            "07. latest trading day": "2024-01-05",
            "08. previous close": format!("{:.4}", price - 1.0),
            "09. change": "1.0000",
            "10. change percent": "0.5000%",
        }
    })
    .to_string()
}

pub fn overview_body(symbol: &str, name: &str) -> String {
    json!({
        "Symbol": symbol,
        "Name": name,
        "Description": "Makes things.",
        "Exchange": "NYSE",
        "Currency": "USD",
        "Sector": "TECHNOLOGY",
        "Industry": "None",
        "MarketCapitalization": "150000000000",
        "PERatio": "22.5",
        "52WeekHigh": "199.62",
        "52WeekLow": "-",
    })
    .to_string()
}

/// `SYMBOL_SEARCH` body with one match per `(symbol, name)`.
pub fn search_body(matches: &[(&str, &str)]) -> String {
    let best: Vec<Value> = matches
        .iter()
        .map(|(symbol, name)| {
            json!({
                "1. symbol": symbol,
                "2. name": name,
                "3. type": "Equity",
                "4. region": "United States",
                "8. currency": "USD",
                "9. matchScore": "0.8000",
            })
        })
        .collect();
    json!({ "bestMatches": best }).to_string()
}
