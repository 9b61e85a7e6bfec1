//! Resilient Alpha Vantage fetcher.
//!
//! [`AlphaVantageFetcher`] validates input, builds the provider URL, issues
//! one GET per attempt through an injected [`HttpClient`], classifies the
//! response and retries transport failures under its [`RetryPolicy`]. Time
//! series go through [`classify_response`]; quotes, company overviews and
//! symbol search share the same transport, retry and error classification.
//! No call panics and each yields exactly one [`FetchResult`].

mod classify;
mod error;
mod market;

use std::fmt::{Debug, Formatter};
use std::sync::Arc;
use std::time::{Duration, Instant};

use tracing::Instrument;

use crate::config::AppConfig;
use crate::http_client::{HttpClient, HttpError, HttpRequest, HttpResponse, ReqwestHttpClient};
use crate::retry::{retry, RetryPolicy};
use crate::{
    CompanyOverview, GlobalQuote, QuoteRequest, SearchKeywords, Symbol, SymbolMatch, TimeSeries,
};

pub use classify::classify_response;
pub use error::{outcome_code, FetchError, FetchErrorKind, FetchResult};
pub use market::{classify_overview, classify_quote, classify_search};

/// Public Alpha Vantage query endpoint.
pub const DEFAULT_BASE_URL: &str = "https://www.alphavantage.co/query";

/// `compact` limits the provider to its latest 100 points.
const OUTPUT_SIZE: &str = "compact";

const QUOTE_FUNCTION: &str = "GLOBAL_QUOTE";
const OVERVIEW_FUNCTION: &str = "OVERVIEW";
const SEARCH_FUNCTION: &str = "SYMBOL_SEARCH";

/// A fetch result together with how it was obtained.
#[derive(Debug, Clone, PartialEq)]
pub struct FetchOutcome<T = TimeSeries> {
    pub result: FetchResult<T>,
    /// Network attempts made. Zero when the request never left the process.
    pub attempts: u32,
    pub latency: Duration,
}

impl<T> FetchOutcome<T> {
    /// Outcome for a request refused before any network call.
    pub fn rejected(error: FetchError) -> Self {
        Self {
            result: Err(error),
            attempts: 0,
            latency: Duration::ZERO,
        }
    }
}

#[derive(Clone)]
pub struct AlphaVantageFetcher {
    http_client: Arc<dyn HttpClient>,
    api_key: Option<String>,
    base_url: String,
    retry_policy: RetryPolicy,
    span: tracing::Span,
}

impl AlphaVantageFetcher {
    /// A blank `api_key` counts as missing.
    pub fn new(http_client: Arc<dyn HttpClient>, api_key: Option<String>) -> Self {
        Self {
            http_client,
            api_key: api_key.filter(|key| !key.trim().is_empty()),
            base_url: DEFAULT_BASE_URL.to_owned(),
            retry_policy: RetryPolicy::default(),
            span: tracing::info_span!("alphavantage_fetcher"),
        }
    }

    /// Production fetcher over reqwest, configured from `config`.
    pub fn from_config(config: &AppConfig) -> Self {
        Self::new(Arc::new(ReqwestHttpClient::new()), config.api_key.clone())
            .with_base_url(config.base_url.clone())
            .with_retry_policy(config.retry_policy())
    }

    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into();
        self
    }

    pub fn with_retry_policy(mut self, retry_policy: RetryPolicy) -> Self {
        self.retry_policy = retry_policy;
        self
    }

    /// Replace the span every fetch event is recorded under.
    pub fn with_span(mut self, span: tracing::Span) -> Self {
        self.span = span;
        self
    }

    pub fn is_configured(&self) -> bool {
        self.api_key.is_some()
    }

    pub fn retry_policy(&self) -> &RetryPolicy {
        &self.retry_policy
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Outbound URL for `request`. Contains the credential; do not log it.
    pub fn request_url(&self, request: &QuoteRequest) -> String {
        self.url_with_key(
            request.time_frame.function(),
            &series_params(request),
            self.api_key.as_deref().unwrap_or_default(),
        )
    }

    /// `function` first, then `params` in order, credential last.
    fn url_with_key(&self, function: &str, params: &[(&str, &str)], api_key: &str) -> String {
        let mut url = format!("{}?function={}", self.base_url, function);
        for (name, value) in params {
            url.push('&');
            url.push_str(name);
            url.push('=');
            url.push_str(&urlencoding::encode(value));
        }
        url.push_str("&apikey=");
        url.push_str(&urlencoding::encode(api_key));
        url
    }

    pub async fn fetch(&self, request: &QuoteRequest) -> FetchResult {
        self.fetch_detailed(request).await.result
    }

    /// Validate raw input, then fetch. Unknown time frames fall back to daily.
    pub async fn fetch_raw(&self, symbol: &str, time_frame: &str) -> FetchResult {
        self.fetch_raw_detailed(symbol, time_frame).await.result
    }

    pub async fn fetch_raw_detailed(&self, symbol: &str, time_frame: &str) -> FetchOutcome {
        match QuoteRequest::parse(symbol, time_frame) {
            Ok(request) => self.fetch_detailed(&request).await,
            Err(error) => self.reject(error.into()),
        }
    }

    pub async fn fetch_detailed(&self, request: &QuoteRequest) -> FetchOutcome {
        let subject = request.symbol.to_string();
        let outcome = self
            .execute(
                request.time_frame.function(),
                &subject,
                &series_params(request),
                |response| classify_response(request, response),
            )
            .await;

        if let Ok(series) = &outcome.result {
            self.span.in_scope(|| {
                tracing::debug!(
                    symbol = %request.symbol,
                    time_frame = %request.time_frame,
                    points = series.len(),
                    "time series ready"
                );
            });
        }
        outcome
    }

    /// Latest quote for a raw symbol.
    pub async fn fetch_quote(&self, symbol: &str) -> FetchOutcome<GlobalQuote> {
        let symbol = match Symbol::parse(symbol) {
            Ok(symbol) => symbol,
            Err(error) => return self.reject(error.into()),
        };
        self.execute(
            QUOTE_FUNCTION,
            symbol.as_str(),
            &[("symbol", symbol.as_str())],
            |response| classify_quote(&symbol, response),
        )
        .await
    }

    /// Company profile for a raw symbol.
    pub async fn fetch_overview(&self, symbol: &str) -> FetchOutcome<CompanyOverview> {
        let symbol = match Symbol::parse(symbol) {
            Ok(symbol) => symbol,
            Err(error) => return self.reject(error.into()),
        };
        self.execute(
            OVERVIEW_FUNCTION,
            symbol.as_str(),
            &[("symbol", symbol.as_str())],
            |response| classify_overview(&symbol, response),
        )
        .await
    }

    /// Symbols matching free-text `keywords`, best match first.
    pub async fn search_symbols(&self, keywords: &str) -> FetchOutcome<Vec<SymbolMatch>> {
        let keywords = match SearchKeywords::parse(keywords) {
            Ok(keywords) => keywords,
            Err(error) => return self.reject(error.into()),
        };
        self.execute(
            SEARCH_FUNCTION,
            keywords.as_str(),
            &[("keywords", keywords.as_str())],
            classify_search,
        )
        .await
    }

    fn reject<T>(&self, error: FetchError) -> FetchOutcome<T> {
        self.span.in_scope(|| {
            tracing::error!(
                code = error.code(),
                error = %error,
                "rejected fetch request before network call"
            );
        });
        FetchOutcome::rejected(error)
    }

    async fn execute<T, C>(
        &self,
        function: &str,
        subject: &str,
        params: &[(&str, &str)],
        classify: C,
    ) -> FetchOutcome<T>
    where
        C: Fn(Result<HttpResponse, HttpError>) -> FetchResult<T>,
    {
        let started = Instant::now();
        let span = self.span.clone();

        async move {
            let Some(api_key) = self.api_key.as_deref() else {
                let error = FetchError::Unconfigured;
                tracing::error!(
                    function,
                    subject,
                    code = error.code(),
                    "market data API key is not configured"
                );
                return FetchOutcome::rejected(error);
            };

            let url = self.url_with_key(function, params, api_key);
            let client = &self.http_client;
            let classify = &classify;
            let max_attempts = self.retry_policy.max_attempts;

            let outcome = retry(&self.retry_policy, FetchError::retryable, move |attempt| {
                let url = url.clone();
                async move {
                    tracing::info!(function, subject, attempt, max_attempts, "requesting provider");
                    let response = client.execute(HttpRequest::get(url)).await;
                    let result = classify(response);
                    if let Err(error) = &result {
                        if error.retryable() {
                            tracing::warn!(
                                function,
                                subject,
                                attempt,
                                max_attempts,
                                code = error.code(),
                                error = %error,
                                "retryable fetch failure"
                            );
                        }
                    }
                    result
                }
            })
            .await;

            let latency = started.elapsed();
            match &outcome.result {
                Ok(_) => tracing::info!(
                    function,
                    subject,
                    attempts = outcome.attempts,
                    latency_ms = latency.as_millis() as u64,
                    "fetch succeeded"
                ),
                Err(error) => tracing::error!(
                    function,
                    subject,
                    attempts = outcome.attempts,
                    code = error.code(),
                    error = %error,
                    "fetch failed"
                ),
            }

            FetchOutcome {
                result: outcome.result,
                attempts: outcome.attempts,
                latency,
            }
        }
        .instrument(span)
        .await
    }
}

fn series_params(request: &QuoteRequest) -> [(&'static str, &str); 2] {
    [
        ("symbol", request.symbol.as_str()),
        ("outputsize", OUTPUT_SIZE),
    ]
}

impl Debug for AlphaVantageFetcher {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AlphaVantageFetcher")
            .field("api_key", &self.api_key.as_ref().map(|_| "<redacted>"))
            .field("base_url", &self.base_url)
            .field("retry_policy", &self.retry_policy)
            .finish_non_exhaustive()
    }
}
