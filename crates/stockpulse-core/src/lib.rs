//! # Stockpulse Core
//!
//! Domain types and the resilient market-data fetcher behind the stockpulse
//! web app and CLI.
//!
//! ## Modules
//!
//! | Module | Description |
//! |--------|-------------|
//! | [`domain`] | Symbols, time frames, series points and dates |
//! | [`http_client`] | Transport seam and the reqwest implementation |
//! | [`retry`] | Bounded retry with flat jittered delays |
//! | [`fetcher`] | Alpha Vantage fetcher for series, quotes, overviews and search |
//! | [`stats`] | Closing-price statistics |
//! | [`chart`] | SVG price chart |
//! | [`envelope`] | JSON response envelope |
//! | [`report`] | Combined series, statistics and recent prices |
//! | [`config`] | Environment configuration |
//! | [`telemetry`] | Log subscriber setup |
//!
//! ## Quick Start
//!
//! ```rust,ignore
//! use stockpulse_core::{AlphaVantageFetcher, AppConfig, StockReport};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let config = AppConfig::from_env()?;
//!     let fetcher = AlphaVantageFetcher::from_config(&config);
//!
//!     let series = fetcher.fetch_raw("AAPL", "daily").await?;
//!     let report = StockReport::build(series);
//!     println!("AAPL close: ${:.2}", report.stats.current);
//!     Ok(())
//! }
//! ```

pub mod chart;
pub mod config;
pub mod domain;
pub mod envelope;
pub mod error;
pub mod fetcher;
pub mod http_client;
pub mod report;
pub mod retry;
pub mod stats;
pub mod telemetry;

pub use chart::{render_svg, ChartOptions};
pub use config::{AppConfig, ConfigError};
pub use domain::*;
pub use envelope::{Envelope, EnvelopeError, EnvelopeMeta, SCHEMA_VERSION};
pub use error::ValidationError;
pub use fetcher::{
    classify_overview, classify_quote, classify_response, classify_search, outcome_code,
    AlphaVantageFetcher, FetchError, FetchErrorKind, FetchOutcome, FetchResult,
};
pub use http_client::{HttpClient, HttpError, HttpRequest, HttpResponse, ReqwestHttpClient};
pub use report::StockReport;
pub use retry::{Backoff, RetryOutcome, RetryPolicy};
pub use stats::SeriesStats;
pub use telemetry::LogFormat;
