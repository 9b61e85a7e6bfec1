//! # Domain Models
//!
//! Canonical domain types for stockpulse time series.
//!
//! | Type | Description |
//! |------|-------------|
//! | [`Symbol`] | Alphabetic ticker, 1 to 5 letters |
//! | [`TimeFrame`] | Daily, weekly or monthly sampling |
//! | [`QuoteRequest`] | Symbol plus time frame |
//! | [`SeriesPoint`] | Dated OHLCV observation |
//! | [`TimeSeries`] | Date-ordered points with provider metadata |
//! | [`TradingDate`] | Calendar date (`YYYY-MM-DD`) |
//! | [`UtcDateTime`] | RFC3339 UTC timestamp |
//! | [`GlobalQuote`] | Latest price snapshot for a symbol |
//! | [`CompanyOverview`] | Company profile and valuation figures |
//! | [`SearchKeywords`], [`SymbolMatch`] | Symbol search input and results |
//!
//! Every constructor validates its invariants and returns a
//! [`ValidationError`](crate::ValidationError) instead of building an
//! invalid value.

mod market;
mod series;
mod symbol;
mod time_frame;
mod timestamp;

pub use market::{CompanyOverview, GlobalQuote, SearchKeywords, SymbolMatch, MAX_KEYWORDS_LEN};
pub use series::{QuoteRequest, SeriesMetadata, SeriesPoint, TimeSeries};
pub use symbol::{Symbol, MAX_SYMBOL_LEN};
pub use time_frame::TimeFrame;
pub use timestamp::{TradingDate, UtcDateTime};
