use serde::{Deserialize, Serialize};

use crate::{Symbol, TimeFrame, TradingDate, ValidationError};

/// A validated request for one symbol's series at one granularity.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct QuoteRequest {
    pub symbol: Symbol,
    pub time_frame: TimeFrame,
}

impl QuoteRequest {
    pub const fn new(symbol: Symbol, time_frame: TimeFrame) -> Self {
        Self { symbol, time_frame }
    }

    /// Build a request from raw form/query input.
    ///
    /// The symbol is validated strictly; the time frame falls back to daily.
    pub fn parse(symbol: &str, time_frame: &str) -> Result<Self, ValidationError> {
        Ok(Self {
            symbol: Symbol::parse(symbol)?,
            time_frame: TimeFrame::parse_or_default(time_frame),
        })
    }
}

/// One OHLCV observation of a series.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SeriesPoint {
    pub date: TradingDate,
    pub open: f64,
    pub high: f64,
    pub low: f64,
    pub close: f64,
    pub volume: u64,
}

impl SeriesPoint {
    pub fn new(
        date: TradingDate,
        open: f64,
        high: f64,
        low: f64,
        close: f64,
        volume: u64,
    ) -> Result<Self, ValidationError> {
        validate_price("open", open)?;
        validate_price("high", high)?;
        validate_price("low", low)?;
        validate_price("close", close)?;

        Ok(Self {
            date,
            open,
            high,
            low,
            close,
            volume,
        })
    }
}

/// Descriptive fields the provider attaches to a series.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SeriesMetadata {
    pub symbol: Symbol,
    pub time_frame: TimeFrame,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub information: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub last_refreshed: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub time_zone: Option<String>,
}

impl SeriesMetadata {
    pub const fn new(symbol: Symbol, time_frame: TimeFrame) -> Self {
        Self {
            symbol,
            time_frame,
            information: None,
            last_refreshed: None,
            time_zone: None,
        }
    }
}

/// Date-ordered series returned by a successful fetch.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TimeSeries {
    pub metadata: SeriesMetadata,
    pub points: Vec<SeriesPoint>,
}

impl TimeSeries {
    /// Sorts `points` by ascending date.
    pub fn new(metadata: SeriesMetadata, mut points: Vec<SeriesPoint>) -> Self {
        points.sort_by_key(|point| point.date);
        Self { metadata, points }
    }

    pub fn len(&self) -> usize {
        self.points.len()
    }

    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    pub fn latest(&self) -> Option<&SeriesPoint> {
        self.points.last()
    }
}

fn validate_price(field: &'static str, value: f64) -> Result<(), ValidationError> {
    if !value.is_finite() {
        return Err(ValidationError::NonFiniteValue { field });
    }
    if value <= 0.0 {
        return Err(ValidationError::NonPositiveValue { field });
    }
    Ok(())
}
