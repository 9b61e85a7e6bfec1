use thiserror::Error;

/// Validation errors raised while building `stockpulse-core` domain values.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ValidationError {
    #[error("symbol cannot be empty")]
    EmptySymbol,
    #[error("symbol length {len} exceeds max {max}")]
    SymbolTooLong { len: usize, max: usize },
    #[error("symbol must be alphabetic, found '{ch}' at index {index}")]
    SymbolInvalidChar { ch: char, index: usize },

    #[error("search keywords cannot be empty")]
    EmptyKeywords,
    #[error("search keywords length {len} exceeds max {max}")]
    KeywordsTooLong { len: usize, max: usize },

    #[error("invalid time frame '{value}', expected one of daily, weekly, monthly")]
    InvalidTimeFrame { value: String },

    #[error("date must be formatted as YYYY-MM-DD: '{value}'")]
    InvalidDate { value: String },
    #[error("timestamp must be RFC3339 UTC (suffix Z): '{value}'")]
    TimestampNotUtc { value: String },

    #[error("field '{field}' must be finite")]
    NonFiniteValue { field: &'static str },
    #[error("field '{field}' must be greater than zero")]
    NonPositiveValue { field: &'static str },
}
