use serde::{Deserialize, Serialize};

use crate::{Symbol, TradingDate, ValidationError};

/// Longest accepted symbol search, in characters.
pub const MAX_KEYWORDS_LEN: usize = 64;

/// Free-text symbol search input, trimmed and non-empty.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SearchKeywords(String);

impl SearchKeywords {
    pub fn parse(input: &str) -> Result<Self, ValidationError> {
        let trimmed = input.trim();
        if trimmed.is_empty() {
            return Err(ValidationError::EmptyKeywords);
        }

        let len = trimmed.chars().count();
        if len > MAX_KEYWORDS_LEN {
            return Err(ValidationError::KeywordsTooLong {
                len,
                max: MAX_KEYWORDS_LEN,
            });
        }

        Ok(Self(trimmed.to_owned()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

/// Latest trading-day snapshot for one symbol.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GlobalQuote {
    pub symbol: Symbol,
    pub price: f64,
    pub open: Option<f64>,
    pub high: Option<f64>,
    pub low: Option<f64>,
    pub previous_close: Option<f64>,
    pub change: f64,
    /// Percent, so `1.5` means 1.5 %.
    pub change_pct: f64,
    pub volume: u64,
    pub latest_trading_day: Option<TradingDate>,
}

/// Company profile. Figures the provider reports as `None` or `-` are absent.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CompanyOverview {
    pub symbol: Symbol,
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub exchange: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub currency: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sector: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub industry: Option<String>,
    pub market_cap: Option<f64>,
    pub pe_ratio: Option<f64>,
    pub week_52_high: Option<f64>,
    pub week_52_low: Option<f64>,
}

/// One symbol search hit. Symbols are kept as the provider spells them
/// (`TSCO.LON`), so they are not [`Symbol`]s.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SymbolMatch {
    pub symbol: String,
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub region: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub currency: Option<String>,
    /// Provider relevance in `[0, 1]`.
    pub match_score: Option<f64>,
}
