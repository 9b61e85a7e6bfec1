use serde_json::{Map, Value};

use crate::http_client::{HttpError, HttpResponse};
use crate::{CompanyOverview, GlobalQuote, Symbol, SymbolMatch, TradingDate};

use super::classify::{field, number_of, provider_body, text_of, volume_of};
use super::error::{FetchError, FetchResult};

const GLOBAL_QUOTE_FIELD: &str = "Global Quote";
const BEST_MATCHES_FIELD: &str = "bestMatches";

/// Classify a `GLOBAL_QUOTE` response. Unknown symbols come back as an empty
/// quote object, which is malformed.
pub fn classify_quote(
    symbol: &Symbol,
    response: Result<HttpResponse, HttpError>,
) -> FetchResult<GlobalQuote> {
    let root = provider_body(response)?;
    let quote = match root.get(GLOBAL_QUOTE_FIELD) {
        Some(Value::Object(quote)) if !quote.is_empty() => quote,
        Some(Value::Object(_)) => {
            return Err(FetchError::malformed(format!("no quote for {symbol}")));
        }
        _ => return Err(FetchError::malformed("response has no 'Global Quote' section")),
    };

    let price = optional_number(quote, "price")?
        .ok_or_else(|| FetchError::malformed("quote has no price"))?;
    let change_pct = match field(quote, "change percent") {
        Some(value) => percent_of(value)
            .ok_or_else(|| FetchError::malformed(format!("invalid change percent {value}")))?,
        None => 0.0,
    };
    let volume = match field(quote, "volume") {
        Some(value) => volume_of(value)
            .ok_or_else(|| FetchError::malformed(format!("invalid volume {value}")))?,
        None => 0,
    };
    let latest_trading_day = field(quote, "latest trading day")
        .and_then(Value::as_str)
        .and_then(|text| TradingDate::parse(text).ok());

    Ok(GlobalQuote {
        symbol: symbol.clone(),
        price,
        open: optional_number(quote, "open")?,
        high: optional_number(quote, "high")?,
        low: optional_number(quote, "low")?,
        previous_close: optional_number(quote, "previous close")?,
        change: optional_number(quote, "change")?.unwrap_or(0.0),
        change_pct,
        volume,
        latest_trading_day,
    })
}

/// Classify an `OVERVIEW` response. The provider answers unknown symbols
/// with `{}`, which is malformed.
pub fn classify_overview(
    symbol: &Symbol,
    response: Result<HttpResponse, HttpError>,
) -> FetchResult<CompanyOverview> {
    let root = provider_body(response)?;
    let name = reported_text(&root, "Name")
        .ok_or_else(|| FetchError::malformed(format!("no company overview for {symbol}")))?;

    Ok(CompanyOverview {
        symbol: symbol.clone(),
        name,
        description: reported_text(&root, "Description"),
        exchange: reported_text(&root, "Exchange"),
        currency: reported_text(&root, "Currency"),
        sector: reported_text(&root, "Sector"),
        industry: reported_text(&root, "Industry"),
        market_cap: reported_number(&root, "MarketCapitalization"),
        pe_ratio: reported_number(&root, "PERatio"),
        week_52_high: reported_number(&root, "52WeekHigh"),
        week_52_low: reported_number(&root, "52WeekLow"),
    })
}

/// Classify a `SYMBOL_SEARCH` response. No `bestMatches` means no hits.
pub fn classify_search(
    response: Result<HttpResponse, HttpError>,
) -> FetchResult<Vec<SymbolMatch>> {
    let root = provider_body(response)?;
    let matches = match root.get(BEST_MATCHES_FIELD) {
        None => return Ok(Vec::new()),
        Some(Value::Array(matches)) => matches,
        Some(_) => return Err(FetchError::malformed("'bestMatches' is not an array")),
    };

    let mut hits = Vec::with_capacity(matches.len());
    for entry in matches {
        let Some(entry) = entry.as_object() else {
            continue;
        };
        let Some(symbol) = field(entry, "symbol").map(text_of) else {
            tracing::warn!("skipping search match without a symbol");
            continue;
        };
        hits.push(SymbolMatch {
            symbol,
            name: field(entry, "name").map(text_of).unwrap_or_default(),
            region: field(entry, "region").map(text_of),
            currency: field(entry, "currency").map(text_of),
            match_score: field(entry, "matchScore").and_then(number_of),
        });
    }
    Ok(hits)
}

fn optional_number(entry: &Map<String, Value>, name: &str) -> Result<Option<f64>, FetchError> {
    match field(entry, name) {
        Some(value) => number_of(value)
            .filter(|number| number.is_finite())
            .map(Some)
            .ok_or_else(|| FetchError::malformed(format!("invalid {name} {value}"))),
        None => Ok(None),
    }
}

/// `"1.2345%"` as `1.2345`.
fn percent_of(value: &Value) -> Option<f64> {
    match value {
        Value::String(text) => text.trim().trim_end_matches('%').trim().parse().ok(),
        other => number_of(other),
    }
}

fn reported_text(root: &Map<String, Value>, key: &str) -> Option<String> {
    let text = text_of(root.get(key)?);
    let text = text.trim();
    if text.is_empty() || text == "None" || text == "-" {
        return None;
    }
    Some(text.to_owned())
}

fn reported_number(root: &Map<String, Value>, key: &str) -> Option<f64> {
    root.get(key)
        .and_then(number_of)
        .filter(|number| number.is_finite())
}
