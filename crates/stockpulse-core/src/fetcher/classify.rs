use serde_json::{Map, Value};

use crate::http_client::{HttpError, HttpResponse};
use crate::{QuoteRequest, SeriesMetadata, SeriesPoint, TimeSeries, TradingDate};

use super::error::{FetchError, FetchResult};

const ERROR_MESSAGE_FIELD: &str = "Error Message";
const RATE_LIMIT_FIELDS: [&str; 2] = ["Note", "Information"];
const META_DATA_FIELD: &str = "Meta Data";
const SERIES_MARKER: &str = "Time Series";

/// Turn one transport outcome into a fetch result.
///
/// Checks run in a fixed order and the first match wins:
///
/// 1. transport error or non-2xx status: [`FetchError::TransportFailure`]
/// 2. `"Error Message"` field: [`FetchError::ProviderError`]
/// 3. `"Note"` or `"Information"` field: [`FetchError::RateLimited`]
/// 4. body not a JSON object, or no usable series section: [`FetchError::MalformedResponse`]
/// 5. otherwise a [`TimeSeries`] sorted by ascending date
pub fn classify_response(
    request: &QuoteRequest,
    response: Result<HttpResponse, HttpError>,
) -> FetchResult {
    let root = provider_body(response)?;

    let section = series_section(&root, request.time_frame.series_key()).ok_or_else(|| {
        FetchError::malformed(format!(
            "response has no '{}' section",
            request.time_frame.series_key()
        ))
    })?;
    if section.is_empty() {
        return Err(FetchError::malformed("time series section is empty"));
    }

    let mut points = Vec::with_capacity(section.len());
    for (date, entry) in section {
        match parse_point(date, entry) {
            Ok(point) => points.push(point),
            Err(reason) => {
                tracing::warn!(
                    symbol = %request.symbol,
                    date = %date,
                    reason = %reason,
                    "skipping unparseable series entry"
                );
            }
        }
    }

    if points.is_empty() {
        return Err(FetchError::malformed(
            "time series section has no parseable points",
        ));
    }

    let metadata = metadata_from(&root, request);
    Ok(TimeSeries::new(metadata, points))
}

/// Steps 1 to 3 plus the JSON-object check, shared by every provider function.
pub(super) fn provider_body(
    response: Result<HttpResponse, HttpError>,
) -> Result<Map<String, Value>, FetchError> {
    let response = response.map_err(|error| FetchError::transport(error.message()))?;
    if !response.is_success() {
        return Err(FetchError::transport(format!(
            "provider returned HTTP {}",
            response.status
        )));
    }

    let body: Value = serde_json::from_str(&response.body)
        .map_err(|error| FetchError::malformed(format!("response is not valid JSON: {error}")))?;
    let Value::Object(root) = body else {
        return Err(FetchError::malformed("response is not a JSON object"));
    };

    if let Some(message) = root.get(ERROR_MESSAGE_FIELD) {
        return Err(FetchError::provider(text_of(message)));
    }

    if let Some(message) = RATE_LIMIT_FIELDS.iter().find_map(|field| root.get(*field)) {
        return Err(FetchError::rate_limited(text_of(message)));
    }

    Ok(root)
}

pub(super) fn text_of(value: &Value) -> String {
    match value {
        Value::String(text) => text.clone(),
        other => other.to_string(),
    }
}

/// Expected key first, then any object-valued key mentioning a time series.
fn series_section<'a>(root: &'a Map<String, Value>, expected: &str) -> Option<&'a Map<String, Value>> {
    if let Some(Value::Object(section)) = root.get(expected) {
        return Some(section);
    }

    root.iter()
        .filter(|(key, _)| key.contains(SERIES_MARKER))
        .find_map(|(_, value)| value.as_object())
}

fn parse_point(date: &str, entry: &Value) -> Result<SeriesPoint, String> {
    let date = TradingDate::parse(date).map_err(|error| error.to_string())?;
    let entry = entry
        .as_object()
        .ok_or_else(|| String::from("entry is not an object"))?;

    let close = price_field(entry, "close")?
        .ok_or_else(|| String::from("missing close"))?;
    let open = price_field(entry, "open")?.unwrap_or(close);
    let high = price_field(entry, "high")?.unwrap_or(close);
    let low = price_field(entry, "low")?.unwrap_or(close);
    let volume = match field(entry, "volume") {
        Some(value) => volume_of(value).ok_or_else(|| format!("invalid volume {value}"))?,
        None => 0,
    };

    SeriesPoint::new(date, open, high, low, close, volume).map_err(|error| error.to_string())
}

/// Provider fields are numbered (`"1. open"`); match on the name after the number.
pub(super) fn field<'a>(entry: &'a Map<String, Value>, name: &str) -> Option<&'a Value> {
    entry
        .iter()
        .find(|(key, _)| key.rsplit(". ").next() == Some(name))
        .map(|(_, value)| value)
}

/// Close is mandatory; the other prices default to it when absent.
fn price_field(entry: &Map<String, Value>, name: &'static str) -> Result<Option<f64>, String> {
    match field(entry, name) {
        Some(value) => number_of(value)
            .map(Some)
            .ok_or_else(|| format!("invalid {name} {value}")),
        None => Ok(None),
    }
}

pub(super) fn number_of(value: &Value) -> Option<f64> {
    match value {
        Value::String(text) => text.trim().parse().ok(),
        Value::Number(number) => number.as_f64(),
        _ => None,
    }
}

pub(super) fn volume_of(value: &Value) -> Option<u64> {
    if let Value::String(text) = value {
        if let Ok(volume) = text.trim().parse::<u64>() {
            return Some(volume);
        }
    }
    if let Some(volume) = value.as_u64() {
        return Some(volume);
    }
    number_of(value)
        .filter(|volume| volume.is_finite() && *volume >= 0.0)
        .map(|volume| volume.round() as u64)
}

fn metadata_from(root: &Map<String, Value>, request: &QuoteRequest) -> SeriesMetadata {
    let mut metadata = SeriesMetadata::new(request.symbol.clone(), request.time_frame);
    let Some(Value::Object(meta)) = root.get(META_DATA_FIELD) else {
        return metadata;
    };

    for (key, value) in meta {
        let Some(text) = value.as_str() else {
            continue;
        };
        if key.ends_with("Information") {
            metadata.information = Some(text.to_owned());
        } else if key.ends_with("Last Refreshed") {
            metadata.last_refreshed = Some(text.to_owned());
        } else if key.ends_with("Time Zone") {
            metadata.time_zone = Some(text.to_owned());
        }
    }
    metadata
}
