use axum::extract::{Path, Query, State};
use axum::http::{header, StatusCode};
use axum::response::{Html, IntoResponse, Response};
use axum::routing::get;
use axum::{Form, Json, Router};
use serde::{Deserialize, Serialize};
use stockpulse_core::{
    render_svg, ChartOptions, Envelope, EnvelopeError, EnvelopeMeta, FetchOutcome, StockReport,
    TimeFrame,
};
use stockpulse_warehouse::{QueryLogRecord, SymbolQueryCount};
use tower_http::trace::TraceLayer;

use crate::error::{status_for, ApiError};
use crate::pages;
use crate::state::AppState;

pub const DEFAULT_SYMBOL: &str = "AAPL";
pub const DEFAULT_HISTORY_LIMIT: usize = 20;

pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/", get(index_query).post(index_form))
        .route("/api/stock/:symbol", get(api_stock))
        .route("/api/quote/:symbol", get(api_quote))
        .route("/api/overview/:symbol", get(api_overview))
        .route("/api/search", get(api_search))
        .route("/chart/:symbol", get(chart))
        .route("/api/history", get(history))
        .route("/api/history/symbols", get(history_symbols))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

/// Lookup form fields, from the query string or a posted form.
#[derive(Debug, Default, Deserialize)]
pub struct LookupParams {
    pub symbol: Option<String>,
    pub time_frame: Option<String>,
}

impl LookupParams {
    fn symbol(&self) -> Option<&str> {
        self.symbol.as_deref().filter(|symbol| !symbol.trim().is_empty())
    }

    fn time_frame(&self) -> &str {
        self.time_frame
            .as_deref()
            .filter(|value| !value.trim().is_empty())
            .unwrap_or(TimeFrame::Daily.as_str())
    }
}

#[derive(Debug, Default, Deserialize)]
pub struct ChartParams {
    pub time_frame: Option<String>,
    pub points: Option<usize>,
}

#[derive(Debug, Default, Deserialize)]
pub struct SearchParams {
    pub keywords: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
pub struct HistoryParams {
    pub limit: Option<usize>,
}

async fn index_query(State(state): State<AppState>, Query(params): Query<LookupParams>) -> Html<String> {
    lookup_page(&state, params).await
}

async fn index_form(State(state): State<AppState>, Form(params): Form<LookupParams>) -> Html<String> {
    lookup_page(&state, params).await
}

/// Results for the submitted symbol, [`DEFAULT_SYMBOL`] when none was
/// given. Failures re-show the form with a message.
async fn lookup_page(state: &AppState, params: LookupParams) -> Html<String> {
    let time_frame = TimeFrame::parse_or_default(params.time_frame());
    let symbol = params.symbol().unwrap_or(DEFAULT_SYMBOL);

    let outcome = fetch_and_record(state, symbol, params.time_frame()).await;
    match outcome.result {
        Ok(series) => Html(pages::results_page(&StockReport::build(series))),
        Err(error) => Html(pages::index_page(symbol, time_frame, Some(&error.user_message()))),
    }
}

async fn api_stock(
    State(state): State<AppState>,
    Path(symbol): Path<String>,
    Query(params): Query<LookupParams>,
) -> Response {
    let raw_time_frame = params.time_frame();
    let outcome = fetch_and_record(&state, &symbol, raw_time_frame).await;
    let meta = envelope_meta(&outcome, raw_time_frame);

    match outcome.result {
        Ok(series) => {
            let envelope = Envelope::success(meta, StockReport::build(series));
            (StatusCode::OK, Json(envelope)).into_response()
        }
        Err(error) => {
            let envelope = Envelope::<StockReport>::failure(meta, EnvelopeError::from(&error));
            (status_for(&error), Json(envelope)).into_response()
        }
    }
}

async fn api_quote(State(state): State<AppState>, Path(symbol): Path<String>) -> Response {
    envelope_response(state.fetcher.fetch_quote(&symbol).await)
}

async fn api_overview(State(state): State<AppState>, Path(symbol): Path<String>) -> Response {
    envelope_response(state.fetcher.fetch_overview(&symbol).await)
}

async fn api_search(State(state): State<AppState>, Query(params): Query<SearchParams>) -> Response {
    let keywords = params.keywords.unwrap_or_default();
    envelope_response(state.fetcher.search_symbols(&keywords).await)
}

async fn chart(
    State(state): State<AppState>,
    Path(symbol): Path<String>,
    Query(params): Query<ChartParams>,
) -> Response {
    let raw_time_frame = params.time_frame.as_deref().unwrap_or(TimeFrame::Daily.as_str());
    let outcome = fetch_and_record(&state, &symbol, raw_time_frame).await;
    let meta = envelope_meta(&outcome, raw_time_frame);

    match outcome.result {
        Ok(series) => {
            let mut options = ChartOptions::default();
            if let Some(points) = params.points.filter(|points| *points > 0) {
                options.max_points = points;
            }
            let svg = render_svg(series.metadata.symbol.as_str(), &series.points, &options);
            ([(header::CONTENT_TYPE, "image/svg+xml")], svg).into_response()
        }
        Err(error) => {
            let envelope = Envelope::<()>::failure(meta, EnvelopeError::from(&error));
            (status_for(&error), Json(envelope)).into_response()
        }
    }
}

async fn history(
    State(state): State<AppState>,
    Query(params): Query<HistoryParams>,
) -> Result<Json<Envelope<Vec<QueryLogRecord>>>, ApiError> {
    let query_log = state.query_log.clone().ok_or(ApiError::QueryLogUnavailable)?;
    let limit = params.limit.unwrap_or(DEFAULT_HISTORY_LIMIT);

    let records = tokio::task::spawn_blocking(move || query_log.recent_queries(limit)).await??;
    Ok(Json(Envelope::success(EnvelopeMeta::new(0, 0), records)))
}

async fn history_symbols(
    State(state): State<AppState>,
    Query(params): Query<HistoryParams>,
) -> Result<Json<Envelope<Vec<SymbolQueryCount>>>, ApiError> {
    let query_log = state.query_log.clone().ok_or(ApiError::QueryLogUnavailable)?;
    let limit = params.limit.unwrap_or(DEFAULT_HISTORY_LIMIT);

    let counts = tokio::task::spawn_blocking(move || query_log.query_counts(limit)).await??;
    Ok(Json(Envelope::success(EnvelopeMeta::new(0, 0), counts)))
}

async fn fetch_and_record(state: &AppState, symbol: &str, raw_time_frame: &str) -> FetchOutcome {
    let outcome = state.fetcher.fetch_raw_detailed(symbol, raw_time_frame).await;
    state
        .record_query(symbol, TimeFrame::parse_or_default(raw_time_frame), &outcome.result)
        .await;
    outcome
}

fn envelope_response<T: Serialize>(outcome: FetchOutcome<T>) -> Response {
    let meta = outcome_meta(&outcome);
    match outcome.result {
        Ok(data) => (StatusCode::OK, Json(Envelope::success(meta, data))).into_response(),
        Err(error) => {
            let envelope = Envelope::<T>::failure(meta, EnvelopeError::from(&error));
            (status_for(&error), Json(envelope)).into_response()
        }
    }
}

fn outcome_meta<T>(outcome: &FetchOutcome<T>) -> EnvelopeMeta {
    let latency_ms = u64::try_from(outcome.latency.as_millis()).unwrap_or(u64::MAX);
    EnvelopeMeta::new(latency_ms, outcome.attempts)
}

fn envelope_meta(outcome: &FetchOutcome, raw_time_frame: &str) -> EnvelopeMeta {
    let meta = outcome_meta(outcome);
    if TimeFrame::is_recognized(raw_time_frame) {
        meta
    } else {
        meta.with_warning(format!("unknown time frame '{raw_time_frame}', using daily"))
    }
}
