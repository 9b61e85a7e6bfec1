use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use stockpulse_core::{ConfigError, Envelope, EnvelopeError, EnvelopeMeta, FetchError, FetchErrorKind};
use stockpulse_warehouse::WarehouseError;
use thiserror::Error;

/// HTTP status reported for a failed fetch.
pub fn status_for(error: &FetchError) -> StatusCode {
    match error.kind() {
        FetchErrorKind::InvalidInput => StatusCode::BAD_REQUEST,
        FetchErrorKind::RateLimited => StatusCode::TOO_MANY_REQUESTS,
        FetchErrorKind::ProviderError | FetchErrorKind::MalformedResponse => StatusCode::BAD_GATEWAY,
        FetchErrorKind::Unconfigured => StatusCode::SERVICE_UNAVAILABLE,
        FetchErrorKind::TransportFailure => StatusCode::GATEWAY_TIMEOUT,
    }
}

/// Failures of the non-fetch API routes.
#[derive(Debug, Error)]
pub enum ApiError {
    #[error("query log is not available")]
    QueryLogUnavailable,

    #[error(transparent)]
    Warehouse(#[from] WarehouseError),

    #[error("background task failed: {0}")]
    Join(#[from] tokio::task::JoinError),
}

impl ApiError {
    pub const fn code(&self) -> &'static str {
        match self {
            Self::QueryLogUnavailable => "api.query_log_unavailable",
            Self::Warehouse(WarehouseError::QueryRejected(_)) => "api.invalid_limit",
            Self::Warehouse(_) => "api.warehouse",
            Self::Join(_) => "api.internal",
        }
    }

    pub const fn status(&self) -> StatusCode {
        match self {
            Self::QueryLogUnavailable => StatusCode::SERVICE_UNAVAILABLE,
            Self::Warehouse(WarehouseError::QueryRejected(_)) => StatusCode::BAD_REQUEST,
            Self::Warehouse(_) | Self::Join(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let error = EnvelopeError::new(self.code(), self.to_string(), false);
        let envelope = Envelope::<()>::failure(EnvelopeMeta::new(0, 0), error);
        (self.status(), Json(envelope)).into_response()
    }
}

/// Startup failures of the server binary.
#[derive(Debug, Error)]
pub enum ServerError {
    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error(transparent)]
    Io(#[from] std::io::Error),
}
