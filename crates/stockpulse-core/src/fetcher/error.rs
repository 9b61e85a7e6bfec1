use thiserror::Error;

use crate::{TimeSeries, ValidationError};

/// Outcome of one fetch: a date-ordered series (or another provider
/// payload) or exactly one failure.
pub type FetchResult<T = TimeSeries> = Result<T, FetchError>;

/// `ok` for a success, otherwise the failure code. Used as the query log outcome.
pub fn outcome_code<T>(result: &FetchResult<T>) -> &'static str {
    match result {
        Ok(_) => "ok",
        Err(error) => error.code(),
    }
}

/// Coarse failure class, stable across message changes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FetchErrorKind {
    InvalidInput,
    Unconfigured,
    TransportFailure,
    ProviderError,
    RateLimited,
    MalformedResponse,
}

/// Every way a fetch can fail.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum FetchError {
    #[error("invalid input: {0}")]
    InvalidInput(#[from] ValidationError),

    #[error("market data API key is not configured")]
    Unconfigured,

    #[error("transport failure: {cause}")]
    TransportFailure { cause: String },

    /// The provider rejected the request; carries its message verbatim.
    #[error("{message}")]
    ProviderError { message: String },

    #[error("rate limited by provider: {message}")]
    RateLimited { message: String },

    #[error("malformed response: {reason}")]
    MalformedResponse { reason: String },
}

impl FetchError {
    pub fn transport(cause: impl Into<String>) -> Self {
        Self::TransportFailure {
            cause: cause.into(),
        }
    }

    pub fn provider(message: impl Into<String>) -> Self {
        Self::ProviderError {
            message: message.into(),
        }
    }

    pub fn rate_limited(message: impl Into<String>) -> Self {
        Self::RateLimited {
            message: message.into(),
        }
    }

    pub fn malformed(reason: impl Into<String>) -> Self {
        Self::MalformedResponse {
            reason: reason.into(),
        }
    }

    pub const fn kind(&self) -> FetchErrorKind {
        match self {
            Self::InvalidInput(_) => FetchErrorKind::InvalidInput,
            Self::Unconfigured => FetchErrorKind::Unconfigured,
            Self::TransportFailure { .. } => FetchErrorKind::TransportFailure,
            Self::ProviderError { .. } => FetchErrorKind::ProviderError,
            Self::RateLimited { .. } => FetchErrorKind::RateLimited,
            Self::MalformedResponse { .. } => FetchErrorKind::MalformedResponse,
        }
    }

    pub const fn code(&self) -> &'static str {
        match self.kind() {
            FetchErrorKind::InvalidInput => "fetch.invalid_input",
            FetchErrorKind::Unconfigured => "fetch.unconfigured",
            FetchErrorKind::TransportFailure => "fetch.transport_failure",
            FetchErrorKind::ProviderError => "fetch.provider_error",
            FetchErrorKind::RateLimited => "fetch.rate_limited",
            FetchErrorKind::MalformedResponse => "fetch.malformed_response",
        }
    }

    /// Only transport failures are worth another attempt.
    pub const fn retryable(&self) -> bool {
        matches!(self, Self::TransportFailure { .. })
    }

    /// Message suitable for an end user, without internal detail.
    pub fn user_message(&self) -> String {
        match self {
            Self::InvalidInput(error) => format!("Invalid stock symbol: {error}"),
            Self::Unconfigured => {
                String::from("The market data service is not configured on this server.")
            }
            Self::TransportFailure { .. } => String::from(
                "Could not reach the market data service. Please try again shortly.",
            ),
            Self::ProviderError { message } => message.clone(),
            Self::RateLimited { .. } => String::from(
                "API call frequency exceeded. Please wait a minute and try again.",
            ),
            Self::MalformedResponse { .. } => String::from(
                "The market data service returned data we could not understand.",
            ),
        }
    }
}
