//! # Stockpulse Web
//!
//! axum application serving the stock lookup page, the JSON API and SVG charts.
//!
//! | Route | Response |
//! |-------|----------|
//! | `GET /`, `POST /` | HTML lookup form and results, AAPL when no symbol is given |
//! | `GET /api/stock/:symbol` | Envelope with a [`StockReport`](stockpulse_core::StockReport) |
//! | `GET /api/quote/:symbol` | Envelope with the latest [`GlobalQuote`](stockpulse_core::GlobalQuote) |
//! | `GET /api/overview/:symbol` | Envelope with a [`CompanyOverview`](stockpulse_core::CompanyOverview) |
//! | `GET /api/search?keywords=` | Envelope with matching symbols |
//! | `GET /chart/:symbol` | `image/svg+xml` price chart |
//! | `GET /api/history` | Recently served queries |
//! | `GET /api/history/symbols` | Query totals per symbol |

pub mod error;
pub mod pages;
pub mod routes;
pub mod shutdown;
pub mod state;

pub use error::{status_for, ApiError, ServerError};
pub use routes::router;
pub use state::AppState;
