use serde::{Deserialize, Serialize};

use crate::stats::{recent_points, SeriesStats, DEFAULT_RECENT_POINTS};
use crate::{SeriesMetadata, SeriesPoint, TimeSeries};

/// Everything the HTML page and the JSON API show for one successful fetch.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StockReport {
    pub metadata: SeriesMetadata,
    pub stats: SeriesStats,
    /// Newest first.
    pub recent: Vec<SeriesPoint>,
    /// Full series, oldest first.
    pub series: Vec<SeriesPoint>,
}

impl StockReport {
    pub fn build(series: TimeSeries) -> Self {
        Self::build_with_recent(series, DEFAULT_RECENT_POINTS)
    }

    pub fn build_with_recent(series: TimeSeries, recent: usize) -> Self {
        let TimeSeries { metadata, points } = series;
        Self {
            stats: SeriesStats::from_points(&points),
            recent: recent_points(&points, recent),
            metadata,
            series: points,
        }
    }
}
