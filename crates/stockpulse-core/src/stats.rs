use serde::{Deserialize, Serialize};

use crate::SeriesPoint;

/// Number of points shown in "recent prices" listings.
pub const DEFAULT_RECENT_POINTS: usize = 10;

/// Descriptive statistics over the closing prices of a series.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct SeriesStats {
    pub periods: usize,
    pub minimum: f64,
    pub maximum: f64,
    pub average: f64,
    /// Latest close.
    pub current: f64,
    /// Close one period before the latest, or zero with fewer than two points.
    pub previous_close: f64,
    pub change: f64,
    pub change_pct: f64,
    pub average_volume: f64,
}

impl SeriesStats {
    /// Compute statistics over `points`, which must be sorted by ascending date.
    ///
    /// An empty slice yields all zeros.
    pub fn from_points(points: &[SeriesPoint]) -> Self {
        let Some(latest) = points.last() else {
            return Self::default();
        };

        let periods = points.len();
        let (minimum, maximum, close_sum, volume_sum) = points.iter().fold(
            (f64::INFINITY, f64::NEG_INFINITY, 0.0, 0.0),
            |(min, max, closes, volumes), point| {
                (
                    min.min(point.close),
                    max.max(point.close),
                    closes + point.close,
                    volumes + point.volume as f64,
                )
            },
        );

        let current = latest.close;
        let (previous_close, change, change_pct) = match points.len().checked_sub(2) {
            Some(index) => {
                let previous = points[index].close;
                let change = current - previous;
                (previous, change, change / previous * 100.0)
            }
            None => (0.0, 0.0, 0.0),
        };

        Self {
            periods,
            minimum,
            maximum,
            average: close_sum / periods as f64,
            current,
            previous_close,
            change,
            change_pct,
            average_volume: volume_sum / periods as f64,
        }
    }

    pub fn is_gain(&self) -> bool {
        self.change >= 0.0
    }
}

/// The newest `count` points, newest first.
pub fn recent_points(points: &[SeriesPoint], count: usize) -> Vec<SeriesPoint> {
    points.iter().rev().take(count).cloned().collect()
}
