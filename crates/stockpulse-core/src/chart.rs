//! SVG price chart.
//!
//! Renders the closing prices of the most recent points as a line chart on a
//! dark background. Output is a standalone `<svg>` document that can be
//! served as `image/svg+xml` or inlined into HTML.

use crate::SeriesPoint;

pub const NEON_BLUE: &str = "#0ff0fc";
pub const NEON_PINK: &str = "#ff2a6d";
pub const NEON_PURPLE: &str = "#d300c5";
pub const DARK_BG: &str = "#0a0a12";

const MARGIN_LEFT: f64 = 80.0;
const MARGIN_RIGHT: f64 = 24.0;
const MARGIN_TOP: f64 = 48.0;
const MARGIN_BOTTOM: f64 = 64.0;
const GRID_LINES: usize = 5;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ChartOptions {
    pub width: u32,
    pub height: u32,
    /// Only the newest `max_points` closes are drawn.
    pub max_points: usize,
}

impl Default for ChartOptions {
    fn default() -> Self {
        Self {
            width: 960,
            height: 480,
            max_points: 30,
        }
    }
}

/// Render `points` (ascending by date) as an SVG line chart.
pub fn render_svg(symbol: &str, points: &[SeriesPoint], options: &ChartOptions) -> String {
    let width = f64::from(options.width.max(200));
    let height = f64::from(options.height.max(120));
    let title = format!("{} PRICE CHART", escape_markup(&symbol.to_ascii_uppercase()));

    let start = points.len().saturating_sub(options.max_points);
    let window = &points[start..];

    let mut svg = format!(
        r#"<svg xmlns="http://www.w3.org/2000/svg" width="{w}" height="{h}" viewBox="0 0 {w} {h}" role="img" aria-label="{title}">"#,
        w = width,
        h = height,
    );
    svg.push_str(&format!(
        r#"<rect width="100%" height="100%" fill="{DARK_BG}"/>"#
    ));
    svg.push_str(&format!(
        r#"<text x="{x}" y="28" fill="{NEON_BLUE}" font-family="monospace" font-size="18" font-weight="bold" text-anchor="middle">{title}</text>"#,
        x = width / 2.0,
    ));

    if window.is_empty() {
        svg.push_str(&format!(
            r#"<text x="{x}" y="{y}" fill="{NEON_PURPLE}" font-family="monospace" font-size="16" text-anchor="middle">NO DATA</text>"#,
            x = width / 2.0,
            y = height / 2.0,
        ));
        svg.push_str("</svg>");
        return svg;
    }

    let plot = PlotArea {
        left: MARGIN_LEFT,
        top: MARGIN_TOP,
        width: width - MARGIN_LEFT - MARGIN_RIGHT,
        height: height - MARGIN_TOP - MARGIN_BOTTOM,
    };
    let (low, high) = price_range(window);

    for line in 0..=GRID_LINES {
        let fraction = line as f64 / GRID_LINES as f64;
        let y = plot.top + plot.height * fraction;
        let price = high - (high - low) * fraction;
        svg.push_str(&format!(
            r#"<line x1="{x1:.1}" y1="{y:.1}" x2="{x2:.1}" y2="{y:.1}" stroke="{NEON_BLUE}" stroke-opacity="0.3" stroke-dasharray="4 4"/>"#,
            x1 = plot.left,
            x2 = plot.left + plot.width,
        ));
        svg.push_str(&format!(
            r#"<text x="{x:.1}" y="{ty:.1}" fill="{NEON_PURPLE}" font-family="monospace" font-size="11" text-anchor="end">{price:.2}</text>"#,
            x = plot.left - 8.0,
            ty = y + 4.0,
        ));
    }

    let coordinates = window
        .iter()
        .enumerate()
        .map(|(index, point)| plot.project(index, window.len(), point.close, low, high))
        .collect::<Vec<_>>();

    let path = coordinates
        .iter()
        .map(|(x, y)| format!("{x:.1},{y:.1}"))
        .collect::<Vec<_>>()
        .join(" ");
    svg.push_str(&format!(
        r#"<polyline points="{path}" fill="none" stroke="{NEON_BLUE}" stroke-width="2"/>"#
    ));
    for (x, y) in &coordinates {
        svg.push_str(&format!(
            r#"<circle cx="{x:.1}" cy="{y:.1}" r="3" fill="{NEON_PINK}"/>"#
        ));
    }

    let label_y = plot.top + plot.height + 20.0;
    for index in date_label_indices(window.len()) {
        let (x, _) = coordinates[index];
        svg.push_str(&format!(
            r#"<text x="{x:.1}" y="{label_y:.1}" fill="{NEON_PURPLE}" font-family="monospace" font-size="11" text-anchor="middle">{date}</text>"#,
            date = window[index].date,
        ));
    }

    svg.push_str(&format!(
        r#"<text x="{x:.1}" y="{y:.1}" fill="{NEON_PURPLE}" font-family="monospace" font-size="12" text-anchor="middle">DATE</text>"#,
        x = plot.left + plot.width / 2.0,
        y = height - 12.0,
    ));
    svg.push_str(&format!(
        r#"<text x="16" y="{y:.1}" fill="{NEON_PURPLE}" font-family="monospace" font-size="12" text-anchor="middle" transform="rotate(-90 16 {y:.1})">PRICE (USD)</text>"#,
        y = plot.top + plot.height / 2.0,
    ));
    svg.push_str("</svg>");
    svg
}

/// Escape text for inclusion in HTML or SVG markup.
pub fn escape_markup(text: &str) -> String {
    let mut escaped = String::with_capacity(text.len());
    for ch in text.chars() {
        match ch {
            '&' => escaped.push_str("&amp;"),
            '<' => escaped.push_str("&lt;"),
            '>' => escaped.push_str("&gt;"),
            '"' => escaped.push_str("&quot;"),
            '\'' => escaped.push_str("&#39;"),
            other => escaped.push(other),
        }
    }
    escaped
}

struct PlotArea {
    left: f64,
    top: f64,
    width: f64,
    height: f64,
}

impl PlotArea {
    fn project(&self, index: usize, count: usize, price: f64, low: f64, high: f64) -> (f64, f64) {
        let x = if count > 1 {
            self.left + self.width * index as f64 / (count - 1) as f64
        } else {
            self.left + self.width / 2.0
        };
        let y = self.top + self.height * (high - price) / (high - low);
        (x, y)
    }
}

/// Closing-price range, widened when flat so the line sits mid-plot.
fn price_range(points: &[SeriesPoint]) -> (f64, f64) {
    let (low, high) = points.iter().fold((f64::INFINITY, f64::NEG_INFINITY), |(lo, hi), p| {
        (lo.min(p.close), hi.max(p.close))
    });
    if high > low {
        (low, high)
    } else {
        let pad = (high.abs() * 0.01).max(0.01);
        (low - pad, high + pad)
    }
}

/// First, middle and last index, deduplicated.
fn date_label_indices(count: usize) -> Vec<usize> {
    let mut indices = vec![0, count / 2, count.saturating_sub(1)];
    indices.dedup();
    indices
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::TradingDate;

    fn points(count: usize) -> Vec<SeriesPoint> {
        (0..count)
            .map(|offset| {
                let date = TradingDate::parse(&format!("2024-{:02}-{:02}", 1 + offset / 28, 1 + offset % 28))
                    .expect("valid date");
                let close = 100.0 + offset as f64;
                SeriesPoint::new(date, close, close, close, close, 1).expect("valid point")
            })
            .collect()
    }

    #[test]
    fn empty_series_renders_placeholder() {
        let svg = render_svg("AAPL", &[], &ChartOptions::default());
        assert!(svg.starts_with("<svg"));
        assert!(svg.ends_with("</svg>"));
        assert!(svg.contains("NO DATA"));
        assert!(!svg.contains("<polyline"));
    }

    #[test]
    fn draws_only_the_newest_points() {
        let svg = render_svg("aapl", &points(40), &ChartOptions::default());
        assert!(svg.contains("AAPL PRICE CHART"));
        assert_eq!(svg.matches("<circle").count(), 30);
        assert!(svg.contains("139.00"));
        assert!(!svg.contains(">100.00<"));
    }

    #[test]
    fn uses_neon_palette() {
        let svg = render_svg("IBM", &points(3), &ChartOptions::default());
        for color in [NEON_BLUE, NEON_PINK, NEON_PURPLE, DARK_BG] {
            assert!(svg.contains(color), "missing {color}");
        }
    }

    #[test]
    fn flat_series_stays_finite() {
        let flat = points(1);
        let svg = render_svg("IBM", &flat, &ChartOptions::default());
        assert!(!svg.contains("NaN"));
        assert!(!svg.contains("inf"));
    }

    #[test]
    fn escapes_markup_characters() {
        assert_eq!(
            escape_markup(r#"<a href="x">&'"#),
            "&lt;a href=&quot;x&quot;&gt;&amp;&#39;"
        );
    }
}
