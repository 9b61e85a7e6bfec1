//! Server-rendered HTML for the lookup form and results.

use std::fmt::Write;

use stockpulse_core::chart::{escape_markup, DARK_BG, NEON_BLUE, NEON_PINK, NEON_PURPLE};
use stockpulse_core::{render_svg, ChartOptions, StockReport, TimeFrame};

fn stylesheet() -> String {
    format!(
        "body{{background:{DARK_BG};color:#e0e0ff;font-family:'Courier New',monospace;margin:0;padding:2rem}}\
         h1{{color:{NEON_BLUE};text-shadow:0 0 8px {NEON_BLUE}}}\
         h2{{color:{NEON_PURPLE}}}\
         form{{margin-bottom:2rem}}\
         input,select,button{{background:#12121f;color:#e0e0ff;border:1px solid {NEON_PURPLE};padding:.5rem}}\
         button{{border-color:{NEON_PINK};color:{NEON_PINK};cursor:pointer}}\
         table{{border-collapse:collapse;margin:1rem 0}}\
         th,td{{border:1px solid #2a2a40;padding:.4rem .8rem;text-align:right}}\
         th{{color:{NEON_BLUE}}}\
         .error{{color:{NEON_PINK};border:1px solid {NEON_PINK};padding:1rem}}\
         .gain{{color:#39ff14}}.loss{{color:{NEON_PINK}}}\
         .meta{{color:#8888aa;font-size:.85rem}}"
    )
}

fn layout(title: &str, body: &str) -> String {
    format!(
        "<!DOCTYPE html>\n<html lang=\"en\">\n<head>\n<meta charset=\"utf-8\">\n\
         <meta name=\"viewport\" content=\"width=device-width, initial-scale=1\">\n\
         <title>{}</title>\n<style>{}</style>\n</head>\n<body>\n{body}\n</body>\n</html>\n",
        escape_markup(title),
        stylesheet()
    )
}

fn lookup_form(symbol: &str, selected: TimeFrame) -> String {
    let mut options = String::new();
    for time_frame in TimeFrame::ALL {
        let marker = if time_frame == selected { " selected" } else { "" };
        let _ = write!(
            options,
            "<option value=\"{}\"{marker}>{}</option>",
            time_frame.as_str(),
            time_frame.label()
        );
    }

    format!(
        "<form method=\"post\" action=\"/\">\
         <input name=\"symbol\" value=\"{}\" maxlength=\"5\" placeholder=\"Symbol\" required> \
         <select name=\"time_frame\">{options}</select> \
         <button type=\"submit\">LOOK UP</button></form>",
        escape_markup(symbol)
    )
}

/// The lookup form, optionally with a failure message above it.
pub fn index_page(symbol: &str, time_frame: TimeFrame, error: Option<&str>) -> String {
    let mut body = String::from("<h1>STOCKPULSE</h1>\n");
    if let Some(message) = error {
        let _ = writeln!(body, "<div class=\"error\">{}</div>", escape_markup(message));
    }
    body.push_str(&lookup_form(symbol, time_frame));
    layout("Stockpulse", &body)
}

/// Statistics, chart and recent prices for a successful lookup.
pub fn results_page(report: &StockReport) -> String {
    let symbol = report.metadata.symbol.as_str();
    let time_frame = report.metadata.time_frame;
    let stats = &report.stats;
    let trend = if stats.is_gain() { "gain" } else { "loss" };
    let sign = if stats.change >= 0.0 { "+" } else { "" };

    let mut body = format!("<h1>{} &middot; {}</h1>\n", escape_markup(symbol), time_frame.label());
    body.push_str(&lookup_form(symbol, time_frame));

    let _ = writeln!(
        body,
        "<h2>${:.2} <span class=\"{trend}\">{sign}{:.2} ({sign}{:.2}%)</span></h2>",
        stats.current, stats.change, stats.change_pct
    );

    let _ = writeln!(
        body,
        "<table><tr><th>Periods</th><th>Low</th><th>High</th><th>Average</th><th>Avg volume</th></tr>\
         <tr><td>{}</td><td>${:.2}</td><td>${:.2}</td><td>${:.2}</td><td>{:.0}</td></tr></table>",
        stats.periods, stats.minimum, stats.maximum, stats.average, stats.average_volume
    );

    body.push_str(&render_svg(symbol, &report.series, &ChartOptions::default()));

    body.push_str(
        "\n<h2>Recent prices</h2>\n<table><tr><th>Date</th><th>Open</th><th>High</th>\
         <th>Low</th><th>Close</th><th>Volume</th></tr>",
    );
    for point in &report.recent {
        let _ = write!(
            body,
            "<tr><td>{}</td><td>{:.2}</td><td>{:.2}</td><td>{:.2}</td><td>{:.2}</td><td>{}</td></tr>",
            point.date, point.open, point.high, point.low, point.close, point.volume
        );
    }
    body.push_str("</table>\n");

    if let Some(refreshed) = &report.metadata.last_refreshed {
        let zone = report.metadata.time_zone.as_deref().unwrap_or("");
        let _ = write!(
            body,
            "<p class=\"meta\">Last refreshed {} {}</p>",
            escape_markup(refreshed),
            escape_markup(zone)
        );
    }

    layout(&format!("{symbol} | Stockpulse"), &body)
}
