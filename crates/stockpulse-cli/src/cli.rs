//! CLI argument definitions for stockpulse.
//!
//! # Commands
//!
//! | Command | Description |
//! |---------|-------------|
//! | `fetch` | Fetch a price series |
//! | `stats` | Summary statistics and recent prices |
//! | `chart` | Render an SVG price chart |
//! | `quote` | Latest quote for a symbol |
//! | `overview` | Company profile for a symbol |
//! | `search` | Find symbols by name or ticker |
//! | `history` | List logged queries |
//!
//! # Examples
//!
//! ```bash
//! stockpulse fetch AAPL --time-frame weekly --pretty
//! stockpulse stats MSFT --recent 5 --format table
//! stockpulse chart TSLA --output tsla.svg
//! stockpulse quote IBM --format table
//! stockpulse search "tesco plc"
//! stockpulse history --by-symbol
//! ```

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand, ValueEnum};

/// Stock time series from Alpha Vantage, with statistics and charts.
#[derive(Debug, Parser)]
#[command(name = "stockpulse", author, version, about)]
pub struct Cli {
    /// Output format for results.
    #[arg(long, global = true, value_enum, default_value_t = OutputFormat::Json)]
    pub format: OutputFormat,

    /// Pretty-print JSON output with indentation.
    #[arg(long, global = true, default_value_t = false)]
    pub pretty: bool,

    /// Treat warnings as failures (exit code 5).
    #[arg(long, global = true, default_value_t = false)]
    pub strict: bool,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    /// Single JSON envelope.
    Json,
    /// Plain text for terminals.
    Table,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Fetch the full price series for a symbol.
    ///
    ///   stockpulse fetch AAPL
    ///   stockpulse fetch IBM --time-frame monthly
    Fetch(SeriesArgs),

    /// Summary statistics and the most recent prices.
    Stats(StatsArgs),

    /// Render the newest closes as an SVG chart.
    Chart(ChartArgs),

    /// Latest price, change and volume for a symbol.
    Quote(SymbolArgs),

    /// Company name, sector and valuation figures.
    Overview(SymbolArgs),

    /// Find ticker symbols matching free text.
    ///
    ///   stockpulse search microsoft
    Search(SearchArgs),

    /// List queries recorded in the local query log.
    History(HistoryArgs),
}

#[derive(Debug, Args)]
pub struct SymbolArgs {
    /// Ticker symbol, 1 to 5 letters.
    pub symbol: String,
}

#[derive(Debug, Args)]
pub struct SearchArgs {
    /// Company name or partial ticker.
    pub keywords: String,
}

#[derive(Debug, Args)]
pub struct SeriesArgs {
    /// Ticker symbol, 1 to 5 letters.
    pub symbol: String,

    /// daily, weekly or monthly. Anything else falls back to daily.
    #[arg(long, short = 't', default_value = "daily")]
    pub time_frame: String,
}

#[derive(Debug, Args)]
pub struct StatsArgs {
    #[command(flatten)]
    pub series: SeriesArgs,

    /// Number of recent points to list.
    #[arg(long, default_value_t = 10)]
    pub recent: usize,
}

#[derive(Debug, Args)]
pub struct ChartArgs {
    #[command(flatten)]
    pub series: SeriesArgs,

    /// Write the SVG to this file instead of embedding it in the output.
    #[arg(long, short = 'o')]
    pub output: Option<PathBuf>,

    /// Number of newest closes to draw.
    #[arg(long, default_value_t = 30)]
    pub points: usize,
}

#[derive(Debug, Args)]
pub struct HistoryArgs {
    /// Maximum rows to return.
    #[arg(long, default_value_t = 20)]
    pub limit: usize,

    /// Group by symbol instead of listing individual queries.
    #[arg(long, default_value_t = false)]
    pub by_symbol: bool,
}
