//! # Stockpulse Warehouse
//!
//! DuckDB-backed log of every stock query served by stockpulse.
//!
//! Each query records the symbol, the requested time frame, the outcome code
//! and the UTC time it was made. The series itself is never stored.
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use stockpulse_warehouse::{QueryLogEntry, Warehouse, WarehouseConfig};
//!
//! fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let warehouse = Warehouse::open(WarehouseConfig::at("/var/lib/stockpulse"))?;
//!     warehouse.log_query(&QueryLogEntry::new("AAPL", "daily", "ok", "2024-01-02T15:30:00Z"))?;
//!
//!     for record in warehouse.recent_queries(10)? {
//!         println!("{} {} {}", record.queried_at, record.symbol, record.outcome);
//!     }
//!     Ok(())
//! }
//! ```
//!
//! ## Tables
//!
//! | Table | Description |
//! |-------|-------------|
//! | `stock_queries` | One row per served query |
//! | `schema_migrations` | Applied migration versions |

pub mod duckdb;
pub mod migrations;

use std::fs;
use std::path::{Path, PathBuf};

use ::duckdb::ToSql;
use serde::Serialize;
use thiserror::Error;

pub use self::duckdb::{DuckDbConnectionManager, PooledConnection};

pub const QUERY_LOG_FILE: &str = "query_log.duckdb";

/// Longest symbol the log keeps; longer input is truncated.
pub const MAX_LOGGED_SYMBOL_LEN: usize = 10;

/// Largest page `recent_queries` and `query_counts` will return.
pub const MAX_QUERY_LIMIT: usize = 1_000;

#[derive(Debug, Error)]
pub enum WarehouseError {
    #[error(transparent)]
    DuckDb(#[from] ::duckdb::Error),

    #[error(transparent)]
    Io(#[from] std::io::Error),

    #[error("query rejected: {0}")]
    QueryRejected(String),
}

#[derive(Debug, Clone)]
pub struct WarehouseConfig {
    /// Root directory for stockpulse data.
    pub home: PathBuf,
    pub db_path: PathBuf,
    pub max_pool_size: usize,
}

impl WarehouseConfig {
    /// Configuration rooted at `home`, with the log file directly inside it.
    pub fn at(home: impl Into<PathBuf>) -> Self {
        let home = home.into();
        Self {
            db_path: home.join(QUERY_LOG_FILE),
            home,
            max_pool_size: 4,
        }
    }
}

/// A query about to be logged.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct QueryLogEntry {
    pub symbol: String,
    pub time_frame: String,
    /// `ok` or the failure code of the fetch.
    pub outcome: String,
    /// RFC3339 UTC timestamp.
    pub queried_at: String,
}

impl QueryLogEntry {
    pub fn new(
        symbol: impl Into<String>,
        time_frame: impl Into<String>,
        outcome: impl Into<String>,
        queried_at: impl Into<String>,
    ) -> Self {
        Self {
            symbol: symbol.into(),
            time_frame: time_frame.into(),
            outcome: outcome.into(),
            queried_at: queried_at.into(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct QueryLogRecord {
    pub id: i64,
    pub symbol: String,
    pub time_frame: String,
    pub outcome: String,
    pub queried_at: String,
}

/// How often a symbol has been queried.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SymbolQueryCount {
    pub symbol: String,
    pub queries: i64,
    pub last_queried_at: String,
}

#[derive(Clone)]
pub struct Warehouse {
    manager: DuckDbConnectionManager,
}

impl Warehouse {
    /// Open (creating if needed) the log database and apply migrations.
    pub fn open(config: WarehouseConfig) -> Result<Self, WarehouseError> {
        if let Some(parent) = config.db_path.parent() {
            fs::create_dir_all(parent)?;
        }

        let manager = DuckDbConnectionManager::open(config.db_path.clone(), config.max_pool_size)?;
        let warehouse = Self { manager };
        warehouse.initialize()?;
        tracing::debug!(path = %warehouse.db_path().display(), "query log opened");
        Ok(warehouse)
    }

    pub fn initialize(&self) -> Result<(), WarehouseError> {
        let connection = self.manager.acquire()?;
        migrations::apply_migrations(&connection)?;
        Ok(())
    }

    pub fn db_path(&self) -> &Path {
        self.manager.db_path()
    }

    /// Append one query and return its id.
    pub fn log_query(&self, entry: &QueryLogEntry) -> Result<i64, WarehouseError> {
        let symbol = truncate_symbol(&entry.symbol);
        let connection = self.manager.acquire()?;
        let params: [&dyn ToSql; 4] = [&symbol, &entry.time_frame, &entry.outcome, &entry.queried_at];
        let id = connection.query_row(
            "INSERT INTO stock_queries (symbol, time_frame, outcome, queried_at) \
             VALUES (?, ?, ?, ?) RETURNING id",
            params.as_slice(),
            |row| row.get(0),
        )?;
        Ok(id)
    }

    /// Most recent queries first.
    pub fn recent_queries(&self, limit: usize) -> Result<Vec<QueryLogRecord>, WarehouseError> {
        let limit = validate_limit(limit)?;
        let connection = self.manager.acquire()?;
        let sql = format!(
            "SELECT id, symbol, time_frame, outcome, queried_at FROM stock_queries \
             ORDER BY id DESC LIMIT {limit}"
        );
        let mut statement = connection.prepare(sql.as_str())?;
        let rows = statement.query_map([], |row| {
            Ok(QueryLogRecord {
                id: row.get(0)?,
                symbol: row.get(1)?,
                time_frame: row.get(2)?,
                outcome: row.get(3)?,
                queried_at: row.get(4)?,
            })
        })?;
        Ok(rows.collect::<Result<Vec<_>, _>>()?)
    }

    /// Per-symbol totals, most queried first.
    pub fn query_counts(&self, limit: usize) -> Result<Vec<SymbolQueryCount>, WarehouseError> {
        let limit = validate_limit(limit)?;
        let connection = self.manager.acquire()?;
        let sql = format!(
            "SELECT symbol, COUNT(*) AS queries, MAX(queried_at) AS last_queried_at \
             FROM stock_queries GROUP BY symbol \
             ORDER BY queries DESC, symbol ASC LIMIT {limit}"
        );
        let mut statement = connection.prepare(sql.as_str())?;
        let rows = statement.query_map([], |row| {
            Ok(SymbolQueryCount {
                symbol: row.get(0)?,
                queries: row.get(1)?,
                last_queried_at: row.get(2)?,
            })
        })?;
        Ok(rows.collect::<Result<Vec<_>, _>>()?)
    }
}

fn validate_limit(limit: usize) -> Result<usize, WarehouseError> {
    if limit == 0 {
        return Err(WarehouseError::QueryRejected(String::from(
            "limit must be greater than zero",
        )));
    }
    if limit > MAX_QUERY_LIMIT {
        return Err(WarehouseError::QueryRejected(format!(
            "limit must be at most {MAX_QUERY_LIMIT}"
        )));
    }
    Ok(limit)
}

fn truncate_symbol(symbol: &str) -> String {
    symbol.trim().chars().take(MAX_LOGGED_SYMBOL_LEN).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn truncates_long_symbols_by_characters() {
        assert_eq!(truncate_symbol("  aapl "), "aapl");
        assert_eq!(truncate_symbol("ABCDEFGHIJKLMNOP"), "ABCDEFGHIJ");
        assert_eq!(truncate_symbol("ÄÄÄÄÄÄÄÄÄÄÄÄ").chars().count(), 10);
    }

    #[test]
    fn limit_must_be_positive_and_bounded() {
        assert!(matches!(validate_limit(0), Err(WarehouseError::QueryRejected(_))));
        assert!(matches!(validate_limit(1_001), Err(WarehouseError::QueryRejected(_))));
        assert_eq!(validate_limit(25).expect("valid"), 25);
    }

    #[test]
    fn config_places_log_inside_home() {
        let config = WarehouseConfig::at("/data/stockpulse");
        assert_eq!(config.db_path, PathBuf::from("/data/stockpulse/query_log.duckdb"));
    }
}
