use ::duckdb::{params, Connection};

struct Migration {
    version: &'static str,
    sql: &'static str,
}

const MIGRATIONS: &[Migration] = &[
    Migration {
        version: "0001_stock_queries",
        sql: r#"
CREATE SEQUENCE IF NOT EXISTS stock_queries_id_seq START 1;

CREATE TABLE IF NOT EXISTS stock_queries (
    id BIGINT PRIMARY KEY DEFAULT nextval('stock_queries_id_seq'),
    symbol VARCHAR(10) NOT NULL,
    time_frame TEXT NOT NULL,
    outcome TEXT NOT NULL,
    queried_at TEXT NOT NULL
);
"#,
    },
    Migration {
        version: "0002_stock_queries_indexes",
        sql: r#"
CREATE INDEX IF NOT EXISTS idx_stock_queries_symbol ON stock_queries(symbol);
"#,
    },
];

/// Apply every migration not yet recorded in `schema_migrations`.
pub fn apply_migrations(connection: &Connection) -> Result<(), ::duckdb::Error> {
    connection.execute_batch(
        r#"
CREATE TABLE IF NOT EXISTS schema_migrations (
    version TEXT PRIMARY KEY,
    applied_at TIMESTAMP NOT NULL DEFAULT CURRENT_TIMESTAMP
);
"#,
    )?;

    for migration in MIGRATIONS {
        let applied: i64 = connection.query_row(
            "SELECT COUNT(*) FROM schema_migrations WHERE version = ?",
            params![migration.version],
            |row| row.get(0),
        )?;

        if applied == 0 {
            connection.execute_batch(migration.sql)?;
            connection.execute(
                "INSERT INTO schema_migrations (version) VALUES (?)",
                params![migration.version],
            )?;
            tracing::debug!(version = migration.version, "applied migration");
        }
    }

    Ok(())
}

/// Versions of all known migrations, in application order.
pub fn known_versions() -> impl Iterator<Item = &'static str> {
    MIGRATIONS.iter().map(|migration| migration.version)
}
