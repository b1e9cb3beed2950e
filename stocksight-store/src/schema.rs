//! Schema migrations.
//!
//! Each migration runs once and is recorded by name in the `migrations` table, so running
//! the full list again is a no-op.

use rusqlite::Connection;

use crate::StoreError;

const MIGRATIONS: &[(&str, &str)] = &[
    ("001_price_bar", CREATE_PRICE_BAR_TABLE),
    ("002_company_snapshot", CREATE_COMPANY_SNAPSHOT_TABLE),
    ("003_watchlist", CREATE_WATCHLIST_TABLE),
    ("004_company_snapshot_financials", ADD_SNAPSHOT_FINANCIALS),
];

/// Create the bookkeeping table and apply any pending migration.
pub(crate) fn run_migrations(conn: &mut Connection) -> Result<usize, StoreError> {
    let tx = conn.transaction()?;
    tx.execute(
        "CREATE TABLE IF NOT EXISTS migrations (
            id INTEGER PRIMARY KEY,
            name TEXT NOT NULL UNIQUE,
            applied_at TEXT NOT NULL DEFAULT (strftime('%Y-%m-%dT%H:%M:%fZ', 'now'))
        )",
        [],
    )?;

    let mut applied = 0;
    for (name, sql) in MIGRATIONS {
        if run_migration(&tx, name, sql)? {
            applied += 1;
        }
    }
    tx.commit()?;

    tracing::info!(applied, "database migrations completed");
    Ok(applied)
}

fn run_migration(conn: &Connection, name: &str, sql: &str) -> Result<bool, StoreError> {
    let exists: bool = conn.query_row(
        "SELECT EXISTS(SELECT 1 FROM migrations WHERE name = ?1)",
        [name],
        |row| row.get(0),
    )?;
    if exists {
        return Ok(false);
    }

    tracing::info!(migration = name, "running migration");
    conn.execute_batch(sql)?;
    conn.execute("INSERT INTO migrations (name) VALUES (?1)", [name])?;
    Ok(true)
}

const CREATE_PRICE_BAR_TABLE: &str = r"
CREATE TABLE IF NOT EXISTS price_bar (
    id INTEGER PRIMARY KEY AUTOINCREMENT,
    symbol TEXT NOT NULL,
    date TEXT NOT NULL,
    open REAL NOT NULL,
    high REAL NOT NULL,
    low REAL NOT NULL,
    close REAL NOT NULL,
    volume INTEGER NOT NULL DEFAULT 0,
    created_at TEXT NOT NULL,
    UNIQUE (symbol, date)
);
CREATE INDEX IF NOT EXISTS idx_price_bar_created_at ON price_bar(created_at);
";

const CREATE_COMPANY_SNAPSHOT_TABLE: &str = r"
CREATE TABLE IF NOT EXISTS company_snapshot (
    id INTEGER PRIMARY KEY AUTOINCREMENT,
    symbol TEXT NOT NULL UNIQUE,
    name TEXT,
    sector TEXT,
    industry TEXT,
    market_cap REAL,
    pe_ratio REAL,
    dividend_yield REAL,
    week52_high REAL,
    week52_low REAL,
    summary TEXT,
    currency TEXT,
    market_price REAL,
    previous_close REAL,
    last_updated TEXT NOT NULL
);
";

const ADD_SNAPSHOT_FINANCIALS: &str = r"
ALTER TABLE company_snapshot ADD COLUMN employees INTEGER;
ALTER TABLE company_snapshot ADD COLUMN website TEXT;
ALTER TABLE company_snapshot ADD COLUMN total_revenue REAL;
ALTER TABLE company_snapshot ADD COLUMN profit_margin REAL;
";

// At most one active row per symbol; inactive rows accumulate as history.
const CREATE_WATCHLIST_TABLE: &str = r"
CREATE TABLE IF NOT EXISTS watchlist (
    id INTEGER PRIMARY KEY AUTOINCREMENT,
    symbol TEXT NOT NULL,
    added_at TEXT NOT NULL,
    is_active INTEGER NOT NULL DEFAULT 1 CHECK (is_active IN (0, 1))
);
CREATE UNIQUE INDEX IF NOT EXISTS idx_watchlist_one_active
    ON watchlist(symbol) WHERE is_active = 1;
CREATE INDEX IF NOT EXISTS idx_watchlist_symbol ON watchlist(symbol);
";
