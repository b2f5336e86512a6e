//! SQLite persistence for the ratings core: score snapshots, fund
//! aggregates, the materialized ratings cache, and read access to the
//! ingestion-owned tables (securities, fundamentals, holdings, prices).

pub mod models;
pub mod query;

mod funds;
mod prices;
mod scores;

pub use models::*;
pub use prices::InstrumentKind;
pub use query::{FundRatingsFilter, ScoreSortColumn, SecurityRatingsFilter, SortColumn};

use anyhow::Result;
use sqlx::sqlite::{SqliteConnectOptions, SqlitePool, SqlitePoolOptions};
use std::str::FromStr;
use tracing::info;

/// Tables owned or read by this core. The ingestion pipeline populates
/// securities/fundamentals/funds/fund_holdings/price_history; the
/// scoring and aggregation jobs own the rest.
const SCHEMA: &str = r#"
CREATE TABLE IF NOT EXISTS securities (
    id INTEGER PRIMARY KEY,
    symbol TEXT UNIQUE NOT NULL,
    name TEXT NOT NULL,
    sector TEXT,
    industry TEXT,
    market_cap REAL
);

CREATE TABLE IF NOT EXISTS fundamentals (
    id INTEGER PRIMARY KEY,
    security_id INTEGER NOT NULL REFERENCES securities(id),
    period_date DATE NOT NULL,
    data_json TEXT NOT NULL,
    created_at DATETIME DEFAULT CURRENT_TIMESTAMP,
    UNIQUE(security_id, period_date)
);

CREATE TABLE IF NOT EXISTS price_history (
    id INTEGER PRIMARY KEY,
    instrument_kind TEXT NOT NULL,
    instrument_key TEXT NOT NULL,
    date DATE NOT NULL,
    price REAL NOT NULL,
    UNIQUE(instrument_kind, instrument_key, date)
);

CREATE TABLE IF NOT EXISTS quality_scores (
    id INTEGER PRIMARY KEY,
    security_id INTEGER NOT NULL REFERENCES securities(id),
    score_date DATE NOT NULL,
    piotroski INTEGER,
    altman_z REAL,
    magic_formula REAL,
    canslim REAL,
    profitability REAL,
    financial_strength REAL,
    earnings_quality REAL,
    growth REAL,
    valuation REAL,
    overall REAL,
    created_at DATETIME DEFAULT CURRENT_TIMESTAMP,
    UNIQUE(security_id, score_date)
);

CREATE TABLE IF NOT EXISTS funds (
    id INTEGER PRIMARY KEY,
    name TEXT NOT NULL,
    fund_house TEXT,
    scheme_code TEXT
);

CREATE TABLE IF NOT EXISTS fund_holdings (
    id INTEGER PRIMARY KEY,
    fund_id INTEGER NOT NULL REFERENCES funds(id),
    instrument_name TEXT NOT NULL,
    security_id INTEGER REFERENCES securities(id),
    weight_pct REAL NOT NULL
);

CREATE TABLE IF NOT EXISTS fund_quality_scores (
    fund_id INTEGER PRIMARY KEY REFERENCES funds(id),
    piotroski_avg REAL,
    altman_z_avg REAL,
    magic_formula REAL,
    canslim REAL,
    profitability REAL,
    financial_strength REAL,
    earnings_quality REAL,
    growth REAL,
    valuation REAL,
    overall REAL,
    coverage_pct REAL NOT NULL,
    holdings_count INTEGER NOT NULL,
    scored_at DATETIME NOT NULL
);

CREATE TABLE IF NOT EXISTS fund_ratings_cache (
    fund_id INTEGER PRIMARY KEY,
    fund_name TEXT NOT NULL,
    fund_house TEXT,
    overall REAL,
    profitability REAL,
    financial_strength REAL,
    earnings_quality REAL,
    growth REAL,
    valuation REAL,
    piotroski_avg REAL,
    altman_z_avg REAL,
    magic_formula REAL,
    canslim REAL,
    coverage_pct REAL NOT NULL,
    holdings_count INTEGER NOT NULL,
    cagr_1y REAL,
    cagr_3y REAL,
    cagr_5y REAL,
    cagr_10y REAL,
    refreshed_at DATETIME NOT NULL
);

CREATE INDEX IF NOT EXISTS idx_quality_scores_security_date
    ON quality_scores(security_id, score_date);
CREATE INDEX IF NOT EXISTS idx_price_history_lookup
    ON price_history(instrument_kind, instrument_key, date);
CREATE INDEX IF NOT EXISTS idx_fund_holdings_fund
    ON fund_holdings(fund_id);
CREATE INDEX IF NOT EXISTS idx_fundamentals_security
    ON fundamentals(security_id, period_date)
"#;

#[derive(Clone)]
pub struct RatingsDb {
    pool: SqlitePool,
}

impl RatingsDb {
    /// Open (creating if missing) and bootstrap the database.
    pub async fn new(database_url: &str) -> Result<Self> {
        let options = SqliteConnectOptions::from_str(database_url)?.create_if_missing(true);

        let pool = SqlitePoolOptions::new()
            .max_connections(5)
            .connect_with(options)
            .await?;

        // WAL lets the read path see last-committed rows while a batch
        // refresh is writing.
        sqlx::query("PRAGMA journal_mode=WAL").execute(&pool).await?;

        let db = Self { pool };
        db.init_schema().await?;
        info!("ratings database initialized at {}", database_url);

        Ok(db)
    }

    /// Execute schema statements one by one (sqlx does not support
    /// multi-statement queries).
    async fn init_schema(&self) -> Result<()> {
        for statement in SCHEMA.split(';') {
            let stmt = statement.trim();
            if !stmt.is_empty() {
                sqlx::query(stmt).execute(&self.pool).await?;
            }
        }
        Ok(())
    }

    pub fn pool(&self) -> &SqlitePool {
        &self.pool
    }
}
