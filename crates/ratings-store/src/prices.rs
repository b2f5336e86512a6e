//! Price-history access. The series table is append-only and owned by
//! ingestion; this side only reads, newest-first, plus a seed helper for
//! tests and backfills.

use anyhow::Result;
use chrono::NaiveDate;
use ratings_core::PricePoint;

use crate::RatingsDb;

/// Which series namespace a price row belongs to: equity closes are
/// keyed by symbol, fund NAVs by scheme code.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InstrumentKind {
    Security,
    Fund,
}

impl InstrumentKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            InstrumentKind::Security => "security",
            InstrumentKind::Fund => "fund",
        }
    }
}

impl RatingsDb {
    pub async fn insert_price(
        &self,
        kind: InstrumentKind,
        key: &str,
        date: NaiveDate,
        price: f64,
    ) -> Result<()> {
        sqlx::query(
            "INSERT OR REPLACE INTO price_history (instrument_kind, instrument_key, date, price)
             VALUES (?, ?, ?, ?)",
        )
        .bind(kind.as_str())
        .bind(key)
        .bind(date)
        .bind(price)
        .execute(&self.pool)
        .await?;
        Ok(())
    }

    /// Full series for one instrument, ordered newest-first as the
    /// returns engine expects.
    pub async fn price_series(&self, kind: InstrumentKind, key: &str) -> Result<Vec<PricePoint>> {
        let rows: Vec<(NaiveDate, f64)> = sqlx::query_as(
            "SELECT date, price FROM price_history
             WHERE instrument_kind = ? AND instrument_key = ?
             ORDER BY date DESC",
        )
        .bind(kind.as_str())
        .bind(key)
        .fetch_all(&self.pool)
        .await?;

        Ok(rows
            .into_iter()
            .map(|(date, price)| PricePoint { date, price })
            .collect())
    }
}
