//! Security, fundamentals, and score-snapshot access. One snapshot per
//! (security, calculation date); a rerun on the same date overwrites the
//! existing row in place.

use std::collections::HashMap;

use anyhow::Result;
use chrono::NaiveDate;
use ratings_core::{QualityScoreRecord, QualityScores, RawFundamentals, Security};

use crate::models::{NewSecurity, QualityScoreRow};
use crate::RatingsDb;

impl RatingsDb {
    pub async fn upsert_security(&self, security: &NewSecurity) -> Result<i64> {
        let row: (i64,) = sqlx::query_as(
            "INSERT INTO securities (symbol, name, sector, industry, market_cap)
             VALUES (?, ?, ?, ?, ?)
             ON CONFLICT(symbol) DO UPDATE SET
                 name = excluded.name,
                 sector = excluded.sector,
                 industry = excluded.industry,
                 market_cap = excluded.market_cap
             RETURNING id",
        )
        .bind(&security.symbol)
        .bind(&security.name)
        .bind(&security.sector)
        .bind(&security.industry)
        .bind(security.market_cap)
        .fetch_one(&self.pool)
        .await?;
        Ok(row.0)
    }

    pub async fn list_securities(&self) -> Result<Vec<Security>> {
        let securities = sqlx::query_as::<_, (i64, String, String, Option<String>, Option<String>, Option<f64>)>(
            "SELECT id, symbol, name, sector, industry, market_cap FROM securities ORDER BY symbol",
        )
        .fetch_all(&self.pool)
        .await?
        .into_iter()
        .map(|(id, symbol, name, sector, industry, market_cap)| Security {
            id,
            symbol,
            name,
            sector,
            industry,
            market_cap,
        })
        .collect();
        Ok(securities)
    }

    /// Store one reporting period's raw record as delivered by ingestion.
    pub async fn insert_fundamentals(
        &self,
        security_id: i64,
        period_date: NaiveDate,
        raw: &RawFundamentals,
    ) -> Result<()> {
        let data_json = serde_json::to_string(raw)?;
        sqlx::query(
            "INSERT INTO fundamentals (security_id, period_date, data_json)
             VALUES (?, ?, ?)
             ON CONFLICT(security_id, period_date) DO UPDATE SET data_json = excluded.data_json",
        )
        .bind(security_id)
        .bind(period_date)
        .bind(&data_json)
        .execute(&self.pool)
        .await?;
        Ok(())
    }

    /// Most recent raw record for a security, if ingestion has one.
    pub async fn latest_fundamentals(&self, security_id: i64) -> Result<Option<RawFundamentals>> {
        let row: Option<(String,)> = sqlx::query_as(
            "SELECT data_json FROM fundamentals
             WHERE security_id = ?
             ORDER BY period_date DESC
             LIMIT 1",
        )
        .bind(security_id)
        .fetch_optional(&self.pool)
        .await?;

        match row {
            Some((json,)) => Ok(Some(serde_json::from_str(&json)?)),
            None => Ok(None),
        }
    }

    /// Write one score snapshot, overwriting any existing row for the
    /// same (security, date).
    pub async fn upsert_quality_scores(
        &self,
        security_id: i64,
        score_date: NaiveDate,
        scores: &QualityScores,
    ) -> Result<()> {
        sqlx::query(
            r#"
            INSERT INTO quality_scores (
                security_id, score_date, piotroski, altman_z, magic_formula, canslim,
                profitability, financial_strength, earnings_quality, growth, valuation, overall
            ) VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?)
            ON CONFLICT(security_id, score_date) DO UPDATE SET
                piotroski = excluded.piotroski,
                altman_z = excluded.altman_z,
                magic_formula = excluded.magic_formula,
                canslim = excluded.canslim,
                profitability = excluded.profitability,
                financial_strength = excluded.financial_strength,
                earnings_quality = excluded.earnings_quality,
                growth = excluded.growth,
                valuation = excluded.valuation,
                overall = excluded.overall
            "#,
        )
        .bind(security_id)
        .bind(score_date)
        .bind(scores.piotroski)
        .bind(scores.altman_z)
        .bind(scores.magic_formula)
        .bind(scores.canslim)
        .bind(scores.profitability)
        .bind(scores.financial_strength)
        .bind(scores.earnings_quality)
        .bind(scores.growth)
        .bind(scores.valuation)
        .bind(scores.overall)
        .execute(&self.pool)
        .await?;
        Ok(())
    }

    /// Latest snapshot per security, for the fund aggregation join.
    pub async fn latest_scores(&self) -> Result<HashMap<i64, QualityScores>> {
        let rows: Vec<QualityScoreRow> = sqlx::query_as(
            r#"
            SELECT qs.security_id, qs.score_date, qs.piotroski, qs.altman_z, qs.magic_formula,
                   qs.canslim, qs.profitability, qs.financial_strength, qs.earnings_quality,
                   qs.growth, qs.valuation, qs.overall
            FROM quality_scores qs
            JOIN (
                SELECT security_id, MAX(score_date) AS max_date
                FROM quality_scores
                GROUP BY security_id
            ) latest ON qs.security_id = latest.security_id AND qs.score_date = latest.max_date
            "#,
        )
        .fetch_all(&self.pool)
        .await?;

        Ok(rows
            .into_iter()
            .map(|row| (row.security_id, row.scores()))
            .collect())
    }

    pub async fn latest_score_for(&self, security_id: i64) -> Result<Option<QualityScoreRecord>> {
        let row: Option<QualityScoreRow> = sqlx::query_as(
            "SELECT security_id, score_date, piotroski, altman_z, magic_formula, canslim,
                    profitability, financial_strength, earnings_quality, growth, valuation, overall
             FROM quality_scores
             WHERE security_id = ?
             ORDER BY score_date DESC
             LIMIT 1",
        )
        .bind(security_id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(row.map(|r| QualityScoreRecord {
            security_id: r.security_id,
            score_date: r.score_date,
            scores: r.scores(),
        }))
    }

    /// Full snapshot history for one security, newest first.
    pub async fn score_history(&self, security_id: i64) -> Result<Vec<QualityScoreRecord>> {
        let rows: Vec<QualityScoreRow> = sqlx::query_as(
            "SELECT security_id, score_date, piotroski, altman_z, magic_formula, canslim,
                    profitability, financial_strength, earnings_quality, growth, valuation, overall
             FROM quality_scores
             WHERE security_id = ?
             ORDER BY score_date DESC",
        )
        .bind(security_id)
        .fetch_all(&self.pool)
        .await?;

        Ok(rows
            .into_iter()
            .map(|r| QualityScoreRecord {
                security_id: r.security_id,
                score_date: r.score_date,
                scores: r.scores(),
            })
            .collect())
    }
}
