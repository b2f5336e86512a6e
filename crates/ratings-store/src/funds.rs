//! Fund, holdings, aggregate, and ratings-cache access. Aggregate and
//! cache tables are rebuilt wholesale by their batch jobs; readers see
//! whatever rows were last committed.

use anyhow::Result;
use chrono::Utc;
use ratings_core::{Fund, FundHolding, FundQualityScore};

use crate::models::{FundRatingRow, NewFund};
use crate::RatingsDb;

impl RatingsDb {
    pub async fn insert_fund(&self, fund: &NewFund) -> Result<i64> {
        let row: (i64,) = sqlx::query_as(
            "INSERT INTO funds (name, fund_house, scheme_code) VALUES (?, ?, ?) RETURNING id",
        )
        .bind(&fund.name)
        .bind(&fund.fund_house)
        .bind(&fund.scheme_code)
        .fetch_one(&self.pool)
        .await?;
        Ok(row.0)
    }

    pub async fn list_funds(&self) -> Result<Vec<Fund>> {
        let funds = sqlx::query_as::<_, (i64, String, Option<String>, Option<String>)>(
            "SELECT id, name, fund_house, scheme_code FROM funds ORDER BY name",
        )
        .fetch_all(&self.pool)
        .await?
        .into_iter()
        .map(|(id, name, fund_house, scheme_code)| Fund {
            id,
            name,
            fund_house,
            scheme_code,
        })
        .collect();
        Ok(funds)
    }

    pub async fn get_fund(&self, fund_id: i64) -> Result<Option<Fund>> {
        let row: Option<(i64, String, Option<String>, Option<String>)> = sqlx::query_as(
            "SELECT id, name, fund_house, scheme_code FROM funds WHERE id = ?",
        )
        .bind(fund_id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(row.map(|(id, name, fund_house, scheme_code)| Fund {
            id,
            name,
            fund_house,
            scheme_code,
        }))
    }

    pub async fn insert_holding(&self, holding: &FundHolding) -> Result<()> {
        sqlx::query(
            "INSERT INTO fund_holdings (fund_id, instrument_name, security_id, weight_pct)
             VALUES (?, ?, ?, ?)",
        )
        .bind(holding.fund_id)
        .bind(&holding.instrument_name)
        .bind(holding.security_id)
        .bind(holding.weight_pct)
        .execute(&self.pool)
        .await?;
        Ok(())
    }

    pub async fn holdings_for_fund(&self, fund_id: i64) -> Result<Vec<FundHolding>> {
        let holdings = sqlx::query_as::<_, (i64, String, Option<i64>, f64)>(
            "SELECT fund_id, instrument_name, security_id, weight_pct
             FROM fund_holdings WHERE fund_id = ?",
        )
        .bind(fund_id)
        .fetch_all(&self.pool)
        .await?
        .into_iter()
        .map(|(fund_id, instrument_name, security_id, weight_pct)| FundHolding {
            fund_id,
            instrument_name,
            security_id,
            weight_pct,
        })
        .collect();
        Ok(holdings)
    }

    pub async fn upsert_fund_quality(&self, score: &FundQualityScore) -> Result<()> {
        sqlx::query(
            r#"
            INSERT INTO fund_quality_scores (
                fund_id, piotroski_avg, altman_z_avg, magic_formula, canslim,
                profitability, financial_strength, earnings_quality, growth, valuation,
                overall, coverage_pct, holdings_count, scored_at
            ) VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?)
            ON CONFLICT(fund_id) DO UPDATE SET
                piotroski_avg = excluded.piotroski_avg,
                altman_z_avg = excluded.altman_z_avg,
                magic_formula = excluded.magic_formula,
                canslim = excluded.canslim,
                profitability = excluded.profitability,
                financial_strength = excluded.financial_strength,
                earnings_quality = excluded.earnings_quality,
                growth = excluded.growth,
                valuation = excluded.valuation,
                overall = excluded.overall,
                coverage_pct = excluded.coverage_pct,
                holdings_count = excluded.holdings_count,
                scored_at = excluded.scored_at
            "#,
        )
        .bind(score.fund_id)
        .bind(score.piotroski_avg)
        .bind(score.altman_z_avg)
        .bind(score.magic_formula)
        .bind(score.canslim)
        .bind(score.profitability)
        .bind(score.financial_strength)
        .bind(score.earnings_quality)
        .bind(score.growth)
        .bind(score.valuation)
        .bind(score.overall)
        .bind(score.coverage_pct)
        .bind(score.holdings_count)
        .bind(Utc::now())
        .execute(&self.pool)
        .await?;
        Ok(())
    }

    pub async fn fund_quality(&self, fund_id: i64) -> Result<Option<FundQualityScore>> {
        let row: Option<FundQualityScoreRow> = sqlx::query_as(
            "SELECT fund_id, piotroski_avg, altman_z_avg, magic_formula, canslim,
                    profitability, financial_strength, earnings_quality, growth, valuation,
                    overall, coverage_pct, holdings_count
             FROM fund_quality_scores WHERE fund_id = ?",
        )
        .bind(fund_id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(row.map(FundQualityScoreRow::into_score))
    }

    /// Replace the ratings cache wholesale inside one transaction, so
    /// concurrent readers see either the old rows or the new ones.
    pub async fn rebuild_ratings_cache(&self, rows: &[FundRatingRow]) -> Result<usize> {
        let mut tx = self.pool.begin().await?;

        sqlx::query("DELETE FROM fund_ratings_cache")
            .execute(&mut *tx)
            .await?;

        for row in rows {
            sqlx::query(
                r#"
                INSERT INTO fund_ratings_cache (
                    fund_id, fund_name, fund_house, overall, profitability,
                    financial_strength, earnings_quality, growth, valuation,
                    piotroski_avg, altman_z_avg, magic_formula, canslim,
                    coverage_pct, holdings_count, cagr_1y, cagr_3y, cagr_5y, cagr_10y,
                    refreshed_at
                ) VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?)
                "#,
            )
            .bind(row.fund_id)
            .bind(&row.fund_name)
            .bind(&row.fund_house)
            .bind(row.overall)
            .bind(row.profitability)
            .bind(row.financial_strength)
            .bind(row.earnings_quality)
            .bind(row.growth)
            .bind(row.valuation)
            .bind(row.piotroski_avg)
            .bind(row.altman_z_avg)
            .bind(row.magic_formula)
            .bind(row.canslim)
            .bind(row.coverage_pct)
            .bind(row.holdings_count)
            .bind(row.cagr_1y)
            .bind(row.cagr_3y)
            .bind(row.cagr_5y)
            .bind(row.cagr_10y)
            .bind(row.refreshed_at)
            .execute(&mut *tx)
            .await?;
        }

        tx.commit().await?;
        Ok(rows.len())
    }
}

#[derive(sqlx::FromRow)]
struct FundQualityScoreRow {
    fund_id: i64,
    piotroski_avg: Option<f64>,
    altman_z_avg: Option<f64>,
    magic_formula: Option<f64>,
    canslim: Option<f64>,
    profitability: Option<f64>,
    financial_strength: Option<f64>,
    earnings_quality: Option<f64>,
    growth: Option<f64>,
    valuation: Option<f64>,
    overall: Option<f64>,
    coverage_pct: f64,
    holdings_count: i64,
}

impl FundQualityScoreRow {
    fn into_score(self) -> FundQualityScore {
        FundQualityScore {
            fund_id: self.fund_id,
            piotroski_avg: self.piotroski_avg,
            altman_z_avg: self.altman_z_avg,
            magic_formula: self.magic_formula,
            canslim: self.canslim,
            profitability: self.profitability,
            financial_strength: self.financial_strength,
            earnings_quality: self.earnings_quality,
            growth: self.growth,
            valuation: self.valuation,
            overall: self.overall,
            coverage_pct: self.coverage_pct,
            holdings_count: self.holdings_count,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn fund_aggregate_upsert_round_trips() {
        let db = RatingsDb::new("sqlite::memory:").await.unwrap();
        let fund_id = db
            .insert_fund(&NewFund {
                name: "Bluechip Equity Fund".to_string(),
                fund_house: Some("Acme AMC".to_string()),
                scheme_code: None,
            })
            .await
            .unwrap();

        let score = FundQualityScore {
            fund_id,
            overall: Some(72.4),
            coverage_pct: 91.0,
            holdings_count: 43,
            ..Default::default()
        };
        db.upsert_fund_quality(&score).await.unwrap();

        // Second pass overwrites, leaving a single row.
        let updated = FundQualityScore {
            overall: Some(70.1),
            ..score.clone()
        };
        db.upsert_fund_quality(&updated).await.unwrap();

        let loaded = db.fund_quality(fund_id).await.unwrap().unwrap();
        assert_eq!(loaded.overall, Some(70.1));

        let count: (i64,) = sqlx::query_as("SELECT COUNT(*) FROM fund_quality_scores")
            .fetch_one(db.pool())
            .await
            .unwrap();
        assert_eq!(count.0, 1);
    }

    #[tokio::test]
    async fn cache_rebuild_replaces_rows() {
        let db = RatingsDb::new("sqlite::memory:").await.unwrap();

        let row = FundRatingRow {
            fund_id: 1,
            fund_name: "Old Fund".to_string(),
            fund_house: None,
            overall: Some(50.0),
            profitability: None,
            financial_strength: None,
            earnings_quality: None,
            growth: None,
            valuation: None,
            piotroski_avg: None,
            altman_z_avg: None,
            magic_formula: None,
            canslim: None,
            coverage_pct: 80.0,
            holdings_count: 10,
            cagr_1y: Some(12.0),
            cagr_3y: None,
            cagr_5y: None,
            cagr_10y: None,
            refreshed_at: Utc::now(),
        };
        assert_eq!(db.rebuild_ratings_cache(&[row.clone()]).await.unwrap(), 1);

        let replacement = FundRatingRow {
            fund_id: 2,
            fund_name: "New Fund".to_string(),
            ..row
        };
        assert_eq!(
            db.rebuild_ratings_cache(&[replacement]).await.unwrap(),
            1
        );

        let names: Vec<(String,)> =
            sqlx::query_as("SELECT fund_name FROM fund_ratings_cache")
                .fetch_all(db.pool())
                .await
                .unwrap();
        assert_eq!(names, vec![("New Fund".to_string(),)]);
    }
}
