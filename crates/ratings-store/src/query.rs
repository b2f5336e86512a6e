//! Read path over the materialized ratings cache and the latest score
//! snapshots. Sort columns go through an enum whitelist; filter values
//! are always bound, never spliced into SQL.

use anyhow::Result;
use serde::{Deserialize, Serialize};

use crate::models::{FundRatingRow, SecurityRatingRow};
use crate::RatingsDb;

/// Sortable columns of the fund ratings cache.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SortColumn {
    Overall,
    Profitability,
    FinancialStrength,
    EarningsQuality,
    Growth,
    Valuation,
    PiotroskiAvg,
    AltmanZAvg,
    MagicFormula,
    Canslim,
    CoveragePct,
    CagrOneYear,
    CagrThreeYear,
    CagrFiveYear,
    CagrTenYear,
}

impl SortColumn {
    fn as_sql(&self) -> &'static str {
        match self {
            SortColumn::Overall => "overall",
            SortColumn::Profitability => "profitability",
            SortColumn::FinancialStrength => "financial_strength",
            SortColumn::EarningsQuality => "earnings_quality",
            SortColumn::Growth => "growth",
            SortColumn::Valuation => "valuation",
            SortColumn::PiotroskiAvg => "piotroski_avg",
            SortColumn::AltmanZAvg => "altman_z_avg",
            SortColumn::MagicFormula => "magic_formula",
            SortColumn::Canslim => "canslim",
            SortColumn::CoveragePct => "coverage_pct",
            SortColumn::CagrOneYear => "cagr_1y",
            SortColumn::CagrThreeYear => "cagr_3y",
            SortColumn::CagrFiveYear => "cagr_5y",
            SortColumn::CagrTenYear => "cagr_10y",
        }
    }
}

/// Sortable columns of the per-security score snapshot.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ScoreSortColumn {
    Overall,
    Piotroski,
    AltmanZ,
    MagicFormula,
    Canslim,
    Profitability,
    FinancialStrength,
    EarningsQuality,
    Growth,
    Valuation,
}

impl ScoreSortColumn {
    fn as_sql(&self) -> &'static str {
        match self {
            ScoreSortColumn::Overall => "overall",
            ScoreSortColumn::Piotroski => "piotroski",
            ScoreSortColumn::AltmanZ => "altman_z",
            ScoreSortColumn::MagicFormula => "magic_formula",
            ScoreSortColumn::Canslim => "canslim",
            ScoreSortColumn::Profitability => "profitability",
            ScoreSortColumn::FinancialStrength => "financial_strength",
            ScoreSortColumn::EarningsQuality => "earnings_quality",
            ScoreSortColumn::Growth => "growth",
            ScoreSortColumn::Valuation => "valuation",
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FundRatingsFilter {
    pub fund_house: Option<String>,
    pub min_overall: Option<f64>,
    /// Lets consumers discount funds scored from too little of the NAV.
    pub min_coverage_pct: Option<f64>,
    pub sort: SortColumn,
    pub limit: i64,
}

impl Default for FundRatingsFilter {
    fn default() -> Self {
        Self {
            fund_house: None,
            min_overall: None,
            min_coverage_pct: None,
            sort: SortColumn::Overall,
            limit: 50,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SecurityRatingsFilter {
    pub sector: Option<String>,
    pub min_overall: Option<f64>,
    pub sort: ScoreSortColumn,
    pub limit: i64,
}

impl Default for SecurityRatingsFilter {
    fn default() -> Self {
        Self {
            sector: None,
            min_overall: None,
            sort: ScoreSortColumn::Overall,
            limit: 50,
        }
    }
}

impl RatingsDb {
    /// Latest cached fund ratings, filtered and sorted. Null sort keys
    /// sink to the bottom so sparse funds never outrank scored ones.
    pub async fn query_fund_ratings(
        &self,
        filter: &FundRatingsFilter,
    ) -> Result<Vec<FundRatingRow>> {
        let mut sql = String::from(
            "SELECT fund_id, fund_name, fund_house, overall, profitability, financial_strength,
                    earnings_quality, growth, valuation, piotroski_avg, altman_z_avg,
                    magic_formula, canslim, coverage_pct, holdings_count,
                    cagr_1y, cagr_3y, cagr_5y, cagr_10y, refreshed_at
             FROM fund_ratings_cache
             WHERE 1=1",
        );
        if filter.fund_house.is_some() {
            sql.push_str(" AND fund_house = ?");
        }
        if filter.min_overall.is_some() {
            sql.push_str(" AND overall >= ?");
        }
        if filter.min_coverage_pct.is_some() {
            sql.push_str(" AND coverage_pct >= ?");
        }
        sql.push_str(&format!(
            " ORDER BY {} IS NULL, {} DESC LIMIT ?",
            filter.sort.as_sql(),
            filter.sort.as_sql()
        ));

        let mut query = sqlx::query_as::<_, FundRatingRow>(&sql);
        if let Some(house) = &filter.fund_house {
            query = query.bind(house);
        }
        if let Some(min_overall) = filter.min_overall {
            query = query.bind(min_overall);
        }
        if let Some(min_coverage) = filter.min_coverage_pct {
            query = query.bind(min_coverage);
        }
        query = query.bind(filter.limit);

        Ok(query.fetch_all(&self.pool).await?)
    }

    /// Latest score snapshot per security, filtered and sorted.
    pub async fn query_security_ratings(
        &self,
        filter: &SecurityRatingsFilter,
    ) -> Result<Vec<SecurityRatingRow>> {
        let mut sql = String::from(
            r#"
            SELECT s.id AS security_id, s.symbol, s.name, s.sector, qs.score_date,
                   qs.piotroski, qs.altman_z, qs.magic_formula, qs.canslim,
                   qs.profitability, qs.financial_strength, qs.earnings_quality,
                   qs.growth, qs.valuation, qs.overall
            FROM securities s
            JOIN quality_scores qs ON qs.security_id = s.id
            JOIN (
                SELECT security_id, MAX(score_date) AS max_date
                FROM quality_scores
                GROUP BY security_id
            ) latest ON latest.security_id = qs.security_id AND latest.max_date = qs.score_date
            WHERE 1=1
            "#,
        );
        if filter.sector.is_some() {
            sql.push_str(" AND s.sector = ?");
        }
        if filter.min_overall.is_some() {
            sql.push_str(" AND qs.overall >= ?");
        }
        sql.push_str(&format!(
            " ORDER BY qs.{} IS NULL, qs.{} DESC LIMIT ?",
            filter.sort.as_sql(),
            filter.sort.as_sql()
        ));

        let mut query = sqlx::query_as::<_, SecurityRatingRow>(&sql);
        if let Some(sector) = &filter.sector {
            query = query.bind(sector);
        }
        if let Some(min_overall) = filter.min_overall {
            query = query.bind(min_overall);
        }
        query = query.bind(filter.limit);

        Ok(query.fetch_all(&self.pool).await?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{NewFund, NewSecurity};
    use chrono::{NaiveDate, Utc};
    use ratings_core::QualityScores;

    fn cache_row(fund_id: i64, name: &str, house: &str, overall: f64, coverage: f64, cagr_3y: Option<f64>) -> FundRatingRow {
        FundRatingRow {
            fund_id,
            fund_name: name.to_string(),
            fund_house: Some(house.to_string()),
            overall: Some(overall),
            profitability: None,
            financial_strength: None,
            earnings_quality: None,
            growth: None,
            valuation: None,
            piotroski_avg: None,
            altman_z_avg: None,
            magic_formula: None,
            canslim: None,
            coverage_pct: coverage,
            holdings_count: 20,
            cagr_1y: None,
            cagr_3y,
            cagr_5y: None,
            cagr_10y: None,
            refreshed_at: Utc::now(),
        }
    }

    #[tokio::test]
    async fn filters_and_sorts_fund_ratings() {
        let db = RatingsDb::new("sqlite::memory:").await.unwrap();
        db.rebuild_ratings_cache(&[
            cache_row(1, "Alpha Fund", "Acme", 82.0, 95.0, Some(14.0)),
            cache_row(2, "Beta Fund", "Acme", 55.0, 40.0, Some(22.0)),
            cache_row(3, "Gamma Fund", "Zenith", 74.0, 88.0, None),
        ])
        .await
        .unwrap();

        // Coverage threshold drops the 40%-covered fund.
        let rows = db
            .query_fund_ratings(&FundRatingsFilter {
                min_coverage_pct: Some(50.0),
                ..Default::default()
            })
            .await
            .unwrap();
        assert_eq!(rows.len(), 2);
        assert_eq!(rows[0].fund_id, 1);

        // Fund-house filter.
        let rows = db
            .query_fund_ratings(&FundRatingsFilter {
                fund_house: Some("Zenith".to_string()),
                ..Default::default()
            })
            .await
            .unwrap();
        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0].fund_id, 3);

        // CAGR sort puts the missing-CAGR fund last.
        let rows = db
            .query_fund_ratings(&FundRatingsFilter {
                sort: SortColumn::CagrThreeYear,
                ..Default::default()
            })
            .await
            .unwrap();
        assert_eq!(rows[0].fund_id, 2);
        assert_eq!(rows[2].fund_id, 3);

        // Minimum score threshold.
        let rows = db
            .query_fund_ratings(&FundRatingsFilter {
                min_overall: Some(70.0),
                ..Default::default()
            })
            .await
            .unwrap();
        assert_eq!(rows.len(), 2);
    }

    #[tokio::test]
    async fn security_reads_filter_by_sector_and_score() {
        let db = RatingsDb::new("sqlite::memory:").await.unwrap();
        let date = NaiveDate::from_ymd_opt(2026, 8, 1).unwrap();

        for (symbol, sector, overall) in [
            ("RELIANCE", "Energy", 78.0),
            ("ONGC", "Energy", 52.0),
            ("INFY", "Technology", 81.0),
        ] {
            let id = db
                .upsert_security(&NewSecurity {
                    symbol: symbol.to_string(),
                    name: symbol.to_string(),
                    sector: Some(sector.to_string()),
                    industry: None,
                    market_cap: None,
                })
                .await
                .unwrap();
            db.upsert_quality_scores(
                id,
                date,
                &QualityScores {
                    overall: Some(overall),
                    ..Default::default()
                },
            )
            .await
            .unwrap();
        }

        let rows = db
            .query_security_ratings(&SecurityRatingsFilter {
                sector: Some("Energy".to_string()),
                min_overall: Some(60.0),
                ..Default::default()
            })
            .await
            .unwrap();
        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0].symbol, "RELIANCE");

        let all = db
            .query_security_ratings(&SecurityRatingsFilter::default())
            .await
            .unwrap();
        assert_eq!(all.len(), 3);
        assert_eq!(all[0].symbol, "INFY");
    }

    #[tokio::test]
    async fn fund_round_trip() {
        let db = RatingsDb::new("sqlite::memory:").await.unwrap();
        let id = db
            .insert_fund(&NewFund {
                name: "Flexi Cap Fund".to_string(),
                fund_house: None,
                scheme_code: Some("118550".to_string()),
            })
            .await
            .unwrap();
        let fund = db.get_fund(id).await.unwrap().unwrap();
        assert_eq!(fund.scheme_code.as_deref(), Some("118550"));
    }
}
