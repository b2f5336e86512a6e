use chrono::{DateTime, NaiveDate, Utc};
use ratings_core::QualityScores;
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

/// Insert shape for a security; the store assigns the id.
#[derive(Debug, Clone)]
pub struct NewSecurity {
    pub symbol: String,
    pub name: String,
    pub sector: Option<String>,
    pub industry: Option<String>,
    pub market_cap: Option<f64>,
}

/// Insert shape for a fund.
#[derive(Debug, Clone)]
pub struct NewFund {
    pub name: String,
    pub fund_house: Option<String>,
    pub scheme_code: Option<String>,
}

/// One persisted score snapshot row.
#[derive(Debug, Clone, FromRow, Serialize, Deserialize)]
pub struct QualityScoreRow {
    pub security_id: i64,
    pub score_date: NaiveDate,
    pub piotroski: Option<i64>,
    pub altman_z: Option<f64>,
    pub magic_formula: Option<f64>,
    pub canslim: Option<f64>,
    pub profitability: Option<f64>,
    pub financial_strength: Option<f64>,
    pub earnings_quality: Option<f64>,
    pub growth: Option<f64>,
    pub valuation: Option<f64>,
    pub overall: Option<f64>,
}

impl QualityScoreRow {
    pub fn scores(&self) -> QualityScores {
        QualityScores {
            piotroski: self.piotroski.map(|p| p as i32),
            altman_z: self.altman_z,
            magic_formula: self.magic_formula,
            canslim: self.canslim,
            profitability: self.profitability,
            financial_strength: self.financial_strength,
            earnings_quality: self.earnings_quality,
            growth: self.growth,
            valuation: self.valuation,
            overall: self.overall,
        }
    }
}

/// Materialized ratings-cache row: the fund aggregate joined with its
/// trailing NAV returns, shaped for the external read path.
#[derive(Debug, Clone, FromRow, Serialize, Deserialize)]
pub struct FundRatingRow {
    pub fund_id: i64,
    pub fund_name: String,
    pub fund_house: Option<String>,
    pub overall: Option<f64>,
    pub profitability: Option<f64>,
    pub financial_strength: Option<f64>,
    pub earnings_quality: Option<f64>,
    pub growth: Option<f64>,
    pub valuation: Option<f64>,
    pub piotroski_avg: Option<f64>,
    pub altman_z_avg: Option<f64>,
    pub magic_formula: Option<f64>,
    pub canslim: Option<f64>,
    pub coverage_pct: f64,
    pub holdings_count: i64,
    pub cagr_1y: Option<f64>,
    pub cagr_3y: Option<f64>,
    pub cagr_5y: Option<f64>,
    pub cagr_10y: Option<f64>,
    pub refreshed_at: DateTime<Utc>,
}

/// Security read-path row: identity plus the latest score snapshot.
#[derive(Debug, Clone, FromRow, Serialize, Deserialize)]
pub struct SecurityRatingRow {
    pub security_id: i64,
    pub symbol: String,
    pub name: String,
    pub sector: Option<String>,
    pub score_date: NaiveDate,
    pub piotroski: Option<i64>,
    pub altman_z: Option<f64>,
    pub magic_formula: Option<f64>,
    pub canslim: Option<f64>,
    pub profitability: Option<f64>,
    pub financial_strength: Option<f64>,
    pub earnings_quality: Option<f64>,
    pub growth: Option<f64>,
    pub valuation: Option<f64>,
    pub overall: Option<f64>,
}
