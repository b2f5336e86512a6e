use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

/// A listed security (stock) known to the ratings system.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Security {
    pub id: i64,
    pub symbol: String,
    pub name: String,
    pub sector: Option<String>,
    pub industry: Option<String>,
    pub market_cap: Option<f64>,
}

/// Raw per-security financial record as delivered by the ingestion
/// pipeline. Several ratios arrive in alternate encodings (a direct
/// percentage field and/or the inputs to derive it); many fields are null.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct RawFundamentals {
    // Income statement
    pub revenue: Option<f64>,
    pub operating_income: Option<f64>,
    pub net_income: Option<f64>,
    pub eps: Option<f64>,
    pub interest_expense: Option<f64>,

    // Direct ratio fields (preferred over derived forms when present)
    pub roe_pct: Option<f64>,
    pub roce_pct: Option<f64>,
    pub operating_margin_pct: Option<f64>,
    pub net_margin_pct: Option<f64>,
    pub gross_margin_pct: Option<f64>,
    pub debt_to_equity: Option<f64>,
    pub interest_coverage: Option<f64>,
    pub current_ratio: Option<f64>,
    pub earnings_yield_pct: Option<f64>,
    pub pe: Option<f64>,
    pub pb: Option<f64>,

    // Balance sheet
    pub total_assets: Option<f64>,
    pub total_liabilities: Option<f64>,
    pub shareholders_equity: Option<f64>,
    pub total_debt: Option<f64>,
    pub current_assets: Option<f64>,
    pub current_liabilities: Option<f64>,
    pub working_capital: Option<f64>,
    pub shares_outstanding: Option<f64>,
    pub book_value_per_share: Option<f64>,

    // Cash flow
    pub operating_cash_flow: Option<f64>,
    pub capex: Option<f64>,
    pub free_cash_flow: Option<f64>,

    // Market
    pub price: Option<f64>,
    pub market_cap: Option<f64>,
    pub promoter_pledge_pct: Option<f64>,

    // Prior-period values for growth and Piotroski delta tests
    pub prior_revenue: Option<f64>,
    pub prior_eps: Option<f64>,
    pub prior_operating_margin_pct: Option<f64>,
    pub prior_gross_margin_pct: Option<f64>,
    pub prior_roa_pct: Option<f64>,
    pub prior_current_ratio: Option<f64>,
    pub prior_leverage_ratio: Option<f64>,
    pub prior_asset_turnover: Option<f64>,
    pub prior_shares_outstanding: Option<f64>,
}

/// Canonical normalized metric set for one security at one reporting
/// period. Produced by the normalizer; every calculator reads only this.
/// Missing metrics stay `None` — they are never defaulted to zero.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct FundamentalSnapshot {
    pub revenue: Option<f64>,
    pub operating_income: Option<f64>,
    pub net_income: Option<f64>,
    pub eps: Option<f64>,

    pub roe_pct: Option<f64>,
    pub roce_pct: Option<f64>,
    pub roa_pct: Option<f64>,
    pub operating_margin_pct: Option<f64>,
    pub net_margin_pct: Option<f64>,
    pub gross_margin_pct: Option<f64>,

    pub debt_to_equity: Option<f64>,
    pub interest_coverage: Option<f64>,
    pub current_ratio: Option<f64>,
    /// Total debt / total assets.
    pub leverage_ratio: Option<f64>,

    pub total_assets: Option<f64>,
    pub total_liabilities: Option<f64>,
    pub shareholders_equity: Option<f64>,
    pub working_capital: Option<f64>,
    pub shares_outstanding: Option<f64>,
    pub asset_turnover: Option<f64>,

    pub operating_cash_flow: Option<f64>,
    pub free_cash_flow: Option<f64>,

    pub pe: Option<f64>,
    pub pb: Option<f64>,
    pub earnings_yield_pct: Option<f64>,
    pub market_cap: Option<f64>,
    pub promoter_pledge_pct: Option<f64>,

    // Derived growth deltas
    pub revenue_growth_pct: Option<f64>,
    pub eps_growth_pct: Option<f64>,
    /// Operating-margin expansion in percentage points vs the prior period.
    pub margin_expansion_pp: Option<f64>,

    // Prior-period values consumed by the Piotroski delta tests
    pub prior_roa_pct: Option<f64>,
    pub prior_gross_margin_pct: Option<f64>,
    pub prior_current_ratio: Option<f64>,
    pub prior_leverage_ratio: Option<f64>,
    pub prior_asset_turnover: Option<f64>,
    pub prior_shares_outstanding: Option<f64>,
}

/// Scalar quality scores for one security. Every field is optional:
/// a calculator with no computable inputs yields `None`, never zero.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct QualityScores {
    /// 0-9 integer checklist score.
    pub piotroski: Option<i32>,
    /// Continuous bankruptcy-risk discriminant.
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

/// One persisted score snapshot: unique per (security, calculation date);
/// a rerun on the same date overwrites in place.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct QualityScoreRecord {
    pub security_id: i64,
    pub score_date: NaiveDate,
    pub scores: QualityScores,
}

/// A mutual fund scheme tracked by the system.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Fund {
    pub id: i64,
    pub name: String,
    pub fund_house: Option<String>,
    /// NAV-series identifier when already resolved by ingestion.
    pub scheme_code: Option<String>,
}

/// One holding of a fund. `security_id` is `None` when the instrument
/// could not be matched to a listed security (debt, cash, unlisted).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FundHolding {
    pub fund_id: i64,
    pub instrument_name: String,
    pub security_id: Option<i64>,
    /// Percent of NAV.
    pub weight_pct: f64,
}

/// Holding-weighted fund-level aggregate of the security scores.
/// Fully rebuilt by the aggregator, never patched incrementally.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct FundQualityScore {
    pub fund_id: i64,
    pub piotroski_avg: Option<f64>,
    pub altman_z_avg: Option<f64>,
    pub magic_formula: Option<f64>,
    pub canslim: Option<f64>,
    pub profitability: Option<f64>,
    pub financial_strength: Option<f64>,
    pub earnings_quality: Option<f64>,
    pub growth: Option<f64>,
    pub valuation: Option<f64>,
    pub overall: Option<f64>,
    /// Sum of holding weights backed by a matched score snapshot.
    pub coverage_pct: f64,
    pub holdings_count: i64,
}

/// One point of an append-only price or NAV series.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PricePoint {
    pub date: NaiveDate,
    pub price: f64,
}

/// Annualized trailing returns (percent) over the standard horizons.
/// A horizon is `None` when no price within tolerance backs it.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct TrailingReturns {
    pub one_year: Option<f64>,
    pub three_year: Option<f64>,
    pub five_year: Option<f64>,
    pub ten_year: Option<f64>,
}

/// Continue-on-error tally returned by every batch refresh.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RefreshSummary {
    pub processed: usize,
    pub failed: usize,
    pub finished_at: DateTime<Utc>,
}

impl RefreshSummary {
    pub fn new(processed: usize, failed: usize) -> Self {
        Self {
            processed,
            failed,
            finished_at: Utc::now(),
        }
    }
}

/// A candidate scheme returned by the external scheme registry.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SchemeCandidate {
    pub scheme_code: String,
    pub scheme_name: String,
}
