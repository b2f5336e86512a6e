//! Pure scoring engine: normalizes raw fundamentals onto the canonical
//! metric set and computes every quality score from it. No I/O — the
//! store and orchestrator live elsewhere.
//!
//! Missing data is never an error here: each calculator drops the
//! sub-components it cannot compute and renormalizes the remaining
//! weights; a calculator with nothing to work with returns `None`.

pub mod altman;
pub mod canslim;
pub mod composite;
pub mod magic_formula;
pub mod normalizer;
pub mod pillars;
pub mod piotroski;

pub use altman::altman_z;
pub use canslim::canslim_score;
pub use composite::{band_score, round2, weighted_score};
pub use magic_formula::magic_formula_score;
pub use normalizer::normalize;
pub use pillars::{
    earnings_quality_score, financial_strength_score, growth_score, overall_score,
    profitability_score, valuation_score,
};
pub use piotroski::piotroski_score;

use ratings_core::{FundamentalSnapshot, QualityScores, RawFundamentals};

/// Compute the full score bundle for one normalized snapshot.
pub fn score_snapshot(snap: &FundamentalSnapshot) -> QualityScores {
    let piotroski = piotroski_score(snap);
    let altman_z = altman::altman_z(snap);

    let profitability = profitability_score(snap);
    let financial_strength = financial_strength_score(snap, piotroski, altman_z);
    let earnings_quality = earnings_quality_score(snap);
    let growth = growth_score(snap);
    let valuation = valuation_score(snap);

    let overall = overall_score(
        profitability,
        financial_strength,
        earnings_quality,
        growth,
        valuation,
    );

    QualityScores {
        piotroski,
        altman_z,
        magic_formula: magic_formula_score(snap),
        canslim: canslim_score(snap),
        profitability,
        financial_strength,
        earnings_quality,
        growth,
        valuation,
        overall,
    }
}

/// Normalize and score a raw fundamentals record in one step.
pub fn score_fundamentals(raw: &RawFundamentals) -> QualityScores {
    score_snapshot(&normalizer::normalize(raw))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn healthy_raw() -> RawFundamentals {
        RawFundamentals {
            revenue: Some(9000.0),
            operating_income: Some(1800.0),
            net_income: Some(1200.0),
            eps: Some(24.0),
            total_assets: Some(10000.0),
            total_liabilities: Some(4000.0),
            shareholders_equity: Some(6000.0),
            total_debt: Some(1500.0),
            current_assets: Some(3500.0),
            current_liabilities: Some(2000.0),
            operating_cash_flow: Some(1500.0),
            capex: Some(500.0),
            interest_expense: Some(200.0),
            price: Some(480.0),
            market_cap: Some(24000.0),
            shares_outstanding: Some(50.0),
            book_value_per_share: Some(120.0),
            promoter_pledge_pct: Some(0.0),
            gross_margin_pct: Some(45.0),
            prior_revenue: Some(7500.0),
            prior_eps: Some(20.0),
            prior_operating_margin_pct: Some(18.0),
            prior_gross_margin_pct: Some(43.0),
            prior_roa_pct: Some(10.0),
            prior_current_ratio: Some(1.6),
            prior_leverage_ratio: Some(0.2),
            prior_asset_turnover: Some(0.8),
            prior_shares_outstanding: Some(50.0),
            ..Default::default()
        }
    }

    #[test]
    fn healthy_company_scores_across_the_board() {
        let scores = score_fundamentals(&healthy_raw());
        assert_eq!(scores.piotroski, Some(9));
        assert!(scores.altman_z.unwrap() > 3.0);
        assert!(scores.overall.unwrap() > 60.0);
        assert!(scores.profitability.is_some());
        assert!(scores.financial_strength.is_some());
        assert!(scores.earnings_quality.is_some());
        assert!(scores.growth.is_some());
        assert!(scores.valuation.is_some());
        assert!(scores.magic_formula.is_some());
        assert!(scores.canslim.is_some());
    }

    #[test]
    fn scoring_is_deterministic() {
        let raw = healthy_raw();
        let first = score_fundamentals(&raw);
        let second = score_fundamentals(&raw);
        assert_eq!(first, second);
    }

    #[test]
    fn empty_record_scores_nothing() {
        let scores = score_fundamentals(&RawFundamentals::default());
        assert_eq!(scores, QualityScores::default());
    }

    #[test]
    fn sparse_record_degrades_instead_of_aborting() {
        // Valuation inputs only: every other calculator is None, overall
        // still resolves from the single available pillar.
        let raw = RawFundamentals {
            pe: Some(18.0),
            pb: Some(2.0),
            ..Default::default()
        };
        let scores = score_fundamentals(&raw);
        assert_eq!(scores.piotroski, None);
        assert_eq!(scores.altman_z, None);
        assert!(scores.valuation.is_some());
        assert_eq!(scores.overall, scores.valuation);
    }
}
