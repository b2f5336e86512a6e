//! The five pillar scores and the overall quality blend. Each pillar is
//! an instance of the composite primitive with its own weight table and
//! renormalizes independently over the components actually present.

use crate::composite::{band_score, weighted_score};
use ratings_core::FundamentalSnapshot;

// Profitability bands
const ROE_BAND: &[(f64, f64)] = &[(0.0, 0.0), (30.0, 100.0)];
const ROCE_BAND: &[(f64, f64)] = &[(0.0, 0.0), (30.0, 100.0)];
const OPERATING_MARGIN_BAND: &[(f64, f64)] = &[(0.0, 0.0), (25.0, 100.0)];
const NET_MARGIN_BAND: &[(f64, f64)] = &[(0.0, 0.0), (20.0, 100.0)];

// Financial-strength bands
const ALTMAN_BAND: &[(f64, f64)] = &[(0.0, 0.0), (1.8, 40.0), (3.0, 80.0), (4.5, 100.0)];
const DEBT_EQUITY_BAND: &[(f64, f64)] = &[(0.0, 100.0), (1.0, 70.0), (2.0, 40.0), (3.0, 0.0)];
const INTEREST_COVERAGE_BAND: &[(f64, f64)] = &[(1.0, 0.0), (4.0, 50.0), (10.0, 100.0)];
const PLEDGE_BAND: &[(f64, f64)] = &[(0.0, 100.0), (25.0, 50.0), (50.0, 0.0)];

// Earnings-quality bands
const OCF_NET_INCOME_BAND: &[(f64, f64)] = &[(0.5, 0.0), (0.8, 50.0), (1.2, 100.0)];
const FCF_YIELD_BAND: &[(f64, f64)] = &[(0.0, 0.0), (8.0, 100.0)];
/// Accruals = (net income - OCF) / total assets, in percent. More
/// negative accruals mean earnings are cash-backed, so the band slopes
/// down.
const ACCRUALS_BAND: &[(f64, f64)] = &[(-10.0, 100.0), (0.0, 50.0), (10.0, 0.0)];

// Growth bands: piecewise-linear between floor and ceiling percentages
const REVENUE_GROWTH_BAND: &[(f64, f64)] = &[(0.0, 0.0), (30.0, 100.0)];
const EPS_GROWTH_BAND: &[(f64, f64)] = &[(0.0, 0.0), (30.0, 100.0)];
const MARGIN_EXPANSION_BAND: &[(f64, f64)] = &[(-2.0, 0.0), (5.0, 100.0)];

// Valuation bands
const PE_BAND: &[(f64, f64)] = &[(15.0, 100.0), (25.0, 60.0), (40.0, 20.0), (80.0, 0.0)];
const PB_BAND: &[(f64, f64)] = &[(1.0, 100.0), (3.0, 60.0), (6.0, 20.0), (12.0, 0.0)];
const EARNINGS_YIELD_BAND: &[(f64, f64)] = &[(0.0, 0.0), (10.0, 100.0)];

// Overall pillar weights
const WEIGHT_PROFITABILITY: f64 = 25.0;
const WEIGHT_FINANCIAL_STRENGTH: f64 = 20.0;
const WEIGHT_EARNINGS_QUALITY: f64 = 20.0;
const WEIGHT_GROWTH: f64 = 15.0;
const WEIGHT_VALUATION: f64 = 20.0;

/// ROE 30%, ROCE 30%, operating margin 20%, net margin 20%.
pub fn profitability_score(snap: &FundamentalSnapshot) -> Option<f64> {
    weighted_score(&[
        (snap.roe_pct.map(|v| band_score(v, ROE_BAND)), 30.0),
        (snap.roce_pct.map(|v| band_score(v, ROCE_BAND)), 30.0),
        (
            snap.operating_margin_pct
                .map(|v| band_score(v, OPERATING_MARGIN_BAND)),
            20.0,
        ),
        (
            snap.net_margin_pct.map(|v| band_score(v, NET_MARGIN_BAND)),
            20.0,
        ),
    ])
}

/// Piotroski 30%, Altman-Z 25%, debt/equity 20%, interest coverage 15%,
/// promoter pledge 10%.
pub fn financial_strength_score(
    snap: &FundamentalSnapshot,
    piotroski: Option<i32>,
    altman_z: Option<f64>,
) -> Option<f64> {
    weighted_score(&[
        (piotroski.map(|p| p as f64 / 9.0 * 100.0), 30.0),
        (altman_z.map(|z| band_score(z, ALTMAN_BAND)), 25.0),
        (
            snap.debt_to_equity.map(|v| band_score(v, DEBT_EQUITY_BAND)),
            20.0,
        ),
        (
            snap.interest_coverage
                .map(|v| band_score(v, INTEREST_COVERAGE_BAND)),
            15.0,
        ),
        (
            snap.promoter_pledge_pct.map(|v| band_score(v, PLEDGE_BAND)),
            10.0,
        ),
    ])
}

/// OCF/NetIncome 35%, FCF yield 35%, accruals 30%.
pub fn earnings_quality_score(snap: &FundamentalSnapshot) -> Option<f64> {
    let ocf_ni = match (snap.operating_cash_flow, snap.net_income) {
        (Some(ocf), Some(ni)) if ni > 0.0 => Some(ocf / ni),
        _ => None,
    };
    let fcf_yield_pct = match (snap.free_cash_flow, snap.market_cap) {
        (Some(fcf), Some(mc)) if mc > 0.0 => Some(fcf / mc * 100.0),
        _ => None,
    };
    let accruals_pct = match (snap.net_income, snap.operating_cash_flow, snap.total_assets) {
        (Some(ni), Some(ocf), Some(ta)) if ta > 0.0 => Some((ni - ocf) / ta * 100.0),
        _ => None,
    };

    weighted_score(&[
        (ocf_ni.map(|v| band_score(v, OCF_NET_INCOME_BAND)), 35.0),
        (fcf_yield_pct.map(|v| band_score(v, FCF_YIELD_BAND)), 35.0),
        (accruals_pct.map(|v| band_score(v, ACCRUALS_BAND)), 30.0),
    ])
}

/// Revenue YoY 40%, EPS YoY 40%, operating-margin expansion 20%.
pub fn growth_score(snap: &FundamentalSnapshot) -> Option<f64> {
    weighted_score(&[
        (
            snap.revenue_growth_pct
                .map(|v| band_score(v, REVENUE_GROWTH_BAND)),
            40.0,
        ),
        (
            snap.eps_growth_pct.map(|v| band_score(v, EPS_GROWTH_BAND)),
            40.0,
        ),
        (
            snap.margin_expansion_pp
                .map(|v| band_score(v, MARGIN_EXPANSION_BAND)),
            20.0,
        ),
    ])
}

/// PE 40%, PB 30%, earnings yield 30%.
pub fn valuation_score(snap: &FundamentalSnapshot) -> Option<f64> {
    weighted_score(&[
        (
            snap.pe.filter(|v| *v > 0.0).map(|v| band_score(v, PE_BAND)),
            40.0,
        ),
        (
            snap.pb.filter(|v| *v > 0.0).map(|v| band_score(v, PB_BAND)),
            30.0,
        ),
        (
            snap.earnings_yield_pct
                .map(|v| band_score(v, EARNINGS_YIELD_BAND)),
            30.0,
        ),
    ])
}

/// Overall quality: pillar blend 25/20/20/15/20, renormalized over the
/// pillars actually computed; `None` when none are available.
pub fn overall_score(
    profitability: Option<f64>,
    financial_strength: Option<f64>,
    earnings_quality: Option<f64>,
    growth: Option<f64>,
    valuation: Option<f64>,
) -> Option<f64> {
    weighted_score(&[
        (profitability, WEIGHT_PROFITABILITY),
        (financial_strength, WEIGHT_FINANCIAL_STRENGTH),
        (earnings_quality, WEIGHT_EARNINGS_QUALITY),
        (growth, WEIGHT_GROWTH),
        (valuation, WEIGHT_VALUATION),
    ])
}
