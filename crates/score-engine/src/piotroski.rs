//! Piotroski F-Score: nine binary health tests across profitability,
//! leverage/liquidity, and operating efficiency.
//!
//! A test whose inputs are missing is excluded from the denominator and
//! the pass count is rescaled to the nine-point scale, consistent with
//! the renormalization policy of every other calculator. Zero evaluable
//! tests yield `None`.

use ratings_core::FundamentalSnapshot;

const TEST_COUNT: usize = 9;

fn gt(a: Option<f64>, b: Option<f64>) -> Option<bool> {
    match (a, b) {
        (Some(a), Some(b)) => Some(a > b),
        _ => None,
    }
}

fn le(a: Option<f64>, b: Option<f64>) -> Option<bool> {
    match (a, b) {
        (Some(a), Some(b)) => Some(a <= b),
        _ => None,
    }
}

fn positive(v: Option<f64>) -> Option<bool> {
    v.map(|v| v > 0.0)
}

fn checklist(snap: &FundamentalSnapshot) -> [Option<bool>; TEST_COUNT] {
    [
        // Profitability
        positive(snap.roa_pct),
        positive(snap.operating_cash_flow),
        gt(snap.roa_pct, snap.prior_roa_pct),
        // Accrual check: cash earnings should back reported earnings
        gt(snap.operating_cash_flow, snap.net_income),
        // Leverage / liquidity
        gt(snap.prior_leverage_ratio, snap.leverage_ratio),
        gt(snap.current_ratio, snap.prior_current_ratio),
        le(snap.shares_outstanding, snap.prior_shares_outstanding),
        // Efficiency
        gt(snap.gross_margin_pct, snap.prior_gross_margin_pct),
        gt(snap.asset_turnover, snap.prior_asset_turnover),
    ]
}

/// 0-9 integer score. When fewer than nine tests are evaluable the pass
/// count is rescaled to the nine-point scale; `None` when none are.
pub fn piotroski_score(snap: &FundamentalSnapshot) -> Option<i32> {
    let results = checklist(snap);
    let available = results.iter().filter(|t| t.is_some()).count();
    if available == 0 {
        return None;
    }
    let passed = results.iter().filter(|t| **t == Some(true)).count();
    if available == TEST_COUNT {
        Some(passed as i32)
    } else {
        Some((passed as f64 / available as f64 * TEST_COUNT as f64).round() as i32)
    }
}
