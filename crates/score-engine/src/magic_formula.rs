//! Magic Formula: 50% earnings yield + 50% return on capital employed,
//! each normalized against a documented ceiling.

use crate::composite::{band_score, weighted_score};
use ratings_core::FundamentalSnapshot;

/// Earnings yield scores 100 at a 20% yield.
const EARNINGS_YIELD_BAND: &[(f64, f64)] = &[(0.0, 0.0), (20.0, 100.0)];
/// ROCE scores 100 at 30%.
const ROCE_BAND: &[(f64, f64)] = &[(0.0, 0.0), (30.0, 100.0)];

const WEIGHT_EARNINGS_YIELD: f64 = 50.0;
const WEIGHT_ROCE: f64 = 50.0;

/// 0-100 score; either half is omitted (and the other reweighted to
/// 100%) when its input is absent.
pub fn magic_formula_score(snap: &FundamentalSnapshot) -> Option<f64> {
    let yield_score = snap
        .earnings_yield_pct
        .map(|ey| band_score(ey, EARNINGS_YIELD_BAND));
    let roce_score = snap.roce_pct.map(|roce| band_score(roce, ROCE_BAND));

    weighted_score(&[
        (yield_score, WEIGHT_EARNINGS_YIELD),
        (roce_score, WEIGHT_ROCE),
    ])
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn blends_both_halves() {
        let snap = FundamentalSnapshot {
            earnings_yield_pct: Some(10.0), // 50
            roce_pct: Some(30.0),           // 100
            ..Default::default()
        };
        let score = magic_formula_score(&snap).unwrap();
        assert!((score - 75.0).abs() < 1e-9);
    }

    #[test]
    fn single_half_reweights_to_full() {
        let snap = FundamentalSnapshot {
            roce_pct: Some(15.0), // 50, earnings yield missing
            ..Default::default()
        };
        let score = magic_formula_score(&snap).unwrap();
        assert!((score - 50.0).abs() < 1e-9);
    }

    #[test]
    fn ceilings_clamp() {
        let snap = FundamentalSnapshot {
            earnings_yield_pct: Some(45.0),
            roce_pct: Some(80.0),
            ..Default::default()
        };
        assert_eq!(magic_formula_score(&snap), Some(100.0));
    }

    #[test]
    fn no_inputs_yields_none() {
        assert_eq!(magic_formula_score(&FundamentalSnapshot::default()), None);
    }
}
