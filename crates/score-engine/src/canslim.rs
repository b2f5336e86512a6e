//! CANSLIM-style growth screen: weighted blend of earnings margin, ROE,
//! operating margin, market-cap liquidity tier, ROCE, and current ratio.

use crate::composite::{band_score, weighted_score};
use ratings_core::FundamentalSnapshot;

const NET_MARGIN_BAND: &[(f64, f64)] = &[(0.0, 0.0), (20.0, 100.0)];
const ROE_BAND: &[(f64, f64)] = &[(0.0, 0.0), (25.0, 100.0)];
const OPERATING_MARGIN_BAND: &[(f64, f64)] = &[(0.0, 0.0), (25.0, 100.0)];
const ROCE_BAND: &[(f64, f64)] = &[(0.0, 0.0), (30.0, 100.0)];
const CURRENT_RATIO_BAND: &[(f64, f64)] = &[(0.5, 0.0), (2.0, 100.0)];

const WEIGHT_NET_MARGIN: f64 = 25.0;
const WEIGHT_ROE: f64 = 20.0;
const WEIGHT_OPERATING_MARGIN: f64 = 15.0;
const WEIGHT_LIQUIDITY: f64 = 15.0;
const WEIGHT_ROCE: f64 = 15.0;
const WEIGHT_CURRENT_RATIO: f64 = 10.0;

/// Liquidity tier by market capitalization: larger caps trade deeper.
fn liquidity_tier(market_cap: f64) -> f64 {
    if market_cap >= 10e9 {
        100.0
    } else if market_cap >= 2e9 {
        75.0
    } else if market_cap >= 5e8 {
        50.0
    } else {
        25.0
    }
}

/// 0-100 score; weights renormalize over whatever sub-scores are
/// computable.
pub fn canslim_score(snap: &FundamentalSnapshot) -> Option<f64> {
    weighted_score(&[
        (
            snap.net_margin_pct.map(|m| band_score(m, NET_MARGIN_BAND)),
            WEIGHT_NET_MARGIN,
        ),
        (snap.roe_pct.map(|r| band_score(r, ROE_BAND)), WEIGHT_ROE),
        (
            snap.operating_margin_pct
                .map(|m| band_score(m, OPERATING_MARGIN_BAND)),
            WEIGHT_OPERATING_MARGIN,
        ),
        (snap.market_cap.map(liquidity_tier), WEIGHT_LIQUIDITY),
        (snap.roce_pct.map(|r| band_score(r, ROCE_BAND)), WEIGHT_ROCE),
        (
            snap.current_ratio
                .map(|c| band_score(c, CURRENT_RATIO_BAND)),
            WEIGHT_CURRENT_RATIO,
        ),
    ])
}
