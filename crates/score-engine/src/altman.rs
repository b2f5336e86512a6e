//! Altman Z-Score: linear discriminant over five balance-sheet/income
//! ratios estimating bankruptcy risk.

use crate::composite::round2;
use ratings_core::FundamentalSnapshot;

/// Cap on the market-cap/liabilities term so near-zero liabilities cannot
/// dominate the blend.
const X4_CAP: f64 = 10.0;

/// `Z = 1.2·X1 + 1.4·X2 + 3.3·X3 + 0.6·X4 + 1.0·X5`.
///
/// X1 = working capital / total assets, X2 = equity / total assets
/// (approximating retained earnings), X3 = operating income / total
/// assets, X4 = market cap / total liabilities (capped), X5 = revenue /
/// total assets. `None` when total assets are missing or zero; terms with
/// missing inputs drop out of the sum.
pub fn altman_z(snap: &FundamentalSnapshot) -> Option<f64> {
    let total_assets = snap.total_assets.filter(|ta| *ta > 0.0)?;

    let mut z = 0.0;
    let mut terms = 0;

    if let Some(wc) = snap.working_capital {
        z += 1.2 * wc / total_assets;
        terms += 1;
    }
    if let Some(equity) = snap.shareholders_equity {
        z += 1.4 * equity / total_assets;
        terms += 1;
    }
    if let Some(op) = snap.operating_income {
        z += 3.3 * op / total_assets;
        terms += 1;
    }
    if let (Some(mc), Some(tl)) = (snap.market_cap, snap.total_liabilities) {
        if tl > 0.0 {
            z += 0.6 * (mc / tl).min(X4_CAP);
            terms += 1;
        }
    }
    if let Some(revenue) = snap.revenue {
        z += revenue / total_assets;
        terms += 1;
    }

    if terms == 0 {
        None
    } else {
        Some(round2(z))
    }
}
