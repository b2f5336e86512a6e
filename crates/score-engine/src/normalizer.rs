//! Maps heterogeneous raw fundamentals onto the canonical metric set.
//!
//! Each metric follows a fallback chain: the direct ratio field wins when
//! present, otherwise the ratio is derived from its inputs. A missing
//! metric stays `None` — nothing is ever defaulted to zero.

use ratings_core::{FundamentalSnapshot, RawFundamentals};

fn ratio(numerator: Option<f64>, denominator: Option<f64>) -> Option<f64> {
    match (numerator, denominator) {
        (Some(n), Some(d)) if d > 0.0 => Some(n / d),
        _ => None,
    }
}

fn pct(numerator: Option<f64>, denominator: Option<f64>) -> Option<f64> {
    ratio(numerator, denominator).map(|r| r * 100.0)
}

fn growth_pct(current: Option<f64>, prior: Option<f64>) -> Option<f64> {
    match (current, prior) {
        (Some(c), Some(p)) if p > 0.0 => Some((c - p) / p * 100.0),
        _ => None,
    }
}

pub fn normalize(raw: &RawFundamentals) -> FundamentalSnapshot {
    let capital_employed = match (raw.shareholders_equity, raw.total_debt) {
        (Some(equity), Some(debt)) => Some(equity + debt),
        (Some(equity), None) => Some(equity),
        _ => None,
    };

    let working_capital = raw.working_capital.or_else(|| {
        match (raw.current_assets, raw.current_liabilities) {
            (Some(ca), Some(cl)) => Some(ca - cl),
            _ => None,
        }
    });

    let free_cash_flow = raw.free_cash_flow.or_else(|| {
        match (raw.operating_cash_flow, raw.capex) {
            (Some(ocf), Some(capex)) => Some(ocf - capex),
            _ => None,
        }
    });

    let pe = raw
        .pe
        .filter(|v| *v > 0.0)
        .or_else(|| ratio(raw.price, raw.eps.filter(|e| *e > 0.0)));

    let pb = raw
        .pb
        .filter(|v| *v > 0.0)
        .or_else(|| ratio(raw.price, raw.book_value_per_share.filter(|b| *b > 0.0)));

    let earnings_yield_pct = raw
        .earnings_yield_pct
        .or_else(|| pe.filter(|p| *p > 0.0).map(|p| 100.0 / p));

    let operating_margin_pct = raw
        .operating_margin_pct
        .or_else(|| pct(raw.operating_income, raw.revenue));

    let margin_expansion_pp = match (operating_margin_pct, raw.prior_operating_margin_pct) {
        (Some(current), Some(prior)) => Some(current - prior),
        _ => None,
    };

    FundamentalSnapshot {
        revenue: raw.revenue,
        operating_income: raw.operating_income,
        net_income: raw.net_income,
        eps: raw.eps,

        roe_pct: raw
            .roe_pct
            .or_else(|| pct(raw.net_income, raw.shareholders_equity)),
        roce_pct: raw
            .roce_pct
            .or_else(|| pct(raw.operating_income, capital_employed)),
        roa_pct: pct(raw.net_income, raw.total_assets),
        operating_margin_pct,
        net_margin_pct: raw
            .net_margin_pct
            .or_else(|| pct(raw.net_income, raw.revenue)),
        gross_margin_pct: raw.gross_margin_pct,

        debt_to_equity: raw
            .debt_to_equity
            .or_else(|| ratio(raw.total_debt, raw.shareholders_equity)),
        interest_coverage: raw
            .interest_coverage
            .or_else(|| ratio(raw.operating_income, raw.interest_expense)),
        current_ratio: raw
            .current_ratio
            .or_else(|| ratio(raw.current_assets, raw.current_liabilities)),
        leverage_ratio: ratio(raw.total_debt, raw.total_assets),

        total_assets: raw.total_assets,
        total_liabilities: raw.total_liabilities,
        shareholders_equity: raw.shareholders_equity,
        working_capital,
        shares_outstanding: raw.shares_outstanding,
        asset_turnover: ratio(raw.revenue, raw.total_assets),

        operating_cash_flow: raw.operating_cash_flow,
        free_cash_flow,

        pe,
        pb,
        earnings_yield_pct,
        market_cap: raw.market_cap,
        promoter_pledge_pct: raw.promoter_pledge_pct,

        revenue_growth_pct: growth_pct(raw.revenue, raw.prior_revenue),
        eps_growth_pct: growth_pct(raw.eps, raw.prior_eps),
        margin_expansion_pp,

        prior_roa_pct: raw.prior_roa_pct,
        prior_gross_margin_pct: raw.prior_gross_margin_pct,
        prior_current_ratio: raw.prior_current_ratio,
        prior_leverage_ratio: raw.prior_leverage_ratio,
        prior_asset_turnover: raw.prior_asset_turnover,
        prior_shares_outstanding: raw.prior_shares_outstanding,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn direct_field_wins_over_derived() {
        let raw = RawFundamentals {
            roe_pct: Some(18.0),
            net_income: Some(50.0),
            shareholders_equity: Some(1000.0), // would derive 5.0
            ..Default::default()
        };
        let snap = normalize(&raw);
        assert_eq!(snap.roe_pct, Some(18.0));
    }

    #[test]
    fn roe_derived_when_direct_absent() {
        let raw = RawFundamentals {
            net_income: Some(150.0),
            shareholders_equity: Some(1000.0),
            ..Default::default()
        };
        let snap = normalize(&raw);
        assert!((snap.roe_pct.unwrap() - 15.0).abs() < 1e-9);
    }

    #[test]
    fn zero_denominator_stays_none() {
        let raw = RawFundamentals {
            net_income: Some(150.0),
            shareholders_equity: Some(0.0),
            revenue: Some(0.0),
            ..Default::default()
        };
        let snap = normalize(&raw);
        assert_eq!(snap.roe_pct, None);
        assert_eq!(snap.net_margin_pct, None);
    }

    #[test]
    fn working_capital_and_fcf_fall_back_to_components() {
        let raw = RawFundamentals {
            current_assets: Some(500.0),
            current_liabilities: Some(300.0),
            operating_cash_flow: Some(120.0),
            capex: Some(40.0),
            ..Default::default()
        };
        let snap = normalize(&raw);
        assert_eq!(snap.working_capital, Some(200.0));
        assert_eq!(snap.free_cash_flow, Some(80.0));
    }

    #[test]
    fn earnings_yield_derived_from_pe() {
        let raw = RawFundamentals {
            pe: Some(20.0),
            ..Default::default()
        };
        let snap = normalize(&raw);
        assert!((snap.earnings_yield_pct.unwrap() - 5.0).abs() < 1e-9);
    }

    #[test]
    fn negative_pe_is_discarded() {
        let raw = RawFundamentals {
            pe: Some(-12.0),
            ..Default::default()
        };
        let snap = normalize(&raw);
        assert_eq!(snap.pe, None);
        assert_eq!(snap.earnings_yield_pct, None);
    }

    #[test]
    fn growth_deltas_need_positive_prior() {
        let raw = RawFundamentals {
            revenue: Some(1200.0),
            prior_revenue: Some(1000.0),
            eps: Some(11.0),
            prior_eps: Some(0.0),
            ..Default::default()
        };
        let snap = normalize(&raw);
        assert!((snap.revenue_growth_pct.unwrap() - 20.0).abs() < 1e-9);
        assert_eq!(snap.eps_growth_pct, None);
    }
}
