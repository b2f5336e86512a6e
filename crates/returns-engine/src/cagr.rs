//! Annualized-return arithmetic over an ordered price series.
//!
//! The same engine serves equity close prices and fund NAVs: the caller
//! hands in a series ordered newest-first and gets per-horizon CAGR
//! percentages back. Identifier resolution happens upstream.

use chrono::{Months, NaiveDate};
use ratings_core::{PricePoint, TrailingReturns};

/// A lookback match is accepted only within this many days of the target
/// date; series with coarser gaps leave the horizon unavailable.
pub const MATCH_TOLERANCE_DAYS: i64 = 15;

/// Standard lookback horizons in years.
pub const HORIZONS: [u32; 4] = [1, 3, 5, 10];

fn round2(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}

/// Most recent entry dated on or before `target`. The series must be
/// ordered newest-first.
fn nearest_on_or_before(series: &[PricePoint], target: NaiveDate) -> Option<&PricePoint> {
    series.iter().find(|p| p.date <= target)
}

/// Annualized return over `years`, in percent, rounded to 2 decimals.
///
/// The base price is the most recent entry at or before
/// `latest_date - years`, accepted only within [`MATCH_TOLERANCE_DAYS`].
/// Returns `None` on an empty series, a non-positive price, or an
/// out-of-tolerance match.
pub fn cagr(series: &[PricePoint], years: u32) -> Option<f64> {
    let latest = series.first()?;
    if latest.price <= 0.0 || years == 0 {
        return None;
    }

    let target = latest.date.checked_sub_months(Months::new(years * 12))?;
    let base = nearest_on_or_before(series, target)?;
    if (target - base.date).num_days() > MATCH_TOLERANCE_DAYS {
        return None;
    }
    if base.price <= 0.0 {
        return None;
    }

    let growth = (latest.price / base.price).powf(1.0 / years as f64) - 1.0;
    Some(round2(growth * 100.0))
}

/// CAGR over each standard horizon; horizons are independent, so a gap
/// in the series nulls one without affecting the others.
pub fn trailing_returns(series: &[PricePoint]) -> TrailingReturns {
    TrailingReturns {
        one_year: cagr(series, 1),
        three_year: cagr(series, 3),
        five_year: cagr(series, 5),
        ten_year: cagr(series, 10),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn point(y: i32, m: u32, d: u32, price: f64) -> PricePoint {
        PricePoint {
            date: date(y, m, d),
            price,
        }
    }

    #[test]
    fn two_year_cagr_of_121_over_100_is_ten_percent() {
        let series = vec![point(2026, 1, 15, 121.0), point(2024, 1, 15, 100.0)];
        assert_eq!(cagr(&series, 2), Some(10.0));
    }

    #[test]
    fn nearest_earlier_date_within_tolerance_matches() {
        // Base entry 10 days before the 1-year target date.
        let series = vec![point(2026, 1, 15, 110.0), point(2025, 1, 5, 100.0)];
        assert_eq!(cagr(&series, 1), Some(10.0));
    }

    #[test]
    fn out_of_tolerance_match_is_rejected() {
        // Base entry 40 days before the target.
        let series = vec![point(2026, 1, 15, 110.0), point(2024, 12, 6, 100.0)];
        assert_eq!(cagr(&series, 1), None);
    }

    #[test]
    fn a_gap_nulls_one_horizon_without_affecting_others() {
        let series = vec![
            point(2026, 1, 15, 150.0),
            point(2025, 1, 10, 120.0),
            // Nothing near the 3-year target.
            point(2021, 1, 12, 75.0),
        ];
        let trailing = trailing_returns(&series);
        assert_eq!(trailing.one_year, Some(25.0));
        assert_eq!(trailing.three_year, None);
        assert_eq!(trailing.five_year, Some(14.87));
        assert_eq!(trailing.ten_year, None);
    }

    #[test]
    fn non_positive_prices_yield_none() {
        let series = vec![point(2026, 1, 15, 110.0), point(2025, 1, 15, 0.0)];
        assert_eq!(cagr(&series, 1), None);

        let series = vec![point(2026, 1, 15, -5.0), point(2025, 1, 15, 100.0)];
        assert_eq!(cagr(&series, 1), None);
    }

    #[test]
    fn empty_series_yields_none() {
        assert_eq!(cagr(&[], 1), None);
        assert_eq!(trailing_returns(&[]), TrailingReturns::default());
    }
}
