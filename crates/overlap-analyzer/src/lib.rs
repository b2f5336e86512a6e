//! Multi-fund holdings comparison: intersection, pairwise overlap,
//! unique holdings, and a diversification score. Computed per request
//! from the current holdings sets and never persisted.

use std::collections::{HashMap, HashSet};

use ratings_core::RatingsError;
use serde::{Deserialize, Serialize};

pub const MIN_FUNDS: usize = 2;
pub const MAX_FUNDS: usize = 5;

fn round2(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}

/// One fund's matched equity holdings: security id -> weight percent.
/// Unmatched instruments are excluded upstream.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FundHoldingsSet {
    pub fund_id: i64,
    pub fund_name: String,
    pub holdings: HashMap<i64, f64>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PairwiseOverlap {
    pub fund_a: i64,
    pub fund_b: i64,
    /// |A ∩ B| / min(|A|, |B|) × 100.
    pub overlap_pct: f64,
    /// Pair intersection minus the all-funds intersection.
    pub exclusive_to_pair: Vec<i64>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FundOverlapSummary {
    pub fund_id: i64,
    pub fund_name: String,
    pub holdings_count: usize,
    /// Securities held by this fund and no other selected fund.
    pub unique_holdings: Vec<i64>,
    /// Share of this fund's holdings that sit in the all-funds
    /// intersection.
    pub common_overlap_pct: f64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OverlapReport {
    /// Securities present in every selected fund.
    pub common_holdings: Vec<i64>,
    pub pairwise: Vec<PairwiseOverlap>,
    pub funds: Vec<FundOverlapSummary>,
    /// 100 − mean(per-fund overlap % against the all-funds intersection).
    pub diversification_score: f64,
}

/// Compare 2-5 funds' holdings sets.
pub fn analyze(funds: &[FundHoldingsSet]) -> Result<OverlapReport, RatingsError> {
    if funds.len() < MIN_FUNDS || funds.len() > MAX_FUNDS {
        return Err(RatingsError::InvalidInput(format!(
            "overlap comparison takes {MIN_FUNDS}-{MAX_FUNDS} funds, got {}",
            funds.len()
        )));
    }

    let sets: Vec<HashSet<i64>> = funds
        .iter()
        .map(|f| f.holdings.keys().copied().collect())
        .collect();

    // All-funds intersection
    let mut common: HashSet<i64> = sets[0].clone();
    for set in &sets[1..] {
        common.retain(|id| set.contains(id));
    }

    // Pairwise overlap
    let mut pairwise = Vec::new();
    for i in 0..funds.len() {
        for j in (i + 1)..funds.len() {
            let intersection: HashSet<i64> = sets[i].intersection(&sets[j]).copied().collect();
            let smaller = sets[i].len().min(sets[j].len());
            let overlap_pct = if smaller > 0 {
                round2(intersection.len() as f64 / smaller as f64 * 100.0)
            } else {
                0.0
            };
            let mut exclusive_to_pair: Vec<i64> = intersection
                .iter()
                .filter(|id| !common.contains(id))
                .copied()
                .collect();
            exclusive_to_pair.sort_unstable();
            pairwise.push(PairwiseOverlap {
                fund_a: funds[i].fund_id,
                fund_b: funds[j].fund_id,
                overlap_pct,
                exclusive_to_pair,
            });
        }
    }

    // Per-fund summaries and the diversification average
    let mut summaries = Vec::with_capacity(funds.len());
    let mut overlap_pct_sum = 0.0;
    for (idx, fund) in funds.iter().enumerate() {
        let unique: Vec<i64> = {
            let mut unique: Vec<i64> = sets[idx]
                .iter()
                .filter(|id| {
                    sets.iter()
                        .enumerate()
                        .all(|(other, set)| other == idx || !set.contains(id))
                })
                .copied()
                .collect();
            unique.sort_unstable();
            unique
        };

        let common_overlap_pct = if sets[idx].is_empty() {
            0.0
        } else {
            round2(common.len() as f64 / sets[idx].len() as f64 * 100.0)
        };
        overlap_pct_sum += common_overlap_pct;

        summaries.push(FundOverlapSummary {
            fund_id: fund.fund_id,
            fund_name: fund.fund_name.clone(),
            holdings_count: sets[idx].len(),
            unique_holdings: unique,
            common_overlap_pct,
        });
    }

    let mut common_holdings: Vec<i64> = common.into_iter().collect();
    common_holdings.sort_unstable();

    let diversification_score = round2(100.0 - overlap_pct_sum / funds.len() as f64);

    Ok(OverlapReport {
        common_holdings,
        pairwise,
        funds: summaries,
        diversification_score,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn fund(id: i64, name: &str, holdings: &[(i64, f64)]) -> FundHoldingsSet {
        FundHoldingsSet {
            fund_id: id,
            fund_name: name.to_string(),
            holdings: holdings.iter().copied().collect(),
        }
    }

    #[test]
    fn two_fund_overlap_matches_the_worked_example() {
        // A = {X:10%, Y:20%}, B = {X:5%, Z:30%}
        let a = fund(1, "Fund A", &[(100, 10.0), (101, 20.0)]);
        let b = fund(2, "Fund B", &[(100, 5.0), (102, 30.0)]);

        let report = analyze(&[a, b]).unwrap();
        assert_eq!(report.common_holdings, vec![100]);
        assert_eq!(report.pairwise.len(), 1);
        assert!((report.pairwise[0].overlap_pct - 50.0).abs() < 1e-9);
        assert!(report.pairwise[0].exclusive_to_pair.is_empty());
        assert_eq!(report.funds[0].unique_holdings, vec![101]);
        assert_eq!(report.funds[1].unique_holdings, vec![102]);
        // Each fund holds the single common stock as 1/2 of its set.
        assert!((report.diversification_score - 50.0).abs() < 1e-9);
    }

    #[test]
    fn exclusive_to_pair_excludes_the_global_intersection() {
        let a = fund(1, "A", &[(1, 10.0), (2, 10.0), (3, 10.0)]);
        let b = fund(2, "B", &[(1, 10.0), (2, 10.0), (4, 10.0)]);
        let c = fund(3, "C", &[(1, 10.0), (5, 10.0), (6, 10.0)]);

        let report = analyze(&[a, b, c]).unwrap();
        assert_eq!(report.common_holdings, vec![1]);

        let ab = report
            .pairwise
            .iter()
            .find(|p| p.fund_a == 1 && p.fund_b == 2)
            .unwrap();
        // {1,2} minus global {1} leaves {2}.
        assert_eq!(ab.exclusive_to_pair, vec![2]);
    }

    #[test]
    fn disjoint_funds_score_fully_diversified() {
        let a = fund(1, "A", &[(1, 50.0), (2, 50.0)]);
        let b = fund(2, "B", &[(3, 50.0), (4, 50.0)]);

        let report = analyze(&[a, b]).unwrap();
        assert!(report.common_holdings.is_empty());
        assert!((report.pairwise[0].overlap_pct - 0.0).abs() < 1e-9);
        assert!((report.diversification_score - 100.0).abs() < 1e-9);
    }

    #[test]
    fn identical_funds_score_zero_diversification() {
        let a = fund(1, "A", &[(1, 60.0), (2, 40.0)]);
        let b = fund(2, "B", &[(1, 30.0), (2, 70.0)]);

        let report = analyze(&[a, b]).unwrap();
        assert!((report.pairwise[0].overlap_pct - 100.0).abs() < 1e-9);
        assert!((report.diversification_score - 0.0).abs() < 1e-9);
    }

    #[test]
    fn fund_count_bounds_are_enforced() {
        let a = fund(1, "A", &[(1, 100.0)]);
        assert!(matches!(
            analyze(&[a.clone()]),
            Err(RatingsError::InvalidInput(_))
        ));

        let many: Vec<FundHoldingsSet> = (0..6).map(|i| fund(i, "F", &[(1, 100.0)])).collect();
        assert!(matches!(
            analyze(&many),
            Err(RatingsError::InvalidInput(_))
        ));
    }
}
