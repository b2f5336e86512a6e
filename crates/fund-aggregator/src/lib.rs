//! Fund-level aggregation: join each fund's holdings against the latest
//! security score snapshots and compute holding-weighted averages plus
//! coverage. The aggregate table is rebuilt in full on every run, which
//! keeps reruns idempotent at the fund counts this system serves.

use std::collections::HashMap;

use anyhow::Result;
use ratings_core::{FundHolding, FundQualityScore, QualityScores, RefreshSummary};
use ratings_store::RatingsDb;
use score_engine::{round2, weighted_score};
use tracing::{info, warn};

/// Funds whose holding weights stray outside 100 ± this many points get
/// flagged; the weighted means stay correct either way because the
/// denominator renormalizes.
const WEIGHT_SUM_TOLERANCE: f64 = 5.0;

fn has_any_score(scores: &QualityScores) -> bool {
    scores.piotroski.is_some()
        || scores.altman_z.is_some()
        || scores.magic_formula.is_some()
        || scores.canslim.is_some()
        || scores.profitability.is_some()
        || scores.financial_strength.is_some()
        || scores.earnings_quality.is_some()
        || scores.growth.is_some()
        || scores.valuation.is_some()
        || scores.overall.is_some()
}

/// Weighted aggregate of one fund's holdings. A holding without a
/// security match, or without a particular score field, drops out of
/// that field's average only — it never blocks the other fields.
pub fn aggregate_holdings(
    fund_id: i64,
    holdings: &[FundHolding],
    scores_by_security: &HashMap<i64, QualityScores>,
) -> FundQualityScore {
    let weight_sum: f64 = holdings.iter().map(|h| h.weight_pct).sum();
    if !holdings.is_empty() && (weight_sum - 100.0).abs() > WEIGHT_SUM_TOLERANCE {
        warn!(
            fund_id,
            weight_sum, "fund holding weights do not sum to ~100%"
        );
    }

    let mut coverage = 0.0;
    let mut components: Vec<(&QualityScores, f64)> = Vec::with_capacity(holdings.len());

    for holding in holdings {
        let Some(security_id) = holding.security_id else {
            continue;
        };
        let Some(scores) = scores_by_security.get(&security_id) else {
            continue;
        };
        if has_any_score(scores) {
            coverage += holding.weight_pct;
        }
        components.push((scores, holding.weight_pct));
    }

    let field = |get: fn(&QualityScores) -> Option<f64>| -> Option<f64> {
        let weighted: Vec<(Option<f64>, f64)> =
            components.iter().map(|(s, w)| (get(s), *w)).collect();
        weighted_score(&weighted)
    };

    FundQualityScore {
        fund_id,
        piotroski_avg: field(|s| s.piotroski.map(|p| p as f64)),
        altman_z_avg: field(|s| s.altman_z),
        magic_formula: field(|s| s.magic_formula),
        canslim: field(|s| s.canslim),
        profitability: field(|s| s.profitability),
        financial_strength: field(|s| s.financial_strength),
        earnings_quality: field(|s| s.earnings_quality),
        growth: field(|s| s.growth),
        valuation: field(|s| s.valuation),
        overall: field(|s| s.overall),
        coverage_pct: round2(coverage),
        holdings_count: holdings.len() as i64,
    }
}

pub struct FundAggregator {
    db: RatingsDb,
}

impl FundAggregator {
    pub fn new(db: RatingsDb) -> Self {
        Self { db }
    }

    /// Rebuild every fund's aggregate row from the latest score
    /// snapshots. One fund failing is logged and tallied; the run
    /// continues with the rest.
    pub async fn rebuild_all(&self) -> Result<RefreshSummary> {
        let funds = self.db.list_funds().await?;
        let scores = self.db.latest_scores().await?;

        let mut processed = 0;
        let mut failed = 0;

        for fund in &funds {
            match self.rebuild_fund(fund.id, &scores).await {
                Ok(()) => processed += 1,
                Err(e) => {
                    failed += 1;
                    warn!(fund_id = fund.id, "fund aggregation failed: {e}");
                }
            }
        }

        info!(
            "fund aggregation complete: {processed} funds rebuilt, {failed} failed"
        );
        Ok(RefreshSummary::new(processed, failed))
    }

    async fn rebuild_fund(
        &self,
        fund_id: i64,
        scores: &HashMap<i64, QualityScores>,
    ) -> Result<()> {
        let holdings = self.db.holdings_for_fund(fund_id).await?;
        let aggregate = aggregate_holdings(fund_id, &holdings, scores);
        self.db.upsert_fund_quality(&aggregate).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;
    use ratings_store::{NewFund, NewSecurity};

    fn holding(fund_id: i64, security_id: Option<i64>, weight_pct: f64) -> FundHolding {
        FundHolding {
            fund_id,
            instrument_name: "Holding".to_string(),
            security_id,
            weight_pct,
        }
    }

    fn overall_only(overall: Option<f64>) -> QualityScores {
        QualityScores {
            overall,
            ..Default::default()
        }
    }

    #[test]
    fn missing_score_renormalizes_and_caps_coverage() {
        // 60%/40% split, overall 80/None: the average renormalizes to the
        // scored holding and coverage reflects only the scored weight.
        let scores: HashMap<i64, QualityScores> = [
            (1, overall_only(Some(80.0))),
            (2, overall_only(None)),
        ]
        .into_iter()
        .collect();
        let holdings = [holding(9, Some(1), 60.0), holding(9, Some(2), 40.0)];

        let aggregate = aggregate_holdings(9, &holdings, &scores);
        assert_eq!(aggregate.overall, Some(80.0));
        assert!((aggregate.coverage_pct - 60.0).abs() < 1e-9);
        assert_eq!(aggregate.holdings_count, 2);
    }

    #[test]
    fn unmatched_holdings_do_not_block_other_fields() {
        let scores: HashMap<i64, QualityScores> = [
            (
                1,
                QualityScores {
                    overall: Some(70.0),
                    piotroski: Some(8),
                    ..Default::default()
                },
            ),
            (
                2,
                QualityScores {
                    overall: Some(50.0),
                    ..Default::default()
                },
            ),
        ]
        .into_iter()
        .collect();
        let holdings = [
            holding(9, Some(1), 30.0),
            holding(9, Some(2), 30.0),
            holding(9, None, 40.0), // cash / unmatched debt
        ];

        let aggregate = aggregate_holdings(9, &holdings, &scores);
        assert_eq!(aggregate.overall, Some(60.0));
        // Piotroski present only on the first holding.
        assert_eq!(aggregate.piotroski_avg, Some(8.0));
        assert!((aggregate.coverage_pct - 60.0).abs() < 1e-9);
        assert_eq!(aggregate.holdings_count, 3);
    }

    #[test]
    fn weighted_average_weights_by_nav_share() {
        let scores: HashMap<i64, QualityScores> = [
            (1, overall_only(Some(90.0))),
            (2, overall_only(Some(40.0))),
        ]
        .into_iter()
        .collect();
        let holdings = [holding(9, Some(1), 75.0), holding(9, Some(2), 25.0)];

        let aggregate = aggregate_holdings(9, &holdings, &scores);
        assert_eq!(aggregate.overall, Some(77.5));
    }

    #[test]
    fn empty_fund_yields_empty_aggregate() {
        let aggregate = aggregate_holdings(9, &[], &HashMap::new());
        assert_eq!(aggregate.overall, None);
        assert_eq!(aggregate.coverage_pct, 0.0);
        assert_eq!(aggregate.holdings_count, 0);
    }

    async fn seed_fund(db: &RatingsDb) -> i64 {
        let date = NaiveDate::from_ymd_opt(2026, 8, 1).unwrap();
        let mut security_ids = Vec::new();
        for (symbol, overall) in [("AAA", 80.0), ("BBB", 60.0)] {
            let id = db
                .upsert_security(&NewSecurity {
                    symbol: symbol.to_string(),
                    name: symbol.to_string(),
                    sector: None,
                    industry: None,
                    market_cap: None,
                })
                .await
                .unwrap();
            db.upsert_quality_scores(id, date, &overall_only(Some(overall)))
                .await
                .unwrap();
            security_ids.push(id);
        }

        let fund_id = db
            .insert_fund(&NewFund {
                name: "Seeded Fund".to_string(),
                fund_house: None,
                scheme_code: None,
            })
            .await
            .unwrap();
        db.insert_holding(&holding(fund_id, Some(security_ids[0]), 50.0))
            .await
            .unwrap();
        db.insert_holding(&holding(fund_id, Some(security_ids[1]), 50.0))
            .await
            .unwrap();
        fund_id
    }

    #[tokio::test]
    async fn rebuild_is_idempotent() {
        let db = RatingsDb::new("sqlite::memory:").await.unwrap();
        let fund_id = seed_fund(&db).await;

        let aggregator = FundAggregator::new(db.clone());
        let first = aggregator.rebuild_all().await.unwrap();
        assert_eq!(first.processed, 1);
        assert_eq!(first.failed, 0);
        let first_row = db.fund_quality(fund_id).await.unwrap().unwrap();

        let second = aggregator.rebuild_all().await.unwrap();
        assert_eq!(second.processed, 1);
        let second_row = db.fund_quality(fund_id).await.unwrap().unwrap();

        assert_eq!(first_row, second_row);
        assert_eq!(first_row.overall, Some(70.0));
        assert!((first_row.coverage_pct - 100.0).abs() < 1e-9);
    }
}
