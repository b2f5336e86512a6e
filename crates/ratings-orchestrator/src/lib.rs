//! Batch orchestration over the scoring pipeline: security scoring runs,
//! fund aggregation, ratings-cache refresh, fund comparison, and the
//! filterable read path. Every batch is sequential, idempotent, and
//! continues past per-unit failures, reporting a tally at the end.

mod config;

pub use config::OrchestratorConfig;

use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;

use anyhow::Result;
use chrono::Utc;
use fund_aggregator::FundAggregator;
use overlap_analyzer::{FundHoldingsSet, OverlapReport};
use ratings_core::{Fund, RatingsError, RefreshSummary, SchemeResolver, TrailingReturns};
use ratings_store::{
    FundRatingRow, FundRatingsFilter, InstrumentKind, RatingsDb, SecurityRatingRow,
    SecurityRatingsFilter,
};
use returns_engine::trailing_returns;
use serde::{Deserialize, Serialize};
use tracing::{info, warn};

/// Security read-path row augmented with multi-horizon CAGR.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SecurityRating {
    #[serde(flatten)]
    pub row: SecurityRatingRow,
    pub returns: TrailingReturns,
}

pub struct RatingsOrchestrator {
    db: RatingsDb,
    resolver: Option<Arc<dyn SchemeResolver>>,
    config: OrchestratorConfig,
}

impl RatingsOrchestrator {
    pub fn new(db: RatingsDb, config: OrchestratorConfig) -> Self {
        Self {
            db,
            resolver: None,
            config,
        }
    }

    /// Attach a scheme resolver for funds whose NAV series key is not
    /// already known.
    pub fn with_resolver(mut self, resolver: Arc<dyn SchemeResolver>) -> Self {
        self.resolver = Some(resolver);
        self
    }

    /// Score every security from its latest fundamentals and upsert one
    /// snapshot per security for today's date. A failing security is
    /// tallied and skipped; the run never aborts on one bad unit.
    pub async fn refresh_security_scores(&self) -> Result<RefreshSummary> {
        let securities = self.db.list_securities().await?;
        let score_date = Utc::now().date_naive();
        let total = securities.len();

        info!("scoring {total} securities for {score_date}");

        let mut processed = 0;
        let mut failed = 0;

        for security in &securities {
            match self.score_security(security.id).await {
                Ok(true) => processed += 1,
                Ok(false) => {
                    // No fundamentals yet — a data gap, not a failure.
                }
                Err(e) => {
                    failed += 1;
                    warn!(symbol = %security.symbol, "scoring failed: {e}");
                }
            }

            if self.config.pace_delay_ms > 0 {
                tokio::time::sleep(Duration::from_millis(self.config.pace_delay_ms)).await;
            }
        }

        info!("✅ scoring run complete: {processed}/{total} scored, {failed} failed");
        Ok(RefreshSummary::new(processed, failed))
    }

    async fn score_security(&self, security_id: i64) -> Result<bool> {
        let Some(raw) = self.db.latest_fundamentals(security_id).await? else {
            return Ok(false);
        };
        let scores = score_engine::score_fundamentals(&raw);
        self.db
            .upsert_quality_scores(security_id, Utc::now().date_naive(), &scores)
            .await?;
        Ok(true)
    }

    /// Rebuild every fund's weighted aggregate from the latest snapshots.
    pub async fn refresh_fund_scores(&self) -> Result<RefreshSummary> {
        FundAggregator::new(self.db.clone()).rebuild_all().await
    }

    /// Rebuild the materialized ratings cache: one row per aggregated
    /// fund, joined with trailing NAV returns.
    pub async fn refresh_ratings_cache(&self) -> Result<RefreshSummary> {
        let funds = self.db.list_funds().await?;

        let mut rows = Vec::with_capacity(funds.len());
        let mut failed = 0;

        for fund in &funds {
            match self.cache_row_for(fund).await {
                Ok(Some(row)) => rows.push(row),
                Ok(None) => {
                    // Not aggregated yet; the fund stays out of the cache.
                }
                Err(e) => {
                    failed += 1;
                    warn!(fund_id = fund.id, "cache row build failed: {e}");
                }
            }
        }

        let written = self.db.rebuild_ratings_cache(&rows).await?;
        info!("✅ ratings cache refreshed: {written} funds, {failed} failed");
        Ok(RefreshSummary::new(written, failed))
    }

    async fn cache_row_for(&self, fund: &Fund) -> Result<Option<FundRatingRow>> {
        let Some(quality) = self.db.fund_quality(fund.id).await? else {
            return Ok(None);
        };

        let returns = match self.nav_series_key(fund).await? {
            Some(key) => {
                let series = self.db.price_series(InstrumentKind::Fund, &key).await?;
                trailing_returns(&series)
            }
            None => TrailingReturns::default(),
        };

        Ok(Some(FundRatingRow {
            fund_id: fund.id,
            fund_name: fund.name.clone(),
            fund_house: fund.fund_house.clone(),
            overall: quality.overall,
            profitability: quality.profitability,
            financial_strength: quality.financial_strength,
            earnings_quality: quality.earnings_quality,
            growth: quality.growth,
            valuation: quality.valuation,
            piotroski_avg: quality.piotroski_avg,
            altman_z_avg: quality.altman_z_avg,
            magic_formula: quality.magic_formula,
            canslim: quality.canslim,
            coverage_pct: quality.coverage_pct,
            holdings_count: quality.holdings_count,
            cagr_1y: returns.one_year,
            cagr_3y: returns.three_year,
            cagr_5y: returns.five_year,
            cagr_10y: returns.ten_year,
            refreshed_at: Utc::now(),
        }))
    }

    /// NAV series key: the stored scheme code wins; otherwise ask the
    /// resolver. An unresolved fund is a normal outcome — its CAGR
    /// columns stay null.
    async fn nav_series_key(&self, fund: &Fund) -> Result<Option<String>> {
        if let Some(code) = &fund.scheme_code {
            return Ok(Some(code.clone()));
        }
        match &self.resolver {
            Some(resolver) => resolver
                .resolve(&fund.name)
                .await
                .map_err(anyhow::Error::from),
            None => Ok(None),
        }
    }

    /// Compare 2-5 funds' matched equity holdings.
    pub async fn compare_funds(&self, fund_ids: &[i64]) -> Result<OverlapReport> {
        let mut sets = Vec::with_capacity(fund_ids.len());
        for &fund_id in fund_ids {
            let fund = self
                .db
                .get_fund(fund_id)
                .await?
                .ok_or_else(|| RatingsError::NotFound(format!("fund {fund_id}")))?;

            let holdings: HashMap<i64, f64> = self
                .db
                .holdings_for_fund(fund_id)
                .await?
                .into_iter()
                .filter_map(|h| h.security_id.map(|id| (id, h.weight_pct)))
                .collect();

            sets.push(FundHoldingsSet {
                fund_id,
                fund_name: fund.name,
                holdings,
            });
        }

        Ok(overlap_analyzer::analyze(&sets)?)
    }

    /// Cached fund ratings, filtered and sorted.
    pub async fn fund_ratings(&self, filter: &FundRatingsFilter) -> Result<Vec<FundRatingRow>> {
        self.db.query_fund_ratings(filter).await
    }

    /// Latest security ratings, each row augmented with trailing price
    /// CAGR.
    pub async fn security_ratings(
        &self,
        filter: &SecurityRatingsFilter,
    ) -> Result<Vec<SecurityRating>> {
        let rows = self.db.query_security_ratings(filter).await?;

        let mut rated = Vec::with_capacity(rows.len());
        for row in rows {
            let series = self
                .db
                .price_series(InstrumentKind::Security, &row.symbol)
                .await?;
            rated.push(SecurityRating {
                returns: trailing_returns(&series),
                row,
            });
        }
        Ok(rated)
    }
}
