//! Fund-name to NAV-series identifier resolution.
//!
//! The CAGR core stays a pure function; resolution sits behind the
//! `SchemeResolver` trait so read paths can plug in whatever registry the
//! deployment uses. The default implementation fuzzy-ranks registry
//! candidates and prefers the direct-plan growth variant of a scheme,
//! since that is the series fund returns are conventionally quoted on.

use async_trait::async_trait;
use fuzzy_matcher::skim::SkimMatcherV2;
use fuzzy_matcher::FuzzyMatcher;

use ratings_core::{RatingsError, SchemeCandidate, SchemeRegistry, SchemeResolver};

/// Preference order among fuzzy matches:
/// Direct-Plan + Growth > Growth-only > Direct-only > best fuzzy score.
pub struct FuzzySchemeResolver<R> {
    registry: R,
    matcher: SkimMatcherV2,
}

impl<R> FuzzySchemeResolver<R> {
    pub fn new(registry: R) -> Self {
        Self {
            registry,
            matcher: SkimMatcherV2::default(),
        }
    }
}

fn has_direct(name: &str) -> bool {
    name.to_lowercase().contains("direct")
}

fn has_growth(name: &str) -> bool {
    name.to_lowercase().contains("growth")
}

fn pick<'a>(ranked: &'a [SchemeCandidate]) -> Option<&'a SchemeCandidate> {
    ranked
        .iter()
        .find(|c| has_direct(&c.scheme_name) && has_growth(&c.scheme_name))
        .or_else(|| ranked.iter().find(|c| has_growth(&c.scheme_name)))
        .or_else(|| ranked.iter().find(|c| has_direct(&c.scheme_name)))
        .or_else(|| ranked.first())
}

#[async_trait]
impl<R: SchemeRegistry> SchemeResolver for FuzzySchemeResolver<R> {
    async fn resolve(&self, fund_name: &str) -> Result<Option<String>, RatingsError> {
        let candidates = self.registry.search(fund_name).await?;

        let mut ranked: Vec<(i64, SchemeCandidate)> = candidates
            .into_iter()
            .filter_map(|c| {
                self.matcher
                    .fuzzy_match(&c.scheme_name, fund_name)
                    .map(|score| (score, c))
            })
            .collect();
        ranked.sort_by(|a, b| b.0.cmp(&a.0));

        let ranked: Vec<SchemeCandidate> = ranked.into_iter().map(|(_, c)| c).collect();
        Ok(pick(&ranked).map(|c| c.scheme_code.clone()))
    }
}
