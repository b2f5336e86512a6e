use async_trait::async_trait;

use crate::{RatingsError, SchemeCandidate};

/// Maps a fund name to the identifier its NAV series is keyed by.
/// `Ok(None)` is the normal no-match outcome, not an error.
#[async_trait]
pub trait SchemeResolver: Send + Sync {
    async fn resolve(&self, fund_name: &str) -> Result<Option<String>, RatingsError>;
}

/// External scheme registry searched by the resolver.
#[async_trait]
pub trait SchemeRegistry: Send + Sync {
    async fn search(&self, query: &str) -> Result<Vec<SchemeCandidate>, RatingsError>;
}
