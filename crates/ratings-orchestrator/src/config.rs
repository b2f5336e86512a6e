use serde::{Deserialize, Serialize};

/// Batch configuration, environment-driven with safe defaults.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OrchestratorConfig {
    pub database_url: String,
    /// Fixed pause between scored securities, for provider-backed runs.
    /// Zero disables pacing.
    pub pace_delay_ms: u64,
}

impl Default for OrchestratorConfig {
    fn default() -> Self {
        Self {
            database_url: "sqlite:ratings.db?mode=rwc".to_string(),
            pace_delay_ms: 0,
        }
    }
}

impl OrchestratorConfig {
    /// Load configuration from environment variables (reads .env first).
    pub fn from_env() -> Self {
        dotenvy::dotenv().ok();

        Self {
            database_url: std::env::var("RATINGS_DATABASE_URL")
                .unwrap_or_else(|_| "sqlite:ratings.db?mode=rwc".to_string()),
            pace_delay_ms: std::env::var("RATINGS_PACE_DELAY_MS")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(0),
        }
    }
}
