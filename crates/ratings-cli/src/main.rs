//! ratings-cli: batch driver for the scoring and aggregation pipeline.
//!
//! Usage:
//!   cargo run -p ratings-cli -- score               # score all securities
//!   cargo run -p ratings-cli -- aggregate           # rebuild fund aggregates
//!   cargo run -p ratings-cli -- refresh-cache       # rebuild the ratings cache
//!   cargo run -p ratings-cli -- refresh-all         # all three, in order
//!   cargo run -p ratings-cli -- compare 3 7 12      # holdings overlap report
//!
//! Options:
//!   --db URL    SQLite URL (default: RATINGS_DATABASE_URL or sqlite:ratings.db?mode=rwc)

use ratings_orchestrator::{OrchestratorConfig, RatingsOrchestrator};
use ratings_store::RatingsDb;

fn usage() {
    eprintln!("Usage:");
    eprintln!("  ratings-cli score           Score all securities from latest fundamentals");
    eprintln!("  ratings-cli aggregate       Rebuild fund-level weighted aggregates");
    eprintln!("  ratings-cli refresh-cache   Rebuild the materialized ratings cache");
    eprintln!("  ratings-cli refresh-all     Run score, aggregate, refresh-cache in order");
    eprintln!("  ratings-cli compare ID...   Compare 2-5 funds' holdings overlap");
    eprintln!();
    eprintln!("Options:");
    eprintln!("  --db URL    SQLite URL (default: RATINGS_DATABASE_URL)");
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| {
                "ratings_cli=info,ratings_orchestrator=info,fund_aggregator=info".into()
            }),
        )
        .init();

    let args: Vec<String> = std::env::args().collect();

    let mut config = OrchestratorConfig::from_env();
    if let Some(db_url) = args
        .iter()
        .position(|a| a == "--db")
        .and_then(|i| args.get(i + 1))
    {
        config.database_url = db_url.clone();
    }

    let command = match args.get(1).map(|s| s.as_str()) {
        Some(cmd) if !cmd.starts_with("--") => cmd.to_string(),
        _ => {
            usage();
            std::process::exit(1);
        }
    };

    let db = RatingsDb::new(&config.database_url).await?;
    let orchestrator = RatingsOrchestrator::new(db, config);

    match command.as_str() {
        "score" => {
            let summary = orchestrator.refresh_security_scores().await?;
            tracing::info!(
                "score: {} securities scored, {} failed",
                summary.processed,
                summary.failed
            );
        }
        "aggregate" => {
            let summary = orchestrator.refresh_fund_scores().await?;
            tracing::info!(
                "aggregate: {} funds rebuilt, {} failed",
                summary.processed,
                summary.failed
            );
        }
        "refresh-cache" => {
            let summary = orchestrator.refresh_ratings_cache().await?;
            tracing::info!(
                "refresh-cache: {} funds cached, {} failed",
                summary.processed,
                summary.failed
            );
        }
        "refresh-all" => {
            let scored = orchestrator.refresh_security_scores().await?;
            let aggregated = orchestrator.refresh_fund_scores().await?;
            let cached = orchestrator.refresh_ratings_cache().await?;
            tracing::info!(
                "refresh-all: {} scored, {} aggregated, {} cached",
                scored.processed,
                aggregated.processed,
                cached.processed
            );
        }
        "compare" => {
            let fund_ids: Vec<i64> = args[2..]
                .iter()
                .take_while(|a| !a.starts_with("--"))
                .filter_map(|a| a.parse().ok())
                .collect();
            if fund_ids.len() < 2 {
                eprintln!("compare needs 2-5 fund ids");
                std::process::exit(1);
            }
            let report = orchestrator.compare_funds(&fund_ids).await?;
            println!("{}", serde_json::to_string_pretty(&report)?);
        }
        other => {
            eprintln!("Unknown command: {other}");
            usage();
            std::process::exit(1);
        }
    }

    Ok(())
}
