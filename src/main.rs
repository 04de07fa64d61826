use anyhow::Result;
use tracing::info;
use tracing_subscriber::EnvFilter;

use actor_popularity_engine::config::AppConfig;
use actor_popularity_engine::popularity::normalize::FeatureWeights;
use actor_popularity_engine::{db, recalc_actor_popularity};

#[tokio::main]
async fn main() -> Result<()> {
    dotenvy::dotenv().ok();

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_target(false)
        .pretty()
        .init();

    let config = AppConfig::from_env()?;
    info!(host = %config.db_host, db = %config.db_name, "loaded configuration");

    let pool = db::connect(&config).await?;

    let version = recalc_actor_popularity(&pool, FeatureWeights::default(), "scheduled run").await?;
    info!(
        version_id = version.id,
        created_at = %version.created_at,
        "published new popularity version"
    );

    Ok(())
}
