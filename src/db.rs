use sqlx::postgres::{PgConnectOptions, PgPoolOptions, PgSslMode};
use tracing::info;

use crate::config::AppConfig;

/// Builds a connection pool and applies pending migrations.
///
/// A single pool is sufficient here: the batch job is expected to run as
/// the only writer to `actors`/`popularity_versions` for the duration of
/// a run (§5, Database consistency).
pub async fn connect(config: &AppConfig) -> anyhow::Result<sqlx::PgPool> {
    let connect_options: PgConnectOptions = config.database_url().parse()?;
    let connect_options = connect_options.ssl_mode(PgSslMode::Prefer);

    let pool = PgPoolOptions::new()
        .max_connections(10)
        .connect_with(connect_options)
        .await?;

    info!(host = %config.db_host, db = %config.db_name, "connected to postgres");

    sqlx::migrate!("./migrations").run(&pool).await?;
    info!("schema migrations applied");

    Ok(pool)
}
