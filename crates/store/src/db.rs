use sqlx::postgres::PgPoolOptions;
use sqlx::PgPool;
use tracing::info;

use hearth_core::config::PostgresConfig;

/// Create the PostgreSQL connection pool and run migrations.
///
/// Fails fast when connection credentials are absent — the planner has no
/// degraded mode without its store.
pub async fn connect(config: &PostgresConfig) -> anyhow::Result<PgPool> {
    if !config.is_configured() {
        anyhow::bail!("PostgreSQL not configured (set PG_URL or PG_USERNAME/PG_PASSWORD)");
    }

    let pool = PgPoolOptions::new()
        .max_connections(config.max_connections)
        .connect(&config.connection_string())
        .await?;
    info!("PostgreSQL connected: {}", config.host);

    sqlx::migrate!("../../migrations").run(&pool).await?;
    info!("Database migrations applied");

    Ok(pool)
}
