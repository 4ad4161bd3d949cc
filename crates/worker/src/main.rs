use std::sync::Arc;

use anyhow::Context;
use pushtrack_core::{DependencySet, PushedAssetsCache};
use pushtrack_worker::config::{LogFormat, WorkerConfig};
use tokio::io::BufReader;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();

    let config = WorkerConfig::from_env()?;

    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| "pushtrack_worker=debug,pushtrack_core=info".into());
    match config.log_format {
        LogFormat::Json => tracing_subscriber::registry()
            .with(filter)
            .with(tracing_subscriber::fmt::layer().json().with_writer(std::io::stderr))
            .init(),
        LogFormat::Pretty => tracing_subscriber::registry()
            .with(filter)
            .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
            .init(),
    }

    let pool = pushtrack_db::create_pool(&config.database_url, config.max_connections)
        .await
        .context("Failed to connect to database")?;
    tracing::info!("Database connection pool created");

    pushtrack_db::health_check(&pool)
        .await
        .context("Database health check failed")?;
    pushtrack_db::run_migrations(&pool)
        .await
        .context("Failed to run database migrations")?;
    tracing::info!("Database migrations applied");

    let cache = Arc::new(PushedAssetsCache::new());
    let collaborators = pushtrack_db::collaborators(pool, cache);
    let mut set = DependencySet::new(
        collaborators,
        config.bundle_id.clone(),
        config.asset_type,
        config.is_download,
        config.is_publish,
    )
    .await;

    let report =
        pushtrack_worker::evaluate_candidates(&mut set, BufReader::new(tokio::io::stdin()))
            .await
            .context("Failed to read candidates from stdin")?;
    tracing::info!(
        bundle_id = %report.bundle_id,
        mode = %report.mode,
        evaluated = report.evaluated,
        skipped = report.skipped,
        included = report.included.len(),
        "Evaluation finished"
    );

    println!("{}", serde_json::to_string_pretty(&report)?);
    Ok(())
}
