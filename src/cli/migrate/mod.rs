//! Migrate command

use anyhow::Context;
use tracing::info;

use crate::config::AppConfig;
use crate::infrastructure::storage::{run_migrations, PostgresMigrator, StorageConfig};

pub async fn run(config: AppConfig) -> anyhow::Result<()> {
    let storage = config
        .storage
        .to_storage_config()
        .map_err(anyhow::Error::msg)?;

    let StorageConfig::Postgres(pg_config) = storage else {
        anyhow::bail!("migrate requires storage.backend = \"postgres\"");
    };

    let pool = pg_config.connect().await.context("Failed to connect")?;
    run_migrations(&pool).await?;

    let version = PostgresMigrator::new(pool).current_version().await?;
    info!(version = ?version, "Schema is up to date");

    Ok(())
}
