use crate::{cmd::connect_database, modules::migration::MIGRATOR};
use anyhow::{Context, Result};
use clap::Args;

#[derive(Debug, Args)]
pub struct MigrateArgs {}

pub async fn run(_args: MigrateArgs) -> Result<()> {
    let pool = connect_database().await?;

    MIGRATOR.run(&pool).await.with_context(|| {
        let message = "failed to apply migrations";
        tracing::error!(message);
        message
    })?;
    tracing::info!("Database migrations applied.");

    Ok(())
}
