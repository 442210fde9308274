//! 一次性修复工具：删除 users 集合上遗留的 `userId_1` 索引
//!
//! ```bash
//! cargo run --bin fix-db-indexes
//! ```

use anyhow::{bail, Context, Result};
use clap::Parser;
use database::{
    maintenance::{DropOutcome, IndexMaintenance},
    Database,
};
use std::sync::Arc;
use tracing::{error, info};
use utils::{AppConfig, Logger};

#[tokio::main]
async fn main() -> Result<()> {
    utils::EnvLoader::load_env_file().ok();
    let config = Arc::new(AppConfig::parse());
    let _guard = Logger::init(&config);

    let db = Database::new(config.clone())
        .await
        .context("🔴 Failed to connect to MongoDB")?;
    db.ping().await.context("🔴 MongoDB is not reachable")?;

    let report = IndexMaintenance::new(&db)
        .repair()
        .await
        .context("🔴 Failed to repair indexes")?;

    match report.outcome {
        DropOutcome::Dropped => info!("✅ Legacy index removed, {} indexes remain", report.after.len()),
        DropOutcome::NotFound => info!("✅ Nothing to fix, {} indexes present", report.after.len()),
        DropOutcome::Failed(reason) => {
            error!("🔴 Legacy index could not be dropped, {} indexes present", report.after.len());
            bail!("failed to drop {}: {}", database::maintenance::LEGACY_USER_ID_INDEX, reason);
        }
    }

    Ok(())
}
