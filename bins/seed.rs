//! Resets both user stores to the same three fixture users.

use anyhow::Context;
use configs::AppConfig;
use dotenvy::dotenv;
use migration::MigratorTrait;
use service::user::{seed::seed_test_data, Argon2Hasher};
use tracing::{error, info};

async fn run() -> anyhow::Result<()> {
    let cfg = AppConfig::load_and_validate().context("load configuration")?;
    // both stores are written regardless of the selected backend
    cfg.database.validate().context("seeding needs a database")?;

    let db = models::db::connect_with_config(&cfg.database).await?;
    migration::Migrator::up(&db, None).await.context("apply migrations")?;
    common::env::ensure_parent_dir(&cfg.storage.json_path).await?;

    let users = seed_test_data(&db, &cfg.storage.json_path, &Argon2Hasher::default()).await?;
    for u in &users {
        info!(user_id = %u.id(), email = %u.email(), "seeded");
    }
    Ok(())
}

#[tokio::main]
async fn main() -> std::process::ExitCode {
    dotenv().ok();
    common::utils::logging::init_logging_from_env();

    match run().await {
        Ok(()) => {
            info!(event = "seed_done", "test data written to database and json store");
            std::process::ExitCode::SUCCESS
        }
        Err(e) => {
            error!(event = "seed_failed", error = %format!("{e:#}"), "seeding failed");
            std::process::ExitCode::FAILURE
        }
    }
}
