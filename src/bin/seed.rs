//! Demo data seeder
//!
//! Connects with the same configuration as the server, applies migrations,
//! wipes users, posts, groups and friendship requests, and loads the demo
//! data set.

use std::sync::Arc;

use anyhow::{Context, Result};
use rand::{rngs::StdRng, SeedableRng};
use tracing::info;

use social_api::application::services::Seeder;
use social_api::config::Settings;
use social_api::infrastructure::{database, repositories};
use social_api::shared::snowflake::SnowflakeGenerator;

#[tokio::main]
async fn main() -> Result<()> {
    let _ = dotenvy::dotenv();
    social_api::telemetry::init_tracing();

    let settings = Settings::load()?;
    let pool = database::create_pool(&settings.database)
        .await
        .context("Failed to connect to the database")?;
    info!("Connected to the database");

    database::run_migrations(&pool)
        .await
        .context("Failed to run database migrations")?;

    let id_generator = Arc::new(SnowflakeGenerator::new(
        u64::from(settings.snowflake.machine_id),
        1,
    ));
    let seeder = Seeder::new(repositories::postgres_repositories(pool.clone()), id_generator);

    let mut rng = StdRng::from_os_rng();
    let report = seeder.run(&mut rng).await.context("Seeding failed")?;

    info!(
        users = report.users,
        posts = report.posts,
        groups = report.groups,
        friendship_requests = report.friendship_requests,
        "Demo data loaded"
    );

    pool.close().await;
    Ok(())
}
