use std::env;
use std::sync::Arc;

use color_eyre::eyre::WrapErr;
use oauth_data_migrator::MigrationContext;
use oauth_data_migrator::config::load_config;
use oauth_data_migrator::runner::{MigrationRunner, RunPolicy};
use sea_orm::Database;
use tracing_subscriber::{EnvFilter, fmt, layer::SubscriberExt, util::SubscriberInitExt};

fn initialize_standard_tracing() {
    let default_directives = "oauth_data_migrator=info,migration=info,sea_orm=warn";
    let env_filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_directives));

    let registry = tracing_subscriber::registry().with(env_filter);
    let layer = fmt::layer().with_target(true).with_level(true);

    registry.with(layer).init();
}

#[tokio::main]
async fn main() -> color_eyre::eyre::Result<()> {
    color_eyre::install()?;
    dotenvy::dotenv().ok();

    initialize_standard_tracing();

    let config_path = env::var("MIGRATION_CONFIG").unwrap_or_else(|_| "config.yaml".to_string());
    let config = load_config(&config_path)
        .wrap_err_with(|| format!("Failed to load configuration from {config_path}"))?;

    let db = Arc::new(
        Database::connect(&config.database_url)
            .await
            .wrap_err("Failed to connect to database")?,
    );

    let ctx = MigrationContext::from_config(db, &config);
    let mut runner = MigrationRunner::new(RunPolicy::from(&config));
    let report = runner.run(&ctx).await?;

    let failed = report.failed_steps();
    if failed.is_empty() {
        tracing::info!(steps = report.outcomes.len(), "OAuth data migration finished");
    } else {
        tracing::warn!(?failed, "OAuth data migration finished with tolerated failures");
    }
    Ok(())
}
