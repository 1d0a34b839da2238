use config::Config;
use sea_orm_migration::prelude::*;
use std::env;

#[tokio::main]
async fn main() {
    // Try to get DB URL from env first
    if env::var("DATABASE_URL").is_err() {
        // Fallback: load from the migrator's config file
        let path = env::var("MIGRATION_CONFIG").unwrap_or_else(|_| "config.yaml".to_string());
        let settings = Config::builder()
            .add_source(config::File::with_name(&path))
            .build();
        if let Ok(url) = settings.and_then(|s| s.get_string("database_url")) {
            env::set_var("DATABASE_URL", url);
        }
    }
    cli::run_cli(migration::Migrator).await;
}
