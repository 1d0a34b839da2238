use serde::Deserialize;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Configuration build error: {0}")]
    Build(#[from] config::ConfigError),
    #[error("Invalid configuration: {0}")]
    Validation(String),
}

/// Restricts the migration to tenants whose id lies in `start..=end`.
#[derive(Clone, Debug, Default, Deserialize)]
pub struct TenantRangeConfig {
    #[serde(default)]
    pub enabled: bool,
    #[serde(default)]
    pub start: i32,
    #[serde(default)]
    pub end: i32,
}

/// Identity server properties that seed the global token expiry defaults.
///
/// Values are kept as raw strings; they are parsed when the consumer app
/// migration runs so a bad value fails that sub-migration only.
#[derive(Clone, Debug, Default, Deserialize)]
pub struct IdentityProperties {
    pub access_token_default_validity_period: Option<String>,
    pub user_access_token_default_validity_period: Option<String>,
    pub refresh_token_validity_period: Option<String>,
}

#[derive(Clone, Debug, Deserialize)]
pub struct MigrationConfig {
    pub database_url: String,
    /// Log a failed sub-migration and carry on with the next one.
    #[serde(default)]
    pub continue_on_error: bool,
    /// Only report what would run; never touch the store.
    #[serde(default)]
    pub dry_run: bool,
    #[serde(default)]
    pub ignore_for_inactive_tenants: bool,
    #[serde(default)]
    pub tenant_range: TenantRangeConfig,
    #[serde(default)]
    pub identity: IdentityProperties,
}

impl MigrationConfig {
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.database_url.trim().is_empty() {
            return Err(ConfigError::Validation("database_url must not be empty".into()));
        }
        if self.tenant_range.enabled && self.tenant_range.start > self.tenant_range.end {
            return Err(ConfigError::Validation(format!(
                "tenant_range.start ({}) must not exceed tenant_range.end ({})",
                self.tenant_range.start, self.tenant_range.end
            )));
        }
        Ok(())
    }
}

/// Load migration configuration from a YAML file + environment overrides.
///
/// Any environment variable matching the key path separated by double
/// underscores (e.g. `TENANT_RANGE__ENABLED`) overrides the file value.
pub fn load_config(path: &str) -> Result<MigrationConfig, ConfigError> {
    use config::{Config, Environment, File};
    let cfg = Config::builder()
        .add_source(File::with_name(path))
        .add_source(Environment::default().separator("__"))
        .build()?;

    let migration: MigrationConfig = cfg.try_deserialize()?;
    migration.validate()?;

    Ok(migration)
}
