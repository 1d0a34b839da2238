//! One-shot migration of OAuth data to the v5.4.0 schema.
//!
//! Two sub-migrations run in order: consumer app token expiry times, then
//! OAuth2 scope names and role bindings. The [`runner::MigrationRunner`]
//! decides whether a failing sub-migration aborts the run.

use std::sync::Arc;

use sea_orm::DatabaseConnection;

use crate::config::MigrationConfig;
use crate::properties::PropertyReader;
use crate::registry::{ExpiryOverrideStore, RegistryExpiryOverrideStore};
use crate::repository::{OAuthRepository, SeaOrmOAuthRepository};
use crate::tenant::{SeaOrmTenantInventory, TenantInventory, TenantPolicy};

pub mod config;
pub mod entity;
pub mod error;
pub mod migrators;
pub mod model;
pub mod properties;
pub mod registry;
pub mod repository;
pub mod runner;
pub mod tenant;

/// Collaborators shared by every sub-migration of a run.
#[derive(Clone)]
pub struct MigrationContext {
    pub db: Arc<DatabaseConnection>,
    pub repository: Arc<dyn OAuthRepository>,
    pub overrides: Arc<dyn ExpiryOverrideStore>,
    pub properties: Arc<dyn PropertyReader>,
    pub tenants: Arc<dyn TenantInventory>,
    pub tenant_policy: TenantPolicy,
}

impl MigrationContext {
    /// Wire the SeaORM-backed collaborators for a configured run.
    pub fn from_config(db: Arc<DatabaseConnection>, config: &MigrationConfig) -> Self {
        Self {
            repository: Arc::new(SeaOrmOAuthRepository),
            overrides: Arc::new(RegistryExpiryOverrideStore::new(db.clone())),
            properties: Arc::new(config.identity.clone()),
            tenants: Arc::new(SeaOrmTenantInventory::new(db.clone())),
            tenant_policy: TenantPolicy::from(config),
            db,
        }
    }
}
