//! Tenant scoping for the migration.

use std::collections::HashSet;
use std::fmt;
use std::sync::Arc;

use async_trait::async_trait;
use sea_orm::{ColumnTrait, DatabaseConnection, DbErr, EntityTrait, QueryFilter, QuerySelect};

use crate::config::MigrationConfig;
use crate::entity::tenant;

/// Supplies the tenant sets the filter needs.
#[async_trait]
pub trait TenantInventory: Send + Sync {
    async fn inactive_tenants(&self) -> Result<HashSet<i32>, DbErr>;

    /// Known tenant ids within `start..=end`.
    async fn tenants_in_range(&self, start: i32, end: i32) -> Result<HashSet<i32>, DbErr>;
}

/// Reads tenants from `um_tenant`.
#[derive(Clone)]
pub struct SeaOrmTenantInventory {
    db: Arc<DatabaseConnection>,
}

impl SeaOrmTenantInventory {
    pub fn new(db: Arc<DatabaseConnection>) -> Self {
        Self { db }
    }
}

#[async_trait]
impl TenantInventory for SeaOrmTenantInventory {
    async fn inactive_tenants(&self) -> Result<HashSet<i32>, DbErr> {
        let ids: Vec<i32> = tenant::Entity::find()
            .select_only()
            .column(tenant::Column::UmId)
            .filter(tenant::Column::UmActive.eq(false))
            .into_tuple()
            .all(self.db.as_ref())
            .await?;
        Ok(ids.into_iter().collect())
    }

    async fn tenants_in_range(&self, start: i32, end: i32) -> Result<HashSet<i32>, DbErr> {
        let ids: Vec<i32> = tenant::Entity::find()
            .select_only()
            .column(tenant::Column::UmId)
            .filter(tenant::Column::UmId.between(start, end))
            .into_tuple()
            .all(self.db.as_ref())
            .await?;
        Ok(ids.into_iter().collect())
    }
}

/// Tenant sets given up front.
#[derive(Clone, Debug, Default)]
pub struct StaticTenantInventory {
    pub inactive: HashSet<i32>,
    pub tenants: HashSet<i32>,
}

#[async_trait]
impl TenantInventory for StaticTenantInventory {
    async fn inactive_tenants(&self) -> Result<HashSet<i32>, DbErr> {
        Ok(self.inactive.clone())
    }

    async fn tenants_in_range(&self, start: i32, end: i32) -> Result<HashSet<i32>, DbErr> {
        Ok(self
            .tenants
            .iter()
            .copied()
            .filter(|id| (start..=end).contains(id))
            .collect())
    }
}

/// The two tenant flags of a run.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct TenantPolicy {
    pub ignore_for_inactive_tenants: bool,
    /// Inclusive id range, when the run is restricted to one.
    pub tenant_range: Option<(i32, i32)>,
}

impl From<&MigrationConfig> for TenantPolicy {
    fn from(config: &MigrationConfig) -> Self {
        Self {
            ignore_for_inactive_tenants: config.ignore_for_inactive_tenants,
            tenant_range: config
                .tenant_range
                .enabled
                .then_some((config.tenant_range.start, config.tenant_range.end)),
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum SkipReason {
    Inactive,
    OutOfRange,
}

impl fmt::Display for SkipReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SkipReason::Inactive => f.write_str("inactive tenant"),
            SkipReason::OutOfRange => f.write_str("tenant out of migration range"),
        }
    }
}

/// Decides whether a tenant's rows are migrated.
#[derive(Clone, Debug, Default)]
pub struct TenantFilter {
    ignore_inactive: bool,
    inactive: HashSet<i32>,
    restrict_to_range: bool,
    in_range: HashSet<i32>,
}

impl TenantFilter {
    pub fn new(
        ignore_inactive: bool,
        inactive: HashSet<i32>,
        restrict_to_range: bool,
        in_range: HashSet<i32>,
    ) -> Self {
        Self {
            ignore_inactive,
            inactive,
            restrict_to_range,
            in_range,
        }
    }

    /// Build the filter once for a sub-migration. Tenant sets are only
    /// fetched for the checks the policy enables.
    pub async fn load(policy: TenantPolicy, inventory: &dyn TenantInventory) -> Result<Self, DbErr> {
        let inactive = if policy.ignore_for_inactive_tenants {
            inventory.inactive_tenants().await?
        } else {
            HashSet::new()
        };
        let in_range = match policy.tenant_range {
            Some((start, end)) => inventory.tenants_in_range(start, end).await?,
            None => HashSet::new(),
        };
        Ok(Self::new(
            policy.ignore_for_inactive_tenants,
            inactive,
            policy.tenant_range.is_some(),
            in_range,
        ))
    }

    /// Why the tenant is skipped, if it is. Inactivity is reported first when
    /// both checks apply.
    pub fn skip_reason(&self, tenant_id: i32) -> Option<SkipReason> {
        if self.ignore_inactive && self.inactive.contains(&tenant_id) {
            return Some(SkipReason::Inactive);
        }
        if self.restrict_to_range && !self.in_range.contains(&tenant_id) {
            return Some(SkipReason::OutOfRange);
        }
        None
    }

    /// Same as [`Self::skip_reason`] but logs the skip against `table`.
    pub fn admits(&self, tenant_id: i32, table: &str) -> bool {
        match self.skip_reason(tenant_id) {
            Some(reason) => {
                tracing::info!(
                    target: "migration",
                    tenant_id,
                    %reason,
                    "Skipping {table} migration for tenant {tenant_id} ({reason})"
                );
                false
            }
            None => true,
        }
    }
}
