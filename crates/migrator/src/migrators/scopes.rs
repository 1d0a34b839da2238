//! OAuth2 scope names and role bindings.
//!
//! The legacy `roles` column holds a comma-separated list; each entry becomes
//! one binding row. Scopes without a display name get their key as name.

use async_trait::async_trait;
use sea_orm::TransactionTrait;

use super::{MIGRATION_LOG, MigrationStep};
use crate::MigrationContext;
use crate::error::MigrationError;
use crate::model::{OAuth2Scope, OAuth2ScopeBinding, is_blank};

pub const STEP_NAME: &str = "oauth2_scopes";

const TABLE: &str = "OAuth2 Scope table";

/// What the scope migration writes back.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct ScopeChanges {
    pub bindings: Vec<OAuth2ScopeBinding>,
    /// Scopes whose name was filled in from their key.
    pub patched_scopes: Vec<OAuth2Scope>,
}

/// Split a roles string on `,` as is: no trimming, no deduplication, and
/// empty entries are kept.
pub fn split_roles(roles: &str) -> impl Iterator<Item = &str> {
    roles.split(',')
}

pub fn migrate_scopes(scopes: Vec<OAuth2Scope>) -> ScopeChanges {
    let mut changes = ScopeChanges::default();
    for mut scope in scopes {
        if let Some(roles) = scope.roles.as_deref().filter(|r| !is_blank(Some(*r))) {
            changes.bindings.extend(
                split_roles(roles).map(|role| OAuth2ScopeBinding::new(scope.scope_id, role)),
            );
        }
        if is_blank(scope.name.as_deref()) {
            scope.name = Some(scope.scope_key.clone());
            changes.patched_scopes.push(scope);
        }
    }
    changes
}

#[derive(Clone, Copy, Debug, Default)]
pub struct ScopeMigrator;

#[async_trait]
impl MigrationStep for ScopeMigrator {
    fn name(&self) -> &'static str {
        STEP_NAME
    }

    fn failure_message(&self) -> &'static str {
        "Error occurred while migrating OAuth2 scope data."
    }

    async fn migrate(&self, ctx: &MigrationContext) -> Result<(), MigrationError> {
        tracing::info!(target: "migration", "{MIGRATION_LOG}Migration starting on {TABLE}.");

        let txn = ctx.db.begin().await?;
        let scopes = ctx.repository.find_all_scopes(&txn).await?;
        txn.commit().await?;

        if scopes.is_empty() {
            tracing::info!(target: "migration", "{MIGRATION_LOG}No data to migrate in {TABLE}.");
            return Ok(());
        }

        let total = scopes.len();
        let changes = migrate_scopes(scopes);

        if !changes.bindings.is_empty() {
            let txn = ctx.db.begin().await?;
            ctx.repository
                .insert_scope_bindings(&txn, &changes.bindings)
                .await?;
            txn.commit().await?;
        }

        if !changes.patched_scopes.is_empty() {
            let txn = ctx.db.begin().await?;
            ctx.repository
                .update_scopes(&txn, &changes.patched_scopes)
                .await?;
            txn.commit().await?;
        }

        tracing::info!(
            target: "migration",
            total,
            bindings = changes.bindings.len(),
            renamed = changes.patched_scopes.len(),
            "{MIGRATION_LOG}Migration succeeded on {TABLE}."
        );
        Ok(())
    }
}
