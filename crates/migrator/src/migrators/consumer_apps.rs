//! Token expiry times of OAuth consumer apps.
//!
//! Each in-scope app gets its three expiry times from its registry override
//! when one exists, otherwise from the server-wide defaults.

use async_trait::async_trait;
use sea_orm::TransactionTrait;

use super::{MIGRATION_LOG, MigrationStep};
use crate::MigrationContext;
use crate::error::MigrationError;
use crate::model::{ExpiryOverride, OAuthConsumerApp, is_blank};
use crate::properties::{
    ACCESS_TOKEN_DEFAULT_VALIDITY_PERIOD, PropertyReader, REFRESH_TOKEN_VALIDITY_PERIOD,
    USER_ACCESS_TOKEN_DEFAULT_VALIDITY_PERIOD,
};
use crate::registry::ExpiryOverrideStore;
use crate::tenant::TenantFilter;

pub const STEP_NAME: &str = "oauth_consumer_apps";

const TABLE: &str = "OAuth2 consumer apps table";

pub const DEFAULT_APPLICATION_ACCESS_TOKEN_EXPIRY: i64 = 3600;
pub const DEFAULT_USER_ACCESS_TOKEN_EXPIRY: i64 = 3600;
pub const DEFAULT_REFRESH_TOKEN_EXPIRY: i64 = 84600;

/// Server-wide expiry times in seconds.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct ExpiryDefaults {
    pub application_access_token: i64,
    pub user_access_token: i64,
    pub refresh_token: i64,
}

impl Default for ExpiryDefaults {
    fn default() -> Self {
        Self {
            application_access_token: DEFAULT_APPLICATION_ACCESS_TOKEN_EXPIRY,
            user_access_token: DEFAULT_USER_ACCESS_TOKEN_EXPIRY,
            refresh_token: DEFAULT_REFRESH_TOKEN_EXPIRY,
        }
    }
}

impl ExpiryDefaults {
    /// Apply configured properties over the built-in defaults. A property
    /// that is set but not a non-negative integer is an error.
    pub fn resolve(properties: &dyn PropertyReader) -> Result<Self, MigrationError> {
        let defaults = Self::default();
        Ok(Self {
            application_access_token: seconds_property(
                properties,
                ACCESS_TOKEN_DEFAULT_VALIDITY_PERIOD,
                defaults.application_access_token,
            )?,
            user_access_token: seconds_property(
                properties,
                USER_ACCESS_TOKEN_DEFAULT_VALIDITY_PERIOD,
                defaults.user_access_token,
            )?,
            refresh_token: seconds_property(
                properties,
                REFRESH_TOKEN_VALIDITY_PERIOD,
                defaults.refresh_token,
            )?,
        })
    }
}

fn seconds_property(
    properties: &dyn PropertyReader,
    name: &'static str,
    fallback: i64,
) -> Result<i64, MigrationError> {
    let value = properties.property(name);
    if is_blank(value.as_deref()) {
        return Ok(fallback);
    }
    let value = value.unwrap_or_default();
    let seconds = value
        .trim()
        .parse::<i64>()
        .map_err(|source| MigrationError::InvalidProperty {
            name,
            value: value.clone(),
            source,
        })?;
    if seconds < 0 {
        return Err(MigrationError::NegativeProperty {
            name,
            value: seconds,
        });
    }
    Ok(seconds)
}

/// Set the three expiry times of `app`.
///
/// The user and refresh token times are taken from the override's
/// *application* token value, not from their own override fields.
// TODO: read the user/refresh override fields once copying the application value is confirmed unintended
pub fn apply_expiry_times(
    app: &mut OAuthConsumerApp,
    expiry: Option<&ExpiryOverride>,
    defaults: &ExpiryDefaults,
) {
    let application_seconds =
        expiry.and_then(|e| e.application_access_token_expiry_ms.map(|ms| ms / 1000));

    app.application_access_token_expiry_time =
        application_seconds.unwrap_or(defaults.application_access_token);
    app.user_access_token_expiry_time = application_seconds.unwrap_or(defaults.user_access_token);
    app.refresh_token_expiry_time = application_seconds.unwrap_or(defaults.refresh_token);
}

/// Compute the rows to persist. Apps of filtered-out tenants are dropped
/// without an override lookup; every other app is returned, updated.
#[tracing::instrument(skip_all, fields(apps = apps.len()))]
pub async fn migrate_consumer_apps(
    apps: Vec<OAuthConsumerApp>,
    filter: &TenantFilter,
    overrides: &dyn ExpiryOverrideStore,
    defaults: &ExpiryDefaults,
) -> Result<Vec<OAuthConsumerApp>, MigrationError> {
    let mut updated = Vec::with_capacity(apps.len());
    for mut app in apps {
        if !filter.admits(app.tenant_id, TABLE) {
            continue;
        }
        let expiry = overrides.lookup(&app.consumer_key, app.tenant_id).await?;
        apply_expiry_times(&mut app, expiry.as_ref(), defaults);
        updated.push(app);
    }
    Ok(updated)
}

#[derive(Clone, Copy, Debug, Default)]
pub struct ConsumerAppExpiryMigrator;

#[async_trait]
impl MigrationStep for ConsumerAppExpiryMigrator {
    fn name(&self) -> &'static str {
        STEP_NAME
    }

    fn failure_message(&self) -> &'static str {
        "Error occurred while migrating OAuth consumer apps."
    }

    async fn migrate(&self, ctx: &MigrationContext) -> Result<(), MigrationError> {
        tracing::info!(target: "migration", "{MIGRATION_LOG}Migration starting on {TABLE}.");

        let txn = ctx.db.begin().await?;
        let apps = ctx.repository.find_all_consumer_apps(&txn).await?;
        txn.commit().await?;

        if apps.is_empty() {
            tracing::info!(target: "migration", "{MIGRATION_LOG}No data to migrate in {TABLE}.");
            return Ok(());
        }

        let defaults = ExpiryDefaults::resolve(ctx.properties.as_ref())?;
        let filter = TenantFilter::load(ctx.tenant_policy, ctx.tenants.as_ref()).await?;
        let total = apps.len();
        let updated =
            migrate_consumer_apps(apps, &filter, ctx.overrides.as_ref(), &defaults).await?;

        if !updated.is_empty() {
            let txn = ctx.db.begin().await?;
            ctx.repository
                .update_consumer_app_expiry_times(&txn, &updated)
                .await?;
            txn.commit().await?;
        }

        tracing::info!(
            target: "migration",
            total,
            updated = updated.len(),
            "{MIGRATION_LOG}Migration succeeded for {TABLE}."
        );
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::registry::StaticExpiryOverrideStore;
    use std::collections::{HashMap, HashSet};

    fn props(pairs: &[(&str, &str)]) -> HashMap<String, String> {
        pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect()
    }

    #[test]
    fn hard_coded_defaults_without_properties() {
        let defaults = ExpiryDefaults::resolve(&HashMap::<String, String>::new()).unwrap();
        assert_eq!(defaults, ExpiryDefaults::default());
        assert_eq!(defaults.application_access_token, 3600);
        assert_eq!(defaults.user_access_token, 3600);
        assert_eq!(defaults.refresh_token, 84600);
    }

    #[test]
    fn properties_override_defaults_and_blank_is_ignored() {
        let defaults = ExpiryDefaults::resolve(&props(&[
            (ACCESS_TOKEN_DEFAULT_VALIDITY_PERIOD, "1800"),
            (USER_ACCESS_TOKEN_DEFAULT_VALIDITY_PERIOD, "   "),
            (REFRESH_TOKEN_VALIDITY_PERIOD, "604800"),
        ]))
        .unwrap();
        assert_eq!(defaults.application_access_token, 1800);
        assert_eq!(defaults.user_access_token, 3600);
        assert_eq!(defaults.refresh_token, 604800);
    }

    #[test]
    fn non_numeric_property_is_a_configuration_error() {
        let err =
            ExpiryDefaults::resolve(&props(&[(REFRESH_TOKEN_VALIDITY_PERIOD, "one day")]))
                .unwrap_err();
        assert!(err.is_configuration());
        assert!(err.to_string().contains(REFRESH_TOKEN_VALIDITY_PERIOD));

        let err = ExpiryDefaults::resolve(&props(&[(ACCESS_TOKEN_DEFAULT_VALIDITY_PERIOD, "-5")]))
            .unwrap_err();
        assert!(matches!(err, MigrationError::NegativeProperty { value: -5, .. }));
        assert!(err.is_configuration());
    }

    #[test]
    fn out_of_range_property_is_a_configuration_error() {
        let err = ExpiryDefaults::resolve(&props(&[(
            REFRESH_TOKEN_VALIDITY_PERIOD,
            "18446744073709551615",
        )]))
        .unwrap_err();
        assert!(matches!(err, MigrationError::InvalidProperty { .. }));
        assert!(err.is_configuration());

        let max = ExpiryDefaults::resolve(&props(&[(
            REFRESH_TOKEN_VALIDITY_PERIOD,
            "9223372036854775807",
        )]))
        .unwrap();
        assert_eq!(max.refresh_token, i64::MAX);
    }

    #[test]
    fn defaults_apply_without_override() {
        let mut app = OAuthConsumerApp::new("client", 1);
        apply_expiry_times(&mut app, None, &ExpiryDefaults::default());
        assert_eq!(app.application_access_token_expiry_time, 3600);
        assert_eq!(app.user_access_token_expiry_time, 3600);
        assert_eq!(app.refresh_token_expiry_time, 84600);
    }

    #[test]
    fn application_override_drives_user_and_refresh_expiry() {
        let expiry = ExpiryOverride {
            application_access_token_expiry_ms: Some(120_000),
            user_access_token_expiry_ms: None,
            refresh_token_expiry_ms: None,
        };
        let mut app = OAuthConsumerApp::new("client", 1);
        apply_expiry_times(&mut app, Some(&expiry), &ExpiryDefaults::default());
        assert_eq!(app.application_access_token_expiry_time, 120);
        assert_eq!(app.user_access_token_expiry_time, 120);
        assert_eq!(app.refresh_token_expiry_time, 120);
    }

    #[test]
    fn sub_second_override_truncates_to_zero() {
        let expiry = ExpiryOverride {
            application_access_token_expiry_ms: Some(500),
            ..Default::default()
        };
        let mut app = OAuthConsumerApp::new("client", 1);
        apply_expiry_times(&mut app, Some(&expiry), &ExpiryDefaults::default());
        assert_eq!(
            (
                app.application_access_token_expiry_time,
                app.user_access_token_expiry_time,
                app.refresh_token_expiry_time,
            ),
            (0, 0, 0)
        );
    }

    #[test]
    fn own_user_and_refresh_override_fields_are_ignored() {
        let expiry = ExpiryOverride {
            application_access_token_expiry_ms: None,
            user_access_token_expiry_ms: Some(10_000),
            refresh_token_expiry_ms: Some(20_000),
        };
        let mut app = OAuthConsumerApp::new("client", 1);
        apply_expiry_times(&mut app, Some(&expiry), &ExpiryDefaults::default());
        assert_eq!(app.application_access_token_expiry_time, 3600);
        assert_eq!(app.user_access_token_expiry_time, 3600);
        assert_eq!(app.refresh_token_expiry_time, 84600);
    }

    #[tokio::test]
    async fn filtered_tenants_are_left_out_of_the_batch() {
        let filter = TenantFilter::new(true, HashSet::from([2]), true, HashSet::from([1, 2]));
        let apps = vec![
            OAuthConsumerApp::new("a", 1),
            OAuthConsumerApp::new("b", 2),
            OAuthConsumerApp::new("c", 3),
        ];
        let overrides = StaticExpiryOverrideStore::new();
        let updated = migrate_consumer_apps(apps, &filter, &overrides, &ExpiryDefaults::default())
            .await
            .unwrap();
        assert_eq!(updated.len(), 1);
        assert_eq!(updated[0].consumer_key, "a");
    }

    #[tokio::test]
    async fn recomputation_does_not_depend_on_stored_values() {
        let overrides = StaticExpiryOverrideStore::new().with_override(
            "b",
            1,
            ExpiryOverride {
                application_access_token_expiry_ms: Some(60_000),
                ..Default::default()
            },
        );
        let defaults = ExpiryDefaults::default();
        let filter = TenantFilter::default();
        let apps = vec![OAuthConsumerApp::new("a", 1), OAuthConsumerApp::new("b", 1)];

        let first = migrate_consumer_apps(apps, &filter, &overrides, &defaults)
            .await
            .unwrap();
        let second = migrate_consumer_apps(first.clone(), &filter, &overrides, &defaults)
            .await
            .unwrap();
        assert_eq!(first, second);
        assert_eq!(second[1].refresh_token_expiry_time, 60);
    }
}
