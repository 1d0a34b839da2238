//! Per-application token expiry overrides.
//!
//! The registry keeps one JSON property per consumer key and tenant, e.g.
//! `{"applicationAccessTokenExpireTime": 120000, "refreshTokenExpireTime": "86400000"}`.
//! Values are milliseconds and may be JSON numbers or numeric strings.

use std::collections::HashMap;
use std::sync::Arc;

use async_trait::async_trait;
use sea_orm::{ColumnTrait, DatabaseConnection, EntityTrait, QueryFilter};
use serde_json::{Map, Value};

use crate::entity::sp_token_expiry_config;
use crate::error::MigrationError;
use crate::model::ExpiryOverride;

const APPLICATION_ACCESS_TOKEN_EXPIRE_TIME: &str = "applicationAccessTokenExpireTime";
const USER_ACCESS_TOKEN_EXPIRE_TIME: &str = "userAccessTokenExpireTime";
const REFRESH_TOKEN_EXPIRE_TIME: &str = "refreshTokenExpireTime";

#[async_trait]
pub trait ExpiryOverrideStore: Send + Sync {
    /// Zero or one override for the given application.
    async fn lookup(
        &self,
        consumer_key: &str,
        tenant_id: i32,
    ) -> Result<Option<ExpiryOverride>, MigrationError>;
}

/// Reads overrides from the `sp_token_expiry_config` registry table.
#[derive(Clone)]
pub struct RegistryExpiryOverrideStore {
    db: Arc<DatabaseConnection>,
}

impl RegistryExpiryOverrideStore {
    pub fn new(db: Arc<DatabaseConnection>) -> Self {
        Self { db }
    }
}

#[async_trait]
impl ExpiryOverrideStore for RegistryExpiryOverrideStore {
    #[tracing::instrument(skip(self))]
    async fn lookup(
        &self,
        consumer_key: &str,
        tenant_id: i32,
    ) -> Result<Option<ExpiryOverride>, MigrationError> {
        let row = sp_token_expiry_config::Entity::find()
            .filter(sp_token_expiry_config::Column::TenantId.eq(tenant_id))
            .filter(sp_token_expiry_config::Column::ConsumerKey.eq(consumer_key))
            .one(self.db.as_ref())
            .await?;

        let Some(row) = row else {
            return Ok(None);
        };
        let parsed = parse_override(&row.config).map_err(|reason| MigrationError::Override {
            consumer_key: consumer_key.to_string(),
            tenant_id,
            reason,
        })?;
        // An empty JSON object carries no override at all
        Ok((!parsed.is_empty()).then_some(parsed))
    }
}

/// Parse the registry JSON property into an override.
pub fn parse_override(raw: &str) -> Result<ExpiryOverride, String> {
    let value: Value = serde_json::from_str(raw).map_err(|e| format!("Invalid JSON: {e}"))?;
    let Value::Object(map) = value else {
        return Err("expected a JSON object".to_string());
    };
    Ok(ExpiryOverride {
        application_access_token_expiry_ms: millis(&map, APPLICATION_ACCESS_TOKEN_EXPIRE_TIME)?,
        user_access_token_expiry_ms: millis(&map, USER_ACCESS_TOKEN_EXPIRE_TIME)?,
        refresh_token_expiry_ms: millis(&map, REFRESH_TOKEN_EXPIRE_TIME)?,
    })
}

fn millis(map: &Map<String, Value>, key: &str) -> Result<Option<i64>, String> {
    let ms = match map.get(key) {
        None | Some(Value::Null) => return Ok(None),
        Some(Value::Number(n)) => n
            .as_i64()
            .ok_or_else(|| format!("{key} is not an integer: {n}"))?,
        Some(Value::String(s)) => s
            .trim()
            .parse::<i64>()
            .map_err(|e| format!("{key} is not numeric ({s:?}): {e}"))?,
        Some(other) => return Err(format!("{key} has unexpected type: {other}")),
    };
    if ms < 0 {
        return Err(format!("{key} must not be negative: {ms}"));
    }
    Ok(Some(ms))
}

/// Fixed set of overrides held in memory.
#[derive(Clone, Debug, Default)]
pub struct StaticExpiryOverrideStore {
    overrides: HashMap<(String, i32), ExpiryOverride>,
}

impl StaticExpiryOverrideStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_override(
        mut self,
        consumer_key: impl Into<String>,
        tenant_id: i32,
        expiry: ExpiryOverride,
    ) -> Self {
        self.overrides.insert((consumer_key.into(), tenant_id), expiry);
        self
    }
}

#[async_trait]
impl ExpiryOverrideStore for StaticExpiryOverrideStore {
    async fn lookup(
        &self,
        consumer_key: &str,
        tenant_id: i32,
    ) -> Result<Option<ExpiryOverride>, MigrationError> {
        Ok(self
            .overrides
            .get(&(consumer_key.to_string(), tenant_id))
            .cloned())
    }
}
