//! In-memory value objects the migrators work on.
//!
//! They are detached from the sea-orm models so the decision logic can be
//! exercised without a database.

use serde::{Deserialize, Serialize};

use crate::entity::{oauth2_scope, oauth_consumer_app};

/// A registered OAuth client and its token expiry settings, in seconds.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct OAuthConsumerApp {
    pub consumer_key: String,
    pub tenant_id: i32,
    pub application_access_token_expiry_time: i64,
    pub user_access_token_expiry_time: i64,
    pub refresh_token_expiry_time: i64,
}

impl OAuthConsumerApp {
    pub fn new(consumer_key: impl Into<String>, tenant_id: i32) -> Self {
        Self {
            consumer_key: consumer_key.into(),
            tenant_id,
            application_access_token_expiry_time: 0,
            user_access_token_expiry_time: 0,
            refresh_token_expiry_time: 0,
        }
    }
}

impl From<oauth_consumer_app::Model> for OAuthConsumerApp {
    fn from(model: oauth_consumer_app::Model) -> Self {
        Self {
            consumer_key: model.consumer_key,
            tenant_id: model.tenant_id,
            application_access_token_expiry_time: model.app_access_token_expire_time,
            user_access_token_expiry_time: model.user_access_token_expire_time,
            refresh_token_expiry_time: model.refresh_token_expire_time,
        }
    }
}

/// Per-application expiry override. All values are milliseconds.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExpiryOverride {
    pub application_access_token_expiry_ms: Option<i64>,
    pub user_access_token_expiry_ms: Option<i64>,
    pub refresh_token_expiry_ms: Option<i64>,
}

impl ExpiryOverride {
    pub fn is_empty(&self) -> bool {
        self.application_access_token_expiry_ms.is_none()
            && self.user_access_token_expiry_ms.is_none()
            && self.refresh_token_expiry_ms.is_none()
    }
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct OAuth2Scope {
    pub scope_id: i32,
    pub scope_key: String,
    pub name: Option<String>,
    pub roles: Option<String>,
}

impl From<oauth2_scope::Model> for OAuth2Scope {
    fn from(model: oauth2_scope::Model) -> Self {
        Self {
            scope_id: model.scope_id,
            scope_key: model.scope_key,
            name: model.name,
            roles: model.roles,
        }
    }
}

/// One role bound to one scope.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct OAuth2ScopeBinding {
    pub scope_id: i32,
    pub role: String,
}

impl OAuth2ScopeBinding {
    pub fn new(scope_id: i32, role: impl Into<String>) -> Self {
        Self {
            scope_id,
            role: role.into(),
        }
    }
}

/// True for a missing, empty or whitespace-only value.
pub fn is_blank(value: Option<&str>) -> bool {
    value.is_none_or(|v| v.trim().is_empty())
}
