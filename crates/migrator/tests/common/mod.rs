//! Shared fixtures: an in-memory SQLite store with the full OAuth schema.

#![allow(dead_code)]

use std::collections::HashMap;
use std::sync::Arc;

use migration::{Migrator, MigratorTrait};
use oauth_data_migrator::MigrationContext;
use oauth_data_migrator::entity::{
    oauth_consumer_app, oauth2_scope, oauth2_scope_binding, sp_token_expiry_config, tenant,
};
use oauth_data_migrator::registry::RegistryExpiryOverrideStore;
use oauth_data_migrator::repository::SeaOrmOAuthRepository;
use oauth_data_migrator::tenant::{SeaOrmTenantInventory, TenantPolicy};
use sea_orm::{
    ActiveModelTrait, ActiveValue::Set, ColumnTrait, Database, DatabaseConnection, EntityTrait,
    QueryFilter, QueryOrder,
};

/// Create an in-memory SQLite database and run the schema migrations.
pub async fn setup_test_db() -> Arc<DatabaseConnection> {
    let db = Database::connect("sqlite::memory:")
        .await
        .expect("Failed to connect to in-memory database");
    Migrator::up(&db, None)
        .await
        .expect("Failed to apply schema migrations");
    Arc::new(db)
}

/// Context over the SeaORM collaborators with the given identity properties.
pub fn context(
    db: Arc<DatabaseConnection>,
    properties: HashMap<String, String>,
    tenant_policy: TenantPolicy,
) -> MigrationContext {
    MigrationContext {
        repository: Arc::new(SeaOrmOAuthRepository),
        overrides: Arc::new(RegistryExpiryOverrideStore::new(db.clone())),
        properties: Arc::new(properties),
        tenants: Arc::new(SeaOrmTenantInventory::new(db.clone())),
        tenant_policy,
        db,
    }
}

pub async fn insert_consumer_app(db: &DatabaseConnection, consumer_key: &str, tenant_id: i32) {
    oauth_consumer_app::ActiveModel {
        consumer_key: Set(consumer_key.to_string()),
        consumer_secret: Set(Some(format!("{consumer_key}-secret"))),
        app_name: Set(Some(format!("{consumer_key} app"))),
        tenant_id: Set(tenant_id),
        user_access_token_expire_time: Set(0),
        app_access_token_expire_time: Set(0),
        refresh_token_expire_time: Set(0),
        ..Default::default()
    }
    .insert(db)
    .await
    .expect("Failed to insert consumer app");
}

pub async fn insert_tenant(db: &DatabaseConnection, id: i32, active: bool) {
    tenant::ActiveModel {
        um_id: Set(id),
        um_domain_name: Set(format!("tenant{id}.example.com")),
        um_active: Set(active),
    }
    .insert(db)
    .await
    .expect("Failed to insert tenant");
}

pub async fn insert_override(db: &DatabaseConnection, consumer_key: &str, tenant_id: i32, json: &str) {
    sp_token_expiry_config::ActiveModel {
        tenant_id: Set(tenant_id),
        consumer_key: Set(consumer_key.to_string()),
        config: Set(json.to_string()),
        ..Default::default()
    }
    .insert(db)
    .await
    .expect("Failed to insert expiry override");
}

pub async fn insert_scope(
    db: &DatabaseConnection,
    scope_key: &str,
    name: Option<&str>,
    roles: Option<&str>,
) -> i32 {
    let scope = oauth2_scope::ActiveModel {
        scope_key: Set(scope_key.to_string()),
        name: Set(name.map(String::from)),
        description: Set(None),
        tenant_id: Set(-1234),
        roles: Set(roles.map(String::from)),
        ..Default::default()
    }
    .insert(db)
    .await
    .expect("Failed to insert scope");
    scope.scope_id
}

pub async fn find_consumer_app(
    db: &DatabaseConnection,
    consumer_key: &str,
    tenant_id: i32,
) -> oauth_consumer_app::Model {
    oauth_consumer_app::Entity::find()
        .filter(oauth_consumer_app::Column::ConsumerKey.eq(consumer_key))
        .filter(oauth_consumer_app::Column::TenantId.eq(tenant_id))
        .one(db)
        .await
        .expect("Failed to query consumer app")
        .expect("Consumer app not found")
}

pub async fn all_bindings(db: &DatabaseConnection) -> Vec<oauth2_scope_binding::Model> {
    oauth2_scope_binding::Entity::find()
        .order_by_asc(oauth2_scope_binding::Column::Id)
        .all(db)
        .await
        .expect("Failed to query scope bindings")
}

pub async fn find_scope(db: &DatabaseConnection, scope_id: i32) -> oauth2_scope::Model {
    oauth2_scope::Entity::find_by_id(scope_id)
        .one(db)
        .await
        .expect("Failed to query scope")
        .expect("Scope not found")
}
