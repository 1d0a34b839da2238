//! Row source/sink for the OAuth tables.
//!
//! Every operation runs on a caller-owned transaction so that a batch is
//! committed or rolled back as a whole.

use async_trait::async_trait;
use sea_orm::sea_query::Expr;
use sea_orm::{
    ActiveValue::Set, ColumnTrait, DatabaseTransaction, DbErr, EntityTrait, QueryFilter,
    QueryOrder,
};

use crate::entity::{oauth_consumer_app, oauth2_scope, oauth2_scope_binding};
use crate::model::{OAuth2Scope, OAuth2ScopeBinding, OAuthConsumerApp};

#[async_trait]
pub trait OAuthRepository: Send + Sync {
    async fn find_all_consumer_apps(
        &self,
        txn: &DatabaseTransaction,
    ) -> Result<Vec<OAuthConsumerApp>, DbErr>;

    /// Write the three expiry columns of every given app, matched by
    /// `(consumer_key, tenant_id)`.
    async fn update_consumer_app_expiry_times(
        &self,
        txn: &DatabaseTransaction,
        apps: &[OAuthConsumerApp],
    ) -> Result<(), DbErr>;

    async fn find_all_scopes(&self, txn: &DatabaseTransaction) -> Result<Vec<OAuth2Scope>, DbErr>;

    async fn insert_scope_bindings(
        &self,
        txn: &DatabaseTransaction,
        bindings: &[OAuth2ScopeBinding],
    ) -> Result<(), DbErr>;

    /// Persist the name of every given scope.
    async fn update_scopes(
        &self,
        txn: &DatabaseTransaction,
        scopes: &[OAuth2Scope],
    ) -> Result<(), DbErr>;
}

/// SeaORM implementation, usable with any backend SeaORM connects to.
#[derive(Clone, Copy, Debug, Default)]
pub struct SeaOrmOAuthRepository;

#[async_trait]
impl OAuthRepository for SeaOrmOAuthRepository {
    async fn find_all_consumer_apps(
        &self,
        txn: &DatabaseTransaction,
    ) -> Result<Vec<OAuthConsumerApp>, DbErr> {
        let rows = oauth_consumer_app::Entity::find()
            .order_by_asc(oauth_consumer_app::Column::Id)
            .all(txn)
            .await?;
        Ok(rows.into_iter().map(OAuthConsumerApp::from).collect())
    }

    async fn update_consumer_app_expiry_times(
        &self,
        txn: &DatabaseTransaction,
        apps: &[OAuthConsumerApp],
    ) -> Result<(), DbErr> {
        use oauth_consumer_app::Column;
        for app in apps {
            oauth_consumer_app::Entity::update_many()
                .col_expr(
                    Column::AppAccessTokenExpireTime,
                    Expr::value(app.application_access_token_expiry_time),
                )
                .col_expr(
                    Column::UserAccessTokenExpireTime,
                    Expr::value(app.user_access_token_expiry_time),
                )
                .col_expr(
                    Column::RefreshTokenExpireTime,
                    Expr::value(app.refresh_token_expiry_time),
                )
                .filter(Column::ConsumerKey.eq(app.consumer_key.as_str()))
                .filter(Column::TenantId.eq(app.tenant_id))
                .exec(txn)
                .await?;
        }
        Ok(())
    }

    async fn find_all_scopes(&self, txn: &DatabaseTransaction) -> Result<Vec<OAuth2Scope>, DbErr> {
        let rows = oauth2_scope::Entity::find()
            .order_by_asc(oauth2_scope::Column::ScopeId)
            .all(txn)
            .await?;
        Ok(rows.into_iter().map(OAuth2Scope::from).collect())
    }

    async fn insert_scope_bindings(
        &self,
        txn: &DatabaseTransaction,
        bindings: &[OAuth2ScopeBinding],
    ) -> Result<(), DbErr> {
        if bindings.is_empty() {
            return Ok(());
        }
        let models = bindings.iter().map(|b| oauth2_scope_binding::ActiveModel {
            scope_id: Set(b.scope_id),
            scope_binding: Set(b.role.clone()),
            ..Default::default()
        });
        oauth2_scope_binding::Entity::insert_many(models)
            .exec_without_returning(txn)
            .await?;
        Ok(())
    }

    async fn update_scopes(
        &self,
        txn: &DatabaseTransaction,
        scopes: &[OAuth2Scope],
    ) -> Result<(), DbErr> {
        use oauth2_scope::Column;
        for scope in scopes {
            oauth2_scope::Entity::update_many()
                .col_expr(Column::Name, Expr::value(scope.name.clone()))
                .filter(Column::ScopeId.eq(scope.scope_id))
                .exec(txn)
                .await?;
        }
        Ok(())
    }
}
