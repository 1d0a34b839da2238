//! Legacy OAuth tables as they existed before the v5.4.0 upgrade.
//!
//! Creates:
//! - idn_oauth_consumer_apps: registered OAuth clients (no expiry columns yet)
//! - idn_oauth2_scope: scope definitions with the denormalized roles string
//! - um_tenant: tenant inventory used for tenant filtering
//! - sp_token_expiry_config: registry-backed per-application expiry overrides

use sea_orm_migration::{prelude::*, schema::*};

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(IdnOauthConsumerApps::Table)
                    .if_not_exists()
                    .col(pk_auto(IdnOauthConsumerApps::Id))
                    .col(string(IdnOauthConsumerApps::ConsumerKey))
                    .col(string_null(IdnOauthConsumerApps::ConsumerSecret))
                    .col(string_null(IdnOauthConsumerApps::AppName))
                    .col(integer(IdnOauthConsumerApps::TenantId).default(-1234))
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .if_not_exists()
                    .name("idx_consumer_key_tenant_unique")
                    .table(IdnOauthConsumerApps::Table)
                    .col(IdnOauthConsumerApps::ConsumerKey)
                    .col(IdnOauthConsumerApps::TenantId)
                    .unique()
                    .to_owned(),
            )
            .await?;

        manager
            .create_table(
                Table::create()
                    .table(IdnOauth2Scope::Table)
                    .if_not_exists()
                    .col(pk_auto(IdnOauth2Scope::ScopeId))
                    .col(string(IdnOauth2Scope::ScopeKey))
                    .col(text_null(IdnOauth2Scope::Description))
                    .col(integer(IdnOauth2Scope::TenantId).default(-1))
                    .col(text_null(IdnOauth2Scope::Roles))
                    .to_owned(),
            )
            .await?;

        manager
            .create_table(
                Table::create()
                    .table(UmTenant::Table)
                    .if_not_exists()
                    .col(integer(UmTenant::UmId).primary_key())
                    .col(string(UmTenant::UmDomainName))
                    .col(boolean(UmTenant::UmActive).default(true))
                    .to_owned(),
            )
            .await?;

        manager
            .create_table(
                Table::create()
                    .table(SpTokenExpiryConfig::Table)
                    .if_not_exists()
                    .col(pk_auto(SpTokenExpiryConfig::Id))
                    .col(integer(SpTokenExpiryConfig::TenantId))
                    .col(string(SpTokenExpiryConfig::ConsumerKey))
                    .col(text(SpTokenExpiryConfig::Config))
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .if_not_exists()
                    .name("idx_sp_token_expiry_config_app")
                    .table(SpTokenExpiryConfig::Table)
                    .col(SpTokenExpiryConfig::TenantId)
                    .col(SpTokenExpiryConfig::ConsumerKey)
                    .unique()
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(SpTokenExpiryConfig::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(UmTenant::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(IdnOauth2Scope::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(IdnOauthConsumerApps::Table).to_owned())
            .await
    }
}

#[derive(Iden)]
pub(crate) enum IdnOauthConsumerApps {
    #[iden = "idn_oauth_consumer_apps"]
    Table,
    Id,
    ConsumerKey,
    ConsumerSecret,
    AppName,
    TenantId,
}

#[derive(Iden)]
pub(crate) enum IdnOauth2Scope {
    #[iden = "idn_oauth2_scope"]
    Table,
    ScopeId,
    ScopeKey,
    Description,
    TenantId,
    Roles,
}

#[derive(Iden)]
enum UmTenant {
    #[iden = "um_tenant"]
    Table,
    UmId,
    UmDomainName,
    UmActive,
}

#[derive(Iden)]
enum SpTokenExpiryConfig {
    #[iden = "sp_token_expiry_config"]
    Table,
    Id,
    TenantId,
    ConsumerKey,
    Config,
}
