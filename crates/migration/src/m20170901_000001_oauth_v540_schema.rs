//! v5.4.0 OAuth schema changes.
//!
//! Adds the per-application token expiry columns, the scope display name and
//! the normalized scope binding table. The data migrator fills these in.

use sea_orm_migration::{prelude::*, schema::*};

use crate::m20170101_000001_create_oauth_tables::{IdnOauth2Scope, IdnOauthConsumerApps};

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        // SQLite only accepts one column per ALTER TABLE
        for column in [
            ExpiryColumn::UserAccessTokenExpireTime,
            ExpiryColumn::AppAccessTokenExpireTime,
            ExpiryColumn::RefreshTokenExpireTime,
        ] {
            manager
                .alter_table(
                    Table::alter()
                        .table(IdnOauthConsumerApps::Table)
                        .add_column(big_integer(column).default(0).to_owned())
                        .to_owned(),
                )
                .await?;
        }

        manager
            .alter_table(
                Table::alter()
                    .table(IdnOauth2Scope::Table)
                    .add_column(string_null(ScopeName::Name).to_owned())
                    .to_owned(),
            )
            .await?;

        manager
            .create_table(
                Table::create()
                    .table(IdnOauth2ScopeBinding::Table)
                    .if_not_exists()
                    .col(pk_auto(IdnOauth2ScopeBinding::Id))
                    .col(integer(IdnOauth2ScopeBinding::ScopeId))
                    .col(string(IdnOauth2ScopeBinding::ScopeBinding))
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_scope_binding_scope")
                            .from(IdnOauth2ScopeBinding::Table, IdnOauth2ScopeBinding::ScopeId)
                            .to(IdnOauth2Scope::Table, IdnOauth2Scope::ScopeId)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .if_not_exists()
                    .name("idx_scope_binding_scope_id")
                    .table(IdnOauth2ScopeBinding::Table)
                    .col(IdnOauth2ScopeBinding::ScopeId)
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(IdnOauth2ScopeBinding::Table).to_owned())
            .await?;

        manager
            .alter_table(
                Table::alter()
                    .table(IdnOauth2Scope::Table)
                    .drop_column(ScopeName::Name)
                    .to_owned(),
            )
            .await?;

        for column in [
            ExpiryColumn::RefreshTokenExpireTime,
            ExpiryColumn::AppAccessTokenExpireTime,
            ExpiryColumn::UserAccessTokenExpireTime,
        ] {
            manager
                .alter_table(
                    Table::alter()
                        .table(IdnOauthConsumerApps::Table)
                        .drop_column(column)
                        .to_owned(),
                )
                .await?;
        }
        Ok(())
    }
}

#[derive(Iden, Clone, Copy)]
enum ExpiryColumn {
    UserAccessTokenExpireTime,
    AppAccessTokenExpireTime,
    RefreshTokenExpireTime,
}

#[derive(Iden)]
enum ScopeName {
    Name,
}

#[derive(Iden)]
enum IdnOauth2ScopeBinding {
    #[iden = "idn_oauth2_scope_binding"]
    Table,
    Id,
    ScopeId,
    ScopeBinding,
}
