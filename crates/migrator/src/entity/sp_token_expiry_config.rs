//! Registry property holding per-application token expiry overrides.

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "sp_token_expiry_config")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i32,
    pub tenant_id: i32,
    pub consumer_key: String,
    /// JSON object, millisecond values keyed by `applicationAccessTokenExpireTime`,
    /// `userAccessTokenExpireTime` and `refreshTokenExpireTime`
    pub config: String,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}
