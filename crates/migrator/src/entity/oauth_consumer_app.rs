//! OAuth consumer application entity.

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "idn_oauth_consumer_apps")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i32,
    /// Client id, unique per tenant
    pub consumer_key: String,
    pub consumer_secret: Option<String>,
    pub app_name: Option<String>,
    pub tenant_id: i32,
    /// Seconds; 0 on rows created before the expiry columns existed
    pub user_access_token_expire_time: i64,
    pub app_access_token_expire_time: i64,
    pub refresh_token_expire_time: i64,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}
