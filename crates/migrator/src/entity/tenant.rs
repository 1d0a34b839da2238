//! Tenant inventory entity.

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "um_tenant")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub um_id: i32,
    pub um_domain_name: String,
    pub um_active: bool,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}
