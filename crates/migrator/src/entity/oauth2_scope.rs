//! OAuth2 scope entity.

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "idn_oauth2_scope")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub scope_id: i32,
    pub scope_key: String,
    /// Display name, missing on legacy rows
    pub name: Option<String>,
    pub description: Option<String>,
    pub tenant_id: i32,
    /// Comma-separated role names
    pub roles: Option<String>,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(has_many = "super::oauth2_scope_binding::Entity")]
    Binding,
}

impl Related<super::oauth2_scope_binding::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Binding.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
