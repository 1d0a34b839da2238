//! OAuth2 scope binding entity: one row per (scope, role) pair.

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "idn_oauth2_scope_binding")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i32,
    pub scope_id: i32,
    /// Role name bound to the scope
    pub scope_binding: String,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::oauth2_scope::Entity",
        from = "Column::ScopeId",
        to = "super::oauth2_scope::Column::ScopeId",
        on_delete = "Cascade"
    )]
    Scope,
}

impl Related<super::oauth2_scope::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Scope.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
