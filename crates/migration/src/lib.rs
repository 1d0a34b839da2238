pub use sea_orm_migration::prelude::*;

mod m20170101_000001_create_oauth_tables;
mod m20170901_000001_oauth_v540_schema;

pub struct Migrator;

#[async_trait::async_trait]
impl MigratorTrait for Migrator {
    fn migrations() -> Vec<Box<dyn MigrationTrait>> {
        vec![
            Box::new(m20170101_000001_create_oauth_tables::Migration),
            Box::new(m20170901_000001_oauth_v540_schema::Migration),
        ]
    }
}
