pub mod m000001_create_guilds;
pub mod m000002_create_moderation_events;

use sea_orm_migration::prelude::*;

pub struct Migrator;

#[async_trait::async_trait]
impl MigratorTrait for Migrator {
    fn migrations() -> Vec<Box<dyn MigrationTrait>> {
        vec![
            Box::new(m000001_create_guilds::Migration),
            Box::new(m000002_create_moderation_events::Migration),
        ]
    }
}
