pub use sea_orm_migration::prelude::*;

mod m20260712_090000_users_chats_members;
mod m20260712_091500_messages;
mod m20260801_120000_quotes;

pub struct Migrator;

#[async_trait::async_trait]
impl MigratorTrait for Migrator {
    fn migrations() -> Vec<Box<dyn MigrationTrait>> {
        vec![
            Box::new(m20260712_090000_users_chats_members::Migration),
            Box::new(m20260712_091500_messages::Migration),
            Box::new(m20260801_120000_quotes::Migration),
        ]
    }
}
