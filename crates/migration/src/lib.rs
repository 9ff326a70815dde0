//! Migrator registering table migrations in creation order.
//! Indexes are applied last.
pub use sea_orm_migration::prelude::*;

mod m20241101_000001_create_contact;
mod m20241101_000002_create_message;
mod m20241101_000003_create_user;
mod m20241101_000004_add_indexes;

pub struct Migrator;

#[async_trait::async_trait]
impl MigratorTrait for Migrator {
    fn migrations() -> Vec<Box<dyn MigrationTrait>> {
        vec![
            Box::new(m20241101_000001_create_contact::Migration),
            Box::new(m20241101_000002_create_message::Migration),
            Box::new(m20241101_000003_create_user::Migration),
            // Indexes should always be applied last
            Box::new(m20241101_000004_add_indexes::Migration),
        ]
    }
}
