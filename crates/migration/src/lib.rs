//! Migrator for the `service_list` table.
//! Indexes are applied last.
pub use sea_orm_migration::prelude::*;

mod m20250801_000001_create_service_list;
mod m20250801_000002_add_service_list_indexes;

pub struct Migrator;

#[async_trait::async_trait]
impl MigratorTrait for Migrator {
    fn migrations() -> Vec<Box<dyn MigrationTrait>> {
        vec![
            Box::new(m20250801_000001_create_service_list::Migration),
            // Indexes should always be applied last
            Box::new(m20250801_000002_add_service_list_indexes::Migration),
        ]
    }
}
