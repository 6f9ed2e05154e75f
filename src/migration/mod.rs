//! SeaORM database migrations.

pub use sea_orm_migration::prelude::*;

mod m20260210_000001_create_users;
mod m20260210_000002_create_environments;
mod m20260210_000003_create_test_cases;
mod m20260210_000004_create_test_plans;
mod m20260210_000005_create_test_reports;

pub struct Migrator;

#[async_trait::async_trait]
impl MigratorTrait for Migrator {
    fn migrations() -> Vec<Box<dyn MigrationTrait>> {
        vec![
            Box::new(m20260210_000001_create_users::Migration),
            Box::new(m20260210_000002_create_environments::Migration),
            Box::new(m20260210_000003_create_test_cases::Migration),
            Box::new(m20260210_000004_create_test_plans::Migration),
            Box::new(m20260210_000005_create_test_reports::Migration),
        ]
    }
}
