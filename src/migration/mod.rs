//! SeaORM database migrations.

pub use sea_orm_migration::prelude::*;

mod m20260301_000001_create_users;
mod m20260301_000002_create_projects;
mod m20260301_000003_create_project_members;
mod m20260301_000004_create_scenarios;
mod m20260301_000005_create_test_cases;
mod m20260301_000006_create_test_runs;
mod m20260301_000007_create_test_run_results;

pub struct Migrator;

#[async_trait::async_trait]
impl MigratorTrait for Migrator {
    fn migrations() -> Vec<Box<dyn MigrationTrait>> {
        vec![
            Box::new(m20260301_000001_create_users::Migration),
            Box::new(m20260301_000002_create_projects::Migration),
            Box::new(m20260301_000003_create_project_members::Migration),
            Box::new(m20260301_000004_create_scenarios::Migration),
            Box::new(m20260301_000005_create_test_cases::Migration),
            Box::new(m20260301_000006_create_test_runs::Migration),
            Box::new(m20260301_000007_create_test_run_results::Migration),
        ]
    }
}
