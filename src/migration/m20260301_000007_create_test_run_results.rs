//! Migration: Create test_run_results table.
//!
//! Results are removed with their run or their scenario.

use sea_orm_migration::prelude::*;

use super::m20260301_000004_create_scenarios::Scenarios;
use super::m20260301_000006_create_test_runs::TestRuns;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(TestRunResults::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(TestRunResults::Id)
                            .uuid()
                            .not_null()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(TestRunResults::TestRunId).uuid().not_null())
                    .col(ColumnDef::new(TestRunResults::ScenarioId).uuid().not_null())
                    .col(ColumnDef::new(TestRunResults::Status).string_len(20).not_null())
                    .col(ColumnDef::new(TestRunResults::Note).text().null())
                    .col(
                        ColumnDef::new(TestRunResults::ExecutedAt)
                            .timestamp_with_time_zone()
                            .null(),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_test_run_results_run")
                            .from(TestRunResults::Table, TestRunResults::TestRunId)
                            .to(TestRuns::Table, TestRuns::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_test_run_results_scenario")
                            .from(TestRunResults::Table, TestRunResults::ScenarioId)
                            .to(Scenarios::Table, Scenarios::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx_test_run_results_run_id")
                    .table(TestRunResults::Table)
                    .col(TestRunResults::TestRunId)
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(
                Table::drop()
                    .table(TestRunResults::Table)
                    .if_exists()
                    .to_owned(),
            )
            .await
    }
}

#[derive(DeriveIden)]
enum TestRunResults {
    Table,
    Id,
    TestRunId,
    ScenarioId,
    Status,
    Note,
    ExecutedAt,
}
