//! Migration: Create test_runs table.

use sea_orm_migration::prelude::*;

use super::m20260301_000002_create_projects::Projects;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(TestRuns::Table)
                    .if_not_exists()
                    .col(ColumnDef::new(TestRuns::Id).uuid().not_null().primary_key())
                    .col(ColumnDef::new(TestRuns::ProjectId).uuid().not_null())
                    .col(ColumnDef::new(TestRuns::Name).string_len(255).not_null())
                    .col(ColumnDef::new(TestRuns::AppVersion).string_len(50).not_null())
                    .col(ColumnDef::new(TestRuns::Environment).string_len(20).not_null())
                    .col(
                        ColumnDef::new(TestRuns::StartedAt)
                            .timestamp_with_time_zone()
                            .not_null(),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_test_runs_project")
                            .from(TestRuns::Table, TestRuns::ProjectId)
                            .to(Projects::Table, Projects::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx_test_runs_project_id")
                    .table(TestRuns::Table)
                    .col(TestRuns::ProjectId)
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(TestRuns::Table).if_exists().to_owned())
            .await
    }
}

#[derive(DeriveIden)]
pub enum TestRuns {
    Table,
    Id,
    ProjectId,
    Name,
    AppVersion,
    Environment,
    StartedAt,
}
