//! Migration: Create scenarios table.

use sea_orm_migration::prelude::*;

use super::m20260301_000001_create_users::Users;
use super::m20260301_000002_create_projects::Projects;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(Scenarios::Table)
                    .if_not_exists()
                    .col(ColumnDef::new(Scenarios::Id).uuid().not_null().primary_key())
                    .col(ColumnDef::new(Scenarios::ProjectId).uuid().not_null())
                    .col(ColumnDef::new(Scenarios::Title).string_len(500).not_null())
                    .col(ColumnDef::new(Scenarios::Description).text().null())
                    .col(ColumnDef::new(Scenarios::Category).string_len(20).not_null())
                    .col(ColumnDef::new(Scenarios::Priority).string_len(20).not_null())
                    .col(ColumnDef::new(Scenarios::DeviceType).string_len(20).not_null())
                    .col(ColumnDef::new(Scenarios::Status).string_len(20).not_null())
                    .col(ColumnDef::new(Scenarios::SortOrder).integer().not_null())
                    .col(ColumnDef::new(Scenarios::AssigneeId).uuid().null())
                    .col(ColumnDef::new(Scenarios::FailureNote).text().null())
                    .col(ColumnDef::new(Scenarios::BugTicketUrl).string_len(500).null())
                    .col(
                        ColumnDef::new(Scenarios::ExecutedAt)
                            .timestamp_with_time_zone()
                            .null(),
                    )
                    .col(ColumnDef::new(Scenarios::ExecutedById).uuid().null())
                    .col(
                        ColumnDef::new(Scenarios::CreatedAt)
                            .timestamp_with_time_zone()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(Scenarios::UpdatedAt)
                            .timestamp_with_time_zone()
                            .not_null(),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_scenarios_project")
                            .from(Scenarios::Table, Scenarios::ProjectId)
                            .to(Projects::Table, Projects::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_scenarios_assignee")
                            .from(Scenarios::Table, Scenarios::AssigneeId)
                            .to(Users::Table, Users::Id)
                            .on_delete(ForeignKeyAction::SetNull),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_scenarios_executed_by")
                            .from(Scenarios::Table, Scenarios::ExecutedById)
                            .to(Users::Table, Users::Id)
                            .on_delete(ForeignKeyAction::SetNull),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx_scenarios_project_id")
                    .table(Scenarios::Table)
                    .col(Scenarios::ProjectId)
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx_scenarios_assignee_id")
                    .table(Scenarios::Table)
                    .col(Scenarios::AssigneeId)
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(Scenarios::Table).if_exists().to_owned())
            .await
    }
}

#[derive(DeriveIden)]
pub enum Scenarios {
    Table,
    Id,
    ProjectId,
    Title,
    Description,
    Category,
    Priority,
    DeviceType,
    Status,
    SortOrder,
    AssigneeId,
    FailureNote,
    BugTicketUrl,
    ExecutedAt,
    ExecutedById,
    CreatedAt,
    UpdatedAt,
}
