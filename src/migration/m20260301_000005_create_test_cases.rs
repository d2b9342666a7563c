//! Migration: Create test_cases table.

use sea_orm_migration::prelude::*;

use super::m20260301_000004_create_scenarios::Scenarios;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(TestCases::Table)
                    .if_not_exists()
                    .col(ColumnDef::new(TestCases::Id).uuid().not_null().primary_key())
                    .col(ColumnDef::new(TestCases::ScenarioId).uuid().not_null())
                    .col(ColumnDef::new(TestCases::Step).integer().not_null())
                    .col(ColumnDef::new(TestCases::Action).text().not_null())
                    .col(ColumnDef::new(TestCases::Expected).text().not_null())
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_test_cases_scenario")
                            .from(TestCases::Table, TestCases::ScenarioId)
                            .to(Scenarios::Table, Scenarios::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx_test_cases_scenario_step")
                    .table(TestCases::Table)
                    .col(TestCases::ScenarioId)
                    .col(TestCases::Step)
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(TestCases::Table).if_exists().to_owned())
            .await
    }
}

#[derive(DeriveIden)]
enum TestCases {
    Table,
    Id,
    ScenarioId,
    Step,
    Action,
    Expected,
}
