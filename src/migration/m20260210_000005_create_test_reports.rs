//! Create test_reports table.

use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(TestReport::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(TestReport::Id)
                            .integer()
                            .not_null()
                            .auto_increment()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(TestReport::PlanId).integer())
                    .col(ColumnDef::new(TestReport::PlanRunNo).integer())
                    .col(ColumnDef::new(TestReport::CaseId).integer().not_null())
                    .col(ColumnDef::new(TestReport::Status).string().not_null())
                    .col(ColumnDef::new(TestReport::ExecutionTime).integer())
                    .col(ColumnDef::new(TestReport::Logs).text())
                    .col(
                        ColumnDef::new(TestReport::ExecutedAt)
                            .date_time()
                            .not_null()
                            .default(Expr::current_timestamp()),
                    )
                    .col(
                        ColumnDef::new(TestReport::ExecutedBy)
                            .string()
                            .not_null()
                            .default("System"),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx_test_reports_executed_at")
                    .table(TestReport::Table)
                    .col(TestReport::ExecutedAt)
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx_test_reports_plan_run")
                    .table(TestReport::Table)
                    .col(TestReport::PlanId)
                    .col(TestReport::PlanRunNo)
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx_test_reports_case_id")
                    .table(TestReport::Table)
                    .col(TestReport::CaseId)
                    .to_owned(),
            )
            .await?;

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(TestReport::Table).to_owned())
            .await
    }
}

#[derive(DeriveIden)]
pub enum TestReport {
    #[sea_orm(iden = "test_reports")]
    Table,
    Id,
    PlanId,
    PlanRunNo,
    CaseId,
    Status,
    ExecutionTime,
    Logs,
    ExecutedAt,
    ExecutedBy,
}
