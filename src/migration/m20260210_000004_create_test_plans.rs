//! Create test_plans table.

use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(TestPlan::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(TestPlan::Id)
                            .integer()
                            .not_null()
                            .auto_increment()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(TestPlan::Name).string().not_null())
                    .col(ColumnDef::new(TestPlan::Description).string())
                    .col(ColumnDef::new(TestPlan::Environment).string())
                    .col(ColumnDef::new(TestPlan::TestCaseIds).text())
                    .col(ColumnDef::new(TestPlan::CreatedBy).integer())
                    .col(
                        ColumnDef::new(TestPlan::CreatedAt)
                            .date_time()
                            .not_null()
                            .default(Expr::current_timestamp()),
                    )
                    .col(
                        ColumnDef::new(TestPlan::UpdatedAt)
                            .date_time()
                            .not_null()
                            .default(Expr::current_timestamp()),
                    )
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(TestPlan::Table).to_owned())
            .await
    }
}

#[derive(DeriveIden)]
pub enum TestPlan {
    #[sea_orm(iden = "test_plans")]
    Table,
    Id,
    Name,
    Description,
    Environment,
    TestCaseIds,
    CreatedBy,
    CreatedAt,
    UpdatedAt,
}
