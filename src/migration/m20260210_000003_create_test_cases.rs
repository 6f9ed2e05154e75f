//! Create test_cases table.

use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(TestCase::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(TestCase::Id)
                            .integer()
                            .not_null()
                            .auto_increment()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(TestCase::Name).string().not_null())
                    .col(ColumnDef::new(TestCase::Description).string())
                    .col(ColumnDef::new(TestCase::Type).string().not_null())
                    .col(
                        ColumnDef::new(TestCase::Status)
                            .string()
                            .not_null()
                            .default("draft"),
                    )
                    .col(
                        ColumnDef::new(TestCase::Priority)
                            .string()
                            .not_null()
                            .default("medium"),
                    )
                    .col(ColumnDef::new(TestCase::Content).text())
                    .col(ColumnDef::new(TestCase::Environment).string())
                    .col(ColumnDef::new(TestCase::LastRun).date_time())
                    .col(ColumnDef::new(TestCase::LastResult).string())
                    .col(ColumnDef::new(TestCase::CreatedBy).integer())
                    .col(
                        ColumnDef::new(TestCase::CreatedAt)
                            .date_time()
                            .not_null()
                            .default(Expr::current_timestamp()),
                    )
                    .col(
                        ColumnDef::new(TestCase::UpdatedAt)
                            .date_time()
                            .not_null()
                            .default(Expr::current_timestamp()),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx_test_cases_updated_at")
                    .table(TestCase::Table)
                    .col(TestCase::UpdatedAt)
                    .to_owned(),
            )
            .await?;

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(TestCase::Table).to_owned())
            .await
    }
}

#[derive(DeriveIden)]
pub enum TestCase {
    #[sea_orm(iden = "test_cases")]
    Table,
    Id,
    Name,
    Description,
    Type,
    Status,
    Priority,
    Content,
    Environment,
    LastRun,
    LastResult,
    CreatedBy,
    CreatedAt,
    UpdatedAt,
}
