//! Create environments table.

use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(Environment::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(Environment::Id)
                            .integer()
                            .not_null()
                            .auto_increment()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(Environment::Name).string().not_null())
                    .col(ColumnDef::new(Environment::KeyName).string().not_null())
                    .col(ColumnDef::new(Environment::BaseUrl).string().not_null())
                    .col(ColumnDef::new(Environment::DatabaseName).string())
                    .col(
                        ColumnDef::new(Environment::Active)
                            .boolean()
                            .not_null()
                            .default(true),
                    )
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(Environment::Table).to_owned())
            .await
    }
}

#[derive(DeriveIden)]
pub enum Environment {
    #[sea_orm(iden = "environments")]
    Table,
    Id,
    Name,
    KeyName,
    BaseUrl,
    DatabaseName,
    Active,
}
