use sea_orm_migration::{prelude::*, schema::*};

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(Station::Table)
                    .if_not_exists()
                    .col(uuid(Station::Id).primary_key())
                    .col(string_len(Station::Name, 100).not_null())
                    .col(string_len(Station::City, 100).not_null())
                    .col(string_len(Station::Code, 4).not_null())
                    .col(boolean(Station::IsActive).not_null().default(true))
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(Station::Table).to_owned())
            .await
    }
}

#[derive(DeriveIden)]
pub enum Station {
    Table,
    Id,
    Name,
    City,
    Code,
    IsActive,
}
