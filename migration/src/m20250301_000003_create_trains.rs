use sea_orm_migration::{prelude::*, schema::*};

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        // Carriages and their seats are stored inline as JSON
        manager
            .create_table(
                Table::create()
                    .table(Train::Table)
                    .if_not_exists()
                    .col(uuid(Train::Id).primary_key())
                    .col(string_len(Train::Name, 100).not_null())
                    .col(string_len(Train::Class, 50).not_null())
                    .col(json(Train::Carriages).not_null())
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(Train::Table).to_owned())
            .await
    }
}

#[derive(DeriveIden)]
pub enum Train {
    Table,
    Id,
    Name,
    Class,
    Carriages,
}
