use sea_orm_migration::{prelude::*, schema::*};

use super::m20250301_000001_create_stations::Station;
use super::m20250301_000003_create_trains::Train;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(Schedule::Table)
                    .if_not_exists()
                    .col(uuid(Schedule::Id).primary_key())
                    .col(uuid(Schedule::TrainId).not_null())
                    .col(uuid(Schedule::OriginStationId).not_null())
                    .col(uuid(Schedule::DestinationStationId).not_null())
                    .col(timestamp_with_time_zone(Schedule::DepartureTime).not_null())
                    .col(timestamp_with_time_zone(Schedule::ArrivalTime).not_null())
                    .col(double(Schedule::Price).not_null())
                    .col(
                        integer(Schedule::AvailableSeats)
                            .not_null()
                            .check(Expr::col(Schedule::AvailableSeats).gte(0)),
                    )
                    .foreign_key(
                        // NO ACTION: deleting a still-referenced row fails with a plain FK violation
                        ForeignKey::create()
                            .name("fk_schedule_train")
                            .from(Schedule::Table, Schedule::TrainId)
                            .to(Train::Table, Train::Id),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_schedule_origin_station")
                            .from(Schedule::Table, Schedule::OriginStationId)
                            .to(Station::Table, Station::Id),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_schedule_destination_station")
                            .from(Schedule::Table, Schedule::DestinationStationId)
                            .to(Station::Table, Station::Id),
                    )
                    .to_owned(),
            )
            .await?;

        // Search filters on the route and the departure window
        manager
            .create_index(
                Index::create()
                    .name("idx_schedule_route_departure")
                    .table(Schedule::Table)
                    .col(Schedule::OriginStationId)
                    .col(Schedule::DestinationStationId)
                    .col(Schedule::DepartureTime)
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(Schedule::Table).to_owned())
            .await
    }
}

#[derive(DeriveIden)]
pub enum Schedule {
    Table,
    Id,
    TrainId,
    OriginStationId,
    DestinationStationId,
    DepartureTime,
    ArrivalTime,
    Price,
    AvailableSeats,
}
