use sea_orm_migration::{prelude::*, schema::*};

use super::m20250301_000002_create_users::User;
use super::m20250301_000004_create_schedules::Schedule;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(Booking::Table)
                    .if_not_exists()
                    .col(uuid(Booking::Id).primary_key())
                    .col(uuid(Booking::UserId).not_null())
                    .col(uuid(Booking::ScheduleId).not_null())
                    .col(string_len(Booking::BookingCode, 8).not_null().unique_key())
                    .col(json(Booking::Booker).not_null())
                    .col(json(Booking::Passengers).not_null())
                    .col(double(Booking::TotalPrice).not_null())
                    .col(double(Booking::AdminFee).not_null())
                    .col(string_len(Booking::Status, 32).not_null())
                    .col(timestamp_with_time_zone(Booking::PaymentExpiry).not_null())
                    .col(
                        timestamp_with_time_zone(Booking::CreatedAt)
                            .not_null()
                            .default(Expr::current_timestamp()),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_booking_user")
                            .from(Booking::Table, Booking::UserId)
                            .to(User::Table, User::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .foreign_key(
                        // NO ACTION: deleting a still-referenced row fails with a plain FK violation
                        ForeignKey::create()
                            .name("fk_booking_schedule")
                            .from(Booking::Table, Booking::ScheduleId)
                            .to(Schedule::Table, Schedule::Id),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx_booking_user")
                    .table(Booking::Table)
                    .col(Booking::UserId)
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx_booking_schedule")
                    .table(Booking::Table)
                    .col(Booking::ScheduleId)
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(Booking::Table).to_owned())
            .await
    }
}

#[derive(DeriveIden)]
pub enum Booking {
    Table,
    Id,
    UserId,
    ScheduleId,
    BookingCode,
    Booker,
    Passengers,
    TotalPrice,
    AdminFee,
    Status,
    PaymentExpiry,
    CreatedAt,
}
