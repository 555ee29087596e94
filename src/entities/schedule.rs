use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "schedule")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,
    pub train_id: Uuid,
    pub origin_station_id: Uuid,
    pub destination_station_id: Uuid,
    pub departure_time: DateTimeWithTimeZone,
    pub arrival_time: DateTimeWithTimeZone,
    #[sea_orm(column_type = "Double")]
    pub price: f64,
    /// Only moved by the booking lifecycle through `store::inventory`
    pub available_seats: i32,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::train::Entity",
        from = "Column::TrainId",
        to = "super::train::Column::Id"
    )]
    Train,
    #[sea_orm(
        belongs_to = "super::station::Entity",
        from = "Column::OriginStationId",
        to = "super::station::Column::Id"
    )]
    OriginStation,
    #[sea_orm(
        belongs_to = "super::station::Entity",
        from = "Column::DestinationStationId",
        to = "super::station::Column::Id"
    )]
    DestinationStation,
    #[sea_orm(has_many = "super::booking::Entity")]
    Bookings,
}

impl Related<super::train::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Train.def()
    }
}

impl Related<super::booking::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Bookings.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
