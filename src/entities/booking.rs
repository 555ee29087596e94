use sea_orm::entity::prelude::*;
use sea_orm::FromJsonQueryResult;
use serde::{Deserialize, Serialize};

pub const STATUS_PENDING_PAYMENT: &str = "PENDING_PAYMENT";
pub const STATUS_PAID: &str = "PAID";
pub const STATUS_CANCELLED: &str = "CANCELLED";

/// Statuses that reject any further status update
pub const TERMINAL_STATUSES: [&str; 2] = [STATUS_PAID, STATUS_CANCELLED];

pub fn is_terminal(status: &str) -> bool {
    TERMINAL_STATUSES.contains(&status)
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize, FromJsonQueryResult)]
pub struct BookerInfo {
    pub full_name: String,
    pub email: String,
    pub phone_number: String,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Passenger {
    pub full_name: String,
    pub identity_number: String,
    pub seat_code: String,
}

#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize, FromJsonQueryResult)]
pub struct Passengers(pub Vec<Passenger>);

#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "booking")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,
    pub user_id: Uuid,
    pub schedule_id: Uuid,
    #[sea_orm(unique)]
    pub booking_code: String,
    #[sea_orm(column_type = "Json")]
    pub booker: BookerInfo,
    #[sea_orm(column_type = "Json")]
    pub passengers: Passengers,
    #[sea_orm(column_type = "Double")]
    pub total_price: f64,
    #[sea_orm(column_type = "Double")]
    pub admin_fee: f64,
    pub status: String,
    pub payment_expiry: DateTimeWithTimeZone,
    pub created_at: DateTimeWithTimeZone,
}

impl Model {
    pub fn passenger_count(&self) -> i32 {
        self.passengers.0.len() as i32
    }

    pub fn is_cancelled(&self) -> bool {
        self.status == STATUS_CANCELLED
    }
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::schedule::Entity",
        from = "Column::ScheduleId",
        to = "super::schedule::Column::Id"
    )]
    Schedule,
    #[sea_orm(
        belongs_to = "super::user::Entity",
        from = "Column::UserId",
        to = "super::user::Column::Id"
    )]
    User,
}

impl Related<super::schedule::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Schedule.def()
    }
}

impl Related<super::user::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::User.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
