//! Per-seat availability for a schedule, derived from the train's seat map
//! and the seat assignments of its bookings. Never writes.

use std::collections::HashSet;

use sea_orm::DatabaseConnection;
use serde::Serialize;

use crate::entities::booking;
use crate::entities::train::SeatMap;
use crate::error::AppResult;
use crate::services::schedule::ScheduleService;
use crate::services::train::TrainService;
use crate::store;
use crate::utils::id::parse_id;

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SeatAvailability {
    pub code: String,
    pub is_available: bool,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CarriageLayout {
    pub code: String,
    pub seats: Vec<SeatAvailability>,
}

/// Seat codes held by the given bookings. Cancelled bookings hold nothing.
pub fn taken_seats(bookings: &[booking::Model]) -> HashSet<&str> {
    bookings
        .iter()
        .filter(|b| !b.is_cancelled())
        .flat_map(|b| b.passengers.0.iter())
        .map(|p| p.seat_code.as_str())
        .filter(|code| !code.is_empty())
        .collect()
}

/// Diff the full seat map against the taken set, keeping carriage and seat order.
pub fn compute_layout(seat_map: &SeatMap, bookings: &[booking::Model]) -> Vec<CarriageLayout> {
    let taken = taken_seats(bookings);

    seat_map
        .0
        .iter()
        .map(|carriage| CarriageLayout {
            code: carriage.code.clone(),
            seats: carriage
                .seats
                .iter()
                .map(|seat| SeatAvailability {
                    code: seat.code.clone(),
                    is_available: !taken.contains(seat.code.as_str()),
                })
                .collect(),
        })
        .collect()
}

#[derive(Clone)]
pub struct SeatLayoutService {
    db: DatabaseConnection,
    schedules: ScheduleService,
    trains: TrainService,
}

impl SeatLayoutService {
    pub fn new(db: DatabaseConnection, schedules: ScheduleService, trains: TrainService) -> Self {
        Self {
            db,
            schedules,
            trains,
        }
    }

    pub async fn get_seat_layout(&self, schedule_id: &str) -> AppResult<Vec<CarriageLayout>> {
        let schedule_id = parse_id(schedule_id, "schedule")?;

        let schedule = self.schedules.find_model(schedule_id).await?;
        let train = self.trains.find_model(schedule.train_id).await?;
        let bookings = store::booking::find_by_schedule(&self.db, schedule_id).await?;

        Ok(compute_layout(&train.carriages, &bookings))
    }
}
