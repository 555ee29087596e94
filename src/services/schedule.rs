use chrono::{DateTime, FixedOffset};
use sea_orm::{
    ActiveModelTrait, ColumnTrait, ConnectionTrait, DatabaseConnection, EntityTrait, QueryFilter,
    QueryOrder, Set,
};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::entities::{schedule, station, train};
use crate::error::{AppError, AppResult};
use crate::services::station::StationResponse;
use crate::utils::id::parse_id;
use crate::utils::time::{day_window, format_duration, format_wire_datetime, parse_wire_date, parse_wire_datetime};
use crate::utils::validation::required;

#[derive(Debug, Clone, Serialize)]
pub struct TrainInScheduleResponse {
    pub name: String,
    pub class: String,
}

#[derive(Debug, Clone, Serialize)]
pub struct ScheduleResponse {
    pub id: Uuid,
    pub train: TrainInScheduleResponse,
    pub origin_station: StationResponse,
    pub destination_station: StationResponse,
    pub departure_time: String,
    pub arrival_time: String,
    pub duration: String,
    pub price: f64,
    pub available_seats: i32,
}

#[derive(Debug, Deserialize)]
pub struct CreateScheduleRequest {
    pub train_id: String,
    pub origin_station_id: String,
    pub destination_station_id: String,
    pub departure_time: String,
    pub arrival_time: String,
    pub price: f64,
    pub available_seats: i32,
}

impl CreateScheduleRequest {
    pub fn validate(&self) -> AppResult<()> {
        required(&self.train_id, "train_id")?;
        required(&self.origin_station_id, "origin_station_id")?;
        required(&self.destination_station_id, "destination_station_id")?;
        validate_times_and_capacity(
            &self.departure_time,
            &self.arrival_time,
            self.price,
            self.available_seats,
        )
    }
}

#[derive(Debug, Deserialize)]
pub struct UpdateScheduleRequest {
    pub departure_time: String,
    pub arrival_time: String,
    pub price: f64,
    pub available_seats: i32,
}

impl UpdateScheduleRequest {
    pub fn validate(&self) -> AppResult<()> {
        validate_times_and_capacity(
            &self.departure_time,
            &self.arrival_time,
            self.price,
            self.available_seats,
        )
    }
}

fn validate_times_and_capacity(
    departure_time: &str,
    arrival_time: &str,
    price: f64,
    available_seats: i32,
) -> AppResult<()> {
    required(departure_time, "departure_time")?;
    required(arrival_time, "arrival_time")?;
    if !price.is_finite() || price <= 0.0 {
        return Err(AppError::InvalidInput("Field price must be greater than 0".to_string()));
    }
    if available_seats < 0 {
        return Err(AppError::InvalidInput(
            "Field available_seats must be at least 0".to_string(),
        ));
    }
    Ok(())
}

#[derive(Debug, Deserialize)]
pub struct SearchScheduleRequest {
    pub origin_station_id: String,
    pub destination_station_id: String,
    pub departure_date: String,
    pub passengers: i32,
}

impl SearchScheduleRequest {
    pub fn validate(&self) -> AppResult<()> {
        required(&self.origin_station_id, "origin_station_id")?;
        required(&self.destination_station_id, "destination_station_id")?;
        required(&self.departure_date, "departure_date")?;
        if self.passengers < 1 {
            return Err(AppError::InvalidInput(
                "Field passengers must be at least 1".to_string(),
            ));
        }
        Ok(())
    }
}

/// Schedule lookup, search and maintenance.
#[derive(Clone)]
pub struct ScheduleService {
    db: DatabaseConnection,
    offset: FixedOffset,
}

impl ScheduleService {
    pub fn new(db: DatabaseConnection, offset: FixedOffset) -> Self {
        Self { db, offset }
    }

    /// Resolve stations and train for display. Read-only.
    pub async fn build_response<C: ConnectionTrait>(
        &self,
        conn: &C,
        schedule: &schedule::Model,
    ) -> AppResult<ScheduleResponse> {
        let origin = station::Entity::find_by_id(schedule.origin_station_id)
            .one(conn)
            .await?
            .ok_or_else(|| AppError::NotFound("Origin station not found".to_string()))?;
        let destination = station::Entity::find_by_id(schedule.destination_station_id)
            .one(conn)
            .await?
            .ok_or_else(|| AppError::NotFound("Destination station not found".to_string()))?;
        let train = train::Entity::find_by_id(schedule.train_id)
            .one(conn)
            .await?
            .ok_or_else(|| AppError::NotFound("Train not found".to_string()))?;

        Ok(ScheduleResponse {
            id: schedule.id,
            train: TrainInScheduleResponse {
                name: train.name,
                class: train.class,
            },
            origin_station: origin.into(),
            destination_station: destination.into(),
            departure_time: format_wire_datetime(&schedule.departure_time, self.offset),
            arrival_time: format_wire_datetime(&schedule.arrival_time, self.offset),
            duration: format_duration(&schedule.departure_time, &schedule.arrival_time),
            price: schedule.price,
            available_seats: schedule.available_seats,
        })
    }

    /// Best-effort: schedules whose display data cannot be built are dropped.
    async fn build_responses(&self, schedules: Vec<schedule::Model>) -> Vec<ScheduleResponse> {
        let mut responses = Vec::with_capacity(schedules.len());
        for s in schedules {
            match self.build_response(&self.db, &s).await {
                Ok(response) => responses.push(response),
                Err(e) => {
                    tracing::warn!(schedule_id = %s.id, error = %e, "Skipping schedule in listing");
                }
            }
        }
        responses
    }

    pub async fn find_model(&self, id: Uuid) -> AppResult<schedule::Model> {
        schedule::Entity::find_by_id(id)
            .one(&self.db)
            .await?
            .ok_or_else(|| AppError::NotFound("Schedule not found".to_string()))
    }

    pub async fn get_all(&self) -> AppResult<Vec<ScheduleResponse>> {
        let schedules = schedule::Entity::find()
            .order_by_asc(schedule::Column::DepartureTime)
            .all(&self.db)
            .await?;
        Ok(self.build_responses(schedules).await)
    }

    pub async fn get_by_id(&self, id: &str) -> AppResult<ScheduleResponse> {
        let id = parse_id(id, "schedule")?;
        let schedule = self.find_model(id).await?;
        self.build_response(&self.db, &schedule).await
    }

    pub async fn create(&self, req: CreateScheduleRequest) -> AppResult<ScheduleResponse> {
        let train_id = parse_id(&req.train_id, "train")?;
        let origin_id = parse_id(&req.origin_station_id, "origin station")?;
        let destination_id = parse_id(&req.destination_station_id, "destination station")?;
        let (departure, arrival) = self.parse_times(&req.departure_time, &req.arrival_time)?;

        if origin_id == destination_id {
            return Err(AppError::InvalidInput(
                "Origin and destination must be different".to_string(),
            ));
        }

        train::Entity::find_by_id(train_id)
            .one(&self.db)
            .await?
            .ok_or_else(|| AppError::NotFound("Train not found".to_string()))?;
        for station_id in [origin_id, destination_id] {
            station::Entity::find_by_id(station_id)
                .one(&self.db)
                .await?
                .ok_or_else(|| AppError::NotFound("Station not found".to_string()))?;
        }

        let schedule = schedule::ActiveModel {
            id: Set(Uuid::new_v4()),
            train_id: Set(train_id),
            origin_station_id: Set(origin_id),
            destination_station_id: Set(destination_id),
            departure_time: Set(departure),
            arrival_time: Set(arrival),
            price: Set(req.price),
            available_seats: Set(req.available_seats),
        };

        let created = schedule.insert(&self.db).await?;
        tracing::info!(schedule_id = %created.id, "Schedule created");

        self.build_response(&self.db, &created).await
    }

    /// Administrative update. Overwrites `available_seats` as given.
    pub async fn update(&self, id: &str, req: UpdateScheduleRequest) -> AppResult<ScheduleResponse> {
        let id = parse_id(id, "schedule")?;
        let (departure, arrival) = self.parse_times(&req.departure_time, &req.arrival_time)?;

        let existing = self.find_model(id).await?;

        let mut active: schedule::ActiveModel = existing.into();
        active.departure_time = Set(departure);
        active.arrival_time = Set(arrival);
        active.price = Set(req.price);
        active.available_seats = Set(req.available_seats);

        let updated = active.update(&self.db).await?;
        tracing::info!(schedule_id = %updated.id, "Schedule updated");

        self.build_response(&self.db, &updated).await
    }

    pub async fn delete(&self, id: &str) -> AppResult<()> {
        let id = parse_id(id, "schedule")?;

        let result = schedule::Entity::delete_by_id(id)
            .exec(&self.db)
            .await
            .map_err(|e| AppError::still_referenced(e, "Schedule still has bookings"))?;

        if result.rows_affected == 0 {
            return Err(AppError::NotFound("Schedule not found".to_string()));
        }

        Ok(())
    }

    /// Schedules on the route departing within the requested calendar day
    /// that can still seat `passengers`.
    pub async fn search(&self, req: SearchScheduleRequest) -> AppResult<Vec<ScheduleResponse>> {
        let origin_id = parse_id(&req.origin_station_id, "origin station")?;
        let destination_id = parse_id(&req.destination_station_id, "destination station")?;
        let date = parse_wire_date(&req.departure_date)?;
        let (start, end) = day_window(date, self.offset);

        let schedules = schedule::Entity::find()
            .filter(schedule::Column::OriginStationId.eq(origin_id))
            .filter(schedule::Column::DestinationStationId.eq(destination_id))
            .filter(schedule::Column::DepartureTime.gte(start))
            .filter(schedule::Column::DepartureTime.lt(end))
            .order_by_asc(schedule::Column::DepartureTime)
            .all(&self.db)
            .await?;

        let matching = schedules
            .into_iter()
            .filter(|s| s.available_seats >= req.passengers)
            .collect();

        Ok(self.build_responses(matching).await)
    }

    fn parse_times(
        &self,
        departure: &str,
        arrival: &str,
    ) -> AppResult<(DateTime<FixedOffset>, DateTime<FixedOffset>)> {
        let departure = parse_wire_datetime(departure, self.offset)?;
        let arrival = parse_wire_datetime(arrival, self.offset)?;

        if arrival <= departure {
            return Err(AppError::InvalidInput(
                "Arrival time must be after departure time".to_string(),
            ));
        }

        Ok((departure, arrival))
    }
}
