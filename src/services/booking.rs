//! Booking lifecycle: create, cancel, status updates and administrative delete.
//!
//! Create and cancel run inside one storage transaction. The seat counter is
//! moved with a conditional update (see [`store::inventory`]), so concurrent
//! bookings cannot oversell a schedule, and any failed step rolls back the
//! counter together with the booking row.

use chrono::{Duration, FixedOffset, Utc};
use sea_orm::{ConnectionTrait, DatabaseConnection, EntityTrait, Set, TransactionTrait};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::entities::booking::{self, BookerInfo, Passenger, Passengers};
use crate::entities::schedule;
use crate::error::{AppError, AppResult};
use crate::services::schedule::{ScheduleResponse, ScheduleService};
use crate::store::{self, inventory};
use crate::utils::booking_code;
use crate::utils::id::parse_id;
use crate::utils::time::format_wire_datetime;
use crate::utils::validation::{email, len_between, required};

/// Flat surcharge added to every booking
pub const ADMIN_FEE: f64 = 7500.0;
pub const PAYMENT_WINDOW_MINUTES: i64 = 30;
const BOOKING_CODE_ATTEMPTS: usize = 5;

#[derive(Debug, Deserialize)]
pub struct BookerRequest {
    pub full_name: String,
    pub email: String,
    pub phone_number: String,
}

#[derive(Debug, Deserialize)]
pub struct PassengerRequest {
    pub full_name: String,
    pub identity_number: String,
    pub seat_code: String,
}

#[derive(Debug, Deserialize)]
pub struct CreateBookingRequest {
    pub schedule_id: String,
    pub booker: BookerRequest,
    pub passengers: Vec<PassengerRequest>,
}

impl CreateBookingRequest {
    pub fn validate(&self) -> AppResult<()> {
        required(&self.schedule_id, "schedule_id")?;
        required(&self.booker.full_name, "booker.full_name")?;
        email(&self.booker.email, "booker.email")?;
        required(&self.booker.phone_number, "booker.phone_number")?;

        if self.passengers.is_empty() {
            return Err(AppError::InvalidInput(
                "At least one passenger is required".to_string(),
            ));
        }
        for p in &self.passengers {
            required(&p.full_name, "passengers.full_name")?;
            len_between(&p.identity_number, 16, 16, "passengers.identity_number")?;
            required(&p.seat_code, "passengers.seat_code")?;
        }
        Ok(())
    }
}

/// Free-form target status. `PAID` and `CANCELLED` bookings reject any change;
/// a target of `CANCELLED` also returns the booking's seats to the schedule.
#[derive(Debug, Deserialize)]
pub struct UpdateBookingStatusRequest {
    pub status: String,
}

impl UpdateBookingStatusRequest {
    pub fn validate(&self) -> AppResult<()> {
        required(&self.status, "status")
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct BookingResponse {
    pub id: Uuid,
    pub booking_code: String,
    pub schedule: ScheduleResponse,
    pub booker: BookerInfo,
    pub passengers: Vec<Passenger>,
    pub total_price: f64,
    pub admin_fee: f64,
    pub status: String,
    pub payment_expiry: String,
    pub created_at: String,
}

impl BookingResponse {
    fn new(booking: booking::Model, schedule: ScheduleResponse, offset: FixedOffset) -> Self {
        Self {
            id: booking.id,
            booking_code: booking.booking_code,
            schedule,
            booker: booking.booker,
            passengers: booking.passengers.0,
            total_price: booking.total_price,
            admin_fee: booking.admin_fee,
            status: booking.status,
            payment_expiry: format_wire_datetime(&booking.payment_expiry, offset),
            created_at: format_wire_datetime(&booking.created_at, offset),
        }
    }
}

pub fn total_price(fare: f64, passengers: i32) -> f64 {
    fare * f64::from(passengers) + ADMIN_FEE
}

#[derive(Clone)]
pub struct BookingService {
    db: DatabaseConnection,
    schedules: ScheduleService,
    offset: FixedOffset,
}

impl BookingService {
    pub fn new(db: DatabaseConnection, schedules: ScheduleService, offset: FixedOffset) -> Self {
        Self {
            db,
            schedules,
            offset,
        }
    }

    pub async fn create_booking(
        &self,
        user_id: &str,
        req: CreateBookingRequest,
    ) -> AppResult<BookingResponse> {
        let user_id = parse_id(user_id, "user")?;
        let schedule_id = parse_id(&req.schedule_id, "schedule")?;

        if req.passengers.is_empty() {
            return Err(AppError::InvalidInput(
                "At least one passenger is required".to_string(),
            ));
        }
        let seats = i32::try_from(req.passengers.len())
            .map_err(|_| AppError::InvalidInput("Too many passengers".to_string()))?;

        let txn = self.db.begin().await?;

        let schedule = find_schedule(&txn, schedule_id).await?;
        inventory::reserve_seats(&txn, schedule_id, seats).await?;

        let code = unique_booking_code(&txn).await?;
        let created_at = Utc::now().with_timezone(&self.offset);
        let passengers = req
            .passengers
            .into_iter()
            .map(|p| Passenger {
                full_name: p.full_name,
                identity_number: p.identity_number,
                seat_code: p.seat_code,
            })
            .collect();

        let booking = store::booking::insert(
            &txn,
            booking::ActiveModel {
                id: Set(Uuid::new_v4()),
                user_id: Set(user_id),
                schedule_id: Set(schedule_id),
                booking_code: Set(code),
                booker: Set(BookerInfo {
                    full_name: req.booker.full_name,
                    email: req.booker.email,
                    phone_number: req.booker.phone_number,
                }),
                passengers: Set(Passengers(passengers)),
                total_price: Set(total_price(schedule.price, seats)),
                admin_fee: Set(ADMIN_FEE),
                status: Set(booking::STATUS_PENDING_PAYMENT.to_string()),
                payment_expiry: Set(created_at + Duration::minutes(PAYMENT_WINDOW_MINUTES)),
                created_at: Set(created_at),
            },
        )
        .await?;

        // Built before commit so a broken schedule view aborts the whole booking
        let schedule = find_schedule(&txn, schedule_id).await?;
        let schedule_view = self.schedules.build_response(&txn, &schedule).await?;

        txn.commit().await?;

        tracing::info!(
            booking_id = %booking.id,
            booking_code = %booking.booking_code,
            schedule_id = %schedule_id,
            seats,
            remaining = schedule.available_seats,
            "Booking created"
        );

        Ok(BookingResponse::new(booking, schedule_view, self.offset))
    }

    pub async fn get_booking_by_id(&self, id: &str) -> AppResult<BookingResponse> {
        let id = parse_id(id, "booking")?;
        let booking = store::booking::find_by_id(&self.db, id).await?;
        self.to_response(booking).await
    }

    /// Best-effort: bookings whose view cannot be built are left out.
    pub async fn get_bookings_by_user_id(&self, user_id: &str) -> AppResult<Vec<BookingResponse>> {
        let user_id = parse_id(user_id, "user")?;
        let bookings = store::booking::find_by_user(&self.db, user_id).await?;

        let mut responses = Vec::with_capacity(bookings.len());
        for b in bookings {
            let booking_id = b.id;
            match self.to_response(b).await {
                Ok(response) => responses.push(response),
                Err(e) => {
                    tracing::warn!(booking_id = %booking_id, error = %e, "Skipping booking in listing");
                }
            }
        }

        Ok(responses)
    }

    /// `PAID` and `CANCELLED` bookings reject every update. Moving a booking to
    /// `CANCELLED` through here releases its seats like [`Self::cancel_booking`].
    pub async fn update_booking_status(&self, id: &str, status: &str) -> AppResult<()> {
        let id = parse_id(id, "booking")?;
        let status = status.trim();
        required(status, "status")?;

        let txn = self.db.begin().await?;
        let booking = store::booking::find_by_id(&txn, id).await?;

        if !store::booking::set_status_unless_terminal(&txn, id, status).await? {
            let current = store::booking::find_by_id(&txn, id).await?.status;
            return Err(AppError::InvalidStateTransition(format!(
                "Booking status cannot be changed from {}",
                current
            )));
        }

        if status == booking::STATUS_CANCELLED {
            inventory::release_seats(&txn, booking.schedule_id, booking.passenger_count()).await?;
        }

        txn.commit().await?;

        tracing::info!(booking_id = %id, from = %booking.status, to = %status, "Booking status updated");
        Ok(())
    }

    /// Release the booking's seats and mark it `CANCELLED`. Cancelling twice is a no-op.
    pub async fn cancel_booking(&self, id: &str) -> AppResult<()> {
        let id = parse_id(id, "booking")?;

        let txn = self.db.begin().await?;

        // Flip the status first; the row read afterwards is the one this call changed
        let changed = store::booking::mark_cancelled(&txn, id).await?;
        let booking = store::booking::find_by_id(&txn, id).await?;

        if !changed {
            tracing::info!(booking_id = %id, "Booking already cancelled");
            return Ok(());
        }

        inventory::release_seats(&txn, booking.schedule_id, booking.passenger_count()).await?;
        txn.commit().await?;

        tracing::info!(
            booking_id = %id,
            schedule_id = %booking.schedule_id,
            released = booking.passenger_count(),
            "Booking cancelled"
        );
        Ok(())
    }

    /// Administrative removal. Seats held by the booking are not returned to
    /// the schedule; capacity must be reconciled separately.
    pub async fn delete_booking(&self, id: &str) -> AppResult<()> {
        let id = parse_id(id, "booking")?;
        store::booking::delete(&self.db, id).await?;

        tracing::warn!(booking_id = %id, "Booking deleted without releasing seats");
        Ok(())
    }

    async fn to_response(&self, booking: booking::Model) -> AppResult<BookingResponse> {
        let schedule = self.schedules.find_model(booking.schedule_id).await?;
        let schedule_view = self.schedules.build_response(&self.db, &schedule).await?;
        Ok(BookingResponse::new(booking, schedule_view, self.offset))
    }
}

async fn find_schedule<C: ConnectionTrait>(conn: &C, id: Uuid) -> AppResult<schedule::Model> {
    schedule::Entity::find_by_id(id)
        .one(conn)
        .await?
        .ok_or_else(|| AppError::NotFound("Schedule not found".to_string()))
}

async fn unique_booking_code<C: ConnectionTrait>(conn: &C) -> AppResult<String> {
    for _ in 0..BOOKING_CODE_ATTEMPTS {
        let code = booking_code::generate();
        if !store::booking::code_exists(conn, &code).await? {
            return Ok(code);
        }
        tracing::debug!(code = %code, "Booking code collision, regenerating");
    }

    Err(AppError::Internal(
        "Could not generate a unique booking code".to_string(),
    ))
}
