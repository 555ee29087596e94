use axum::{
    extract::{Path, State},
    Extension, Json,
};

use crate::error::AppResult;
use crate::response::ApiResponse;
use crate::services::booking::{BookingResponse, CreateBookingRequest, UpdateBookingStatusRequest};
use crate::utils::jwt::Claims;
use crate::AppState;

/// Book seats on a schedule for the authenticated user
pub async fn create_booking(
    State(state): State<AppState>,
    Extension(claims): Extension<Claims>,
    Json(payload): Json<CreateBookingRequest>,
) -> AppResult<ApiResponse<BookingResponse>> {
    payload.validate()?;
    let booking = state
        .bookings
        .create_booking(&claims.sub.to_string(), payload)
        .await?;
    Ok(ApiResponse::created("Booking created", booking))
}

/// Bookings of the authenticated user, newest first
pub async fn my_bookings(
    State(state): State<AppState>,
    Extension(claims): Extension<Claims>,
) -> AppResult<ApiResponse<Vec<BookingResponse>>> {
    let bookings = state
        .bookings
        .get_bookings_by_user_id(&claims.sub.to_string())
        .await?;
    Ok(ApiResponse::ok("Bookings retrieved", bookings))
}

pub async fn get_booking(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> AppResult<ApiResponse<BookingResponse>> {
    let booking = state.bookings.get_booking_by_id(&id).await?;
    Ok(ApiResponse::ok("Booking retrieved", booking))
}

/// Set a booking's status. Moving to `CANCELLED` releases its seats, same as the cancel route.
pub async fn update_booking_status(
    State(state): State<AppState>,
    Path(id): Path<String>,
    Json(payload): Json<UpdateBookingStatusRequest>,
) -> AppResult<ApiResponse<()>> {
    payload.validate()?;
    state
        .bookings
        .update_booking_status(&id, &payload.status)
        .await?;
    Ok(ApiResponse::message("Booking status updated"))
}

pub async fn cancel_booking(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> AppResult<ApiResponse<()>> {
    state.bookings.cancel_booking(&id).await?;
    Ok(ApiResponse::message("Booking cancelled"))
}

/// Administrative delete; does not return seats to the schedule
pub async fn delete_booking(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> AppResult<ApiResponse<()>> {
    state.bookings.delete_booking(&id).await?;
    Ok(ApiResponse::message("Booking deleted"))
}
