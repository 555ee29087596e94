use axum::{
    extract::{Path, State},
    Json,
};

use crate::error::AppResult;
use crate::response::ApiResponse;
use crate::services::schedule::{
    CreateScheduleRequest, ScheduleResponse, SearchScheduleRequest, UpdateScheduleRequest,
};
use crate::services::seat_layout::CarriageLayout;
use crate::AppState;

/// Search schedules by route, departure date and party size
pub async fn search_schedules(
    State(state): State<AppState>,
    Json(payload): Json<SearchScheduleRequest>,
) -> AppResult<ApiResponse<Vec<ScheduleResponse>>> {
    payload.validate()?;
    let schedules = state.schedules.search(payload).await?;
    Ok(ApiResponse::ok("Schedules retrieved", schedules))
}

pub async fn list_schedules(
    State(state): State<AppState>,
) -> AppResult<ApiResponse<Vec<ScheduleResponse>>> {
    let schedules = state.schedules.get_all().await?;
    Ok(ApiResponse::ok("Schedules retrieved", schedules))
}

pub async fn get_schedule(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> AppResult<ApiResponse<ScheduleResponse>> {
    let schedule = state.schedules.get_by_id(&id).await?;
    Ok(ApiResponse::ok("Schedule retrieved", schedule))
}

/// Seat map of the schedule's train with per-seat availability
pub async fn get_seat_layout(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> AppResult<ApiResponse<Vec<CarriageLayout>>> {
    let layout = state.seat_layouts.get_seat_layout(&id).await?;
    Ok(ApiResponse::ok("Seat layout retrieved", layout))
}

pub async fn create_schedule(
    State(state): State<AppState>,
    Json(payload): Json<CreateScheduleRequest>,
) -> AppResult<ApiResponse<ScheduleResponse>> {
    payload.validate()?;
    let schedule = state.schedules.create(payload).await?;
    Ok(ApiResponse::created("Schedule created", schedule))
}

pub async fn update_schedule(
    State(state): State<AppState>,
    Path(id): Path<String>,
    Json(payload): Json<UpdateScheduleRequest>,
) -> AppResult<ApiResponse<ScheduleResponse>> {
    payload.validate()?;
    let schedule = state.schedules.update(&id, payload).await?;
    Ok(ApiResponse::ok("Schedule updated", schedule))
}

pub async fn delete_schedule(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> AppResult<ApiResponse<()>> {
    state.schedules.delete(&id).await?;
    Ok(ApiResponse::message("Schedule deleted"))
}
