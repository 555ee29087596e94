use axum::{
    extract::{Path, State},
    Json,
};

use crate::error::AppResult;
use crate::response::ApiResponse;
use crate::services::station::{StationRequest, StationResponse};
use crate::AppState;

pub async fn list_stations(
    State(state): State<AppState>,
) -> AppResult<ApiResponse<Vec<StationResponse>>> {
    let stations = state.stations.get_all().await?;
    Ok(ApiResponse::ok("Stations retrieved", stations))
}

pub async fn get_station(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> AppResult<ApiResponse<StationResponse>> {
    let station = state.stations.get_by_id(&id).await?;
    Ok(ApiResponse::ok("Station retrieved", station))
}

pub async fn create_station(
    State(state): State<AppState>,
    Json(payload): Json<StationRequest>,
) -> AppResult<ApiResponse<StationResponse>> {
    payload.validate()?;
    let station = state.stations.create(payload).await?;
    Ok(ApiResponse::created("Station created", station))
}

pub async fn update_station(
    State(state): State<AppState>,
    Path(id): Path<String>,
    Json(payload): Json<StationRequest>,
) -> AppResult<ApiResponse<StationResponse>> {
    payload.validate()?;
    let station = state.stations.update(&id, payload).await?;
    Ok(ApiResponse::ok("Station updated", station))
}

pub async fn delete_station(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> AppResult<ApiResponse<()>> {
    state.stations.delete(&id).await?;
    Ok(ApiResponse::message("Station deleted"))
}
