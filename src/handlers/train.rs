use axum::{
    extract::{Path, State},
    Json,
};

use crate::error::AppResult;
use crate::response::ApiResponse;
use crate::services::train::{TrainRequest, TrainResponse};
use crate::AppState;

pub async fn list_trains(
    State(state): State<AppState>,
) -> AppResult<ApiResponse<Vec<TrainResponse>>> {
    let trains = state.trains.get_all().await?;
    Ok(ApiResponse::ok("Trains retrieved", trains))
}

pub async fn get_train(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> AppResult<ApiResponse<TrainResponse>> {
    let train = state.trains.get_by_id(&id).await?;
    Ok(ApiResponse::ok("Train retrieved", train))
}

pub async fn create_train(
    State(state): State<AppState>,
    Json(payload): Json<TrainRequest>,
) -> AppResult<ApiResponse<TrainResponse>> {
    payload.validate()?;
    let train = state.trains.create(payload).await?;
    Ok(ApiResponse::created("Train created", train))
}

pub async fn update_train(
    State(state): State<AppState>,
    Path(id): Path<String>,
    Json(payload): Json<TrainRequest>,
) -> AppResult<ApiResponse<TrainResponse>> {
    payload.validate()?;
    let train = state.trains.update(&id, payload).await?;
    Ok(ApiResponse::ok("Train updated", train))
}

pub async fn delete_train(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> AppResult<ApiResponse<()>> {
    state.trains.delete(&id).await?;
    Ok(ApiResponse::message("Train deleted"))
}
