use std::collections::HashSet;

use sea_orm::{ActiveModelTrait, DatabaseConnection, EntityTrait, QueryOrder, Set};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::entities::train::{self, Carriage, SeatMap};
use crate::error::{AppError, AppResult};
use crate::utils::id::parse_id;
use crate::utils::validation::required;

#[derive(Debug, Deserialize)]
pub struct TrainRequest {
    pub name: String,
    pub class: String,
    pub carriages: Vec<Carriage>,
}

impl TrainRequest {
    pub fn validate(&self) -> AppResult<()> {
        required(&self.name, "name")?;
        required(&self.class, "class")?;

        // Seat codes identify seats across the whole train
        let mut seen = HashSet::new();
        for carriage in &self.carriages {
            required(&carriage.code, "carriages.code")?;
            for seat in &carriage.seats {
                required(&seat.code, "carriages.seats.code")?;
                if !seen.insert(seat.code.as_str()) {
                    return Err(AppError::InvalidInput(format!(
                        "Duplicate seat code {}",
                        seat.code
                    )));
                }
            }
        }
        Ok(())
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct TrainResponse {
    pub id: Uuid,
    pub name: String,
    pub class: String,
    pub total_seats: usize,
    pub carriages: Vec<Carriage>,
}

impl From<train::Model> for TrainResponse {
    fn from(t: train::Model) -> Self {
        Self {
            id: t.id,
            name: t.name,
            class: t.class,
            total_seats: t.carriages.total_seats(),
            carriages: t.carriages.0,
        }
    }
}

#[derive(Clone)]
pub struct TrainService {
    db: DatabaseConnection,
}

impl TrainService {
    pub fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }

    pub async fn get_all(&self) -> AppResult<Vec<TrainResponse>> {
        let trains = train::Entity::find()
            .order_by_asc(train::Column::Name)
            .all(&self.db)
            .await?;
        Ok(trains.into_iter().map(TrainResponse::from).collect())
    }

    pub async fn get_by_id(&self, id: &str) -> AppResult<TrainResponse> {
        let id = parse_id(id, "train")?;
        Ok(self.find_model(id).await?.into())
    }

    pub async fn create(&self, req: TrainRequest) -> AppResult<TrainResponse> {
        let train = train::ActiveModel {
            id: Set(Uuid::new_v4()),
            name: Set(req.name.trim().to_string()),
            class: Set(req.class.trim().to_string()),
            carriages: Set(SeatMap(req.carriages)),
        };

        let created = train.insert(&self.db).await?;
        tracing::info!(
            train_id = %created.id,
            seats = created.carriages.total_seats(),
            "Train created"
        );
        Ok(created.into())
    }

    pub async fn update(&self, id: &str, req: TrainRequest) -> AppResult<TrainResponse> {
        let id = parse_id(id, "train")?;
        let existing = self.find_model(id).await?;

        let mut active: train::ActiveModel = existing.into();
        active.name = Set(req.name.trim().to_string());
        active.class = Set(req.class.trim().to_string());
        active.carriages = Set(SeatMap(req.carriages));

        Ok(active.update(&self.db).await?.into())
    }

    pub async fn delete(&self, id: &str) -> AppResult<()> {
        let id = parse_id(id, "train")?;

        let result = train::Entity::delete_by_id(id)
            .exec(&self.db)
            .await
            .map_err(|e| AppError::still_referenced(e, "Train is used by a schedule"))?;

        if result.rows_affected == 0 {
            return Err(AppError::NotFound("Train not found".to_string()));
        }

        Ok(())
    }

    pub async fn find_model(&self, id: Uuid) -> AppResult<train::Model> {
        train::Entity::find_by_id(id)
            .one(&self.db)
            .await?
            .ok_or_else(|| AppError::NotFound("Train not found".to_string()))
    }
}
