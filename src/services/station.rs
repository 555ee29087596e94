use sea_orm::{ActiveModelTrait, DatabaseConnection, EntityTrait, QueryOrder, Set};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::entities::station;
use crate::error::{AppError, AppResult};
use crate::utils::id::parse_id;
use crate::utils::validation::{len_between, required};

#[derive(Debug, Deserialize)]
pub struct StationRequest {
    pub name: String,
    pub city: String,
    pub code: String,
}

impl StationRequest {
    pub fn validate(&self) -> AppResult<()> {
        required(&self.name, "name")?;
        required(&self.city, "city")?;
        len_between(self.code.trim(), 2, 4, "code")
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct StationResponse {
    pub id: Uuid,
    pub name: String,
    pub city: String,
    pub code: String,
}

impl From<station::Model> for StationResponse {
    fn from(s: station::Model) -> Self {
        Self {
            id: s.id,
            name: s.name,
            city: s.city,
            code: s.code,
        }
    }
}

#[derive(Clone)]
pub struct StationService {
    db: DatabaseConnection,
}

impl StationService {
    pub fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }

    pub async fn get_all(&self) -> AppResult<Vec<StationResponse>> {
        let stations = station::Entity::find()
            .order_by_asc(station::Column::Name)
            .all(&self.db)
            .await?;
        Ok(stations.into_iter().map(StationResponse::from).collect())
    }

    pub async fn get_by_id(&self, id: &str) -> AppResult<StationResponse> {
        let id = parse_id(id, "station")?;
        Ok(self.find_model(id).await?.into())
    }

    pub async fn create(&self, req: StationRequest) -> AppResult<StationResponse> {
        let station = station::ActiveModel {
            id: Set(Uuid::new_v4()),
            name: Set(req.name.trim().to_string()),
            city: Set(req.city.trim().to_string()),
            code: Set(req.code.trim().to_uppercase()),
            is_active: Set(true),
        };

        let created = station.insert(&self.db).await?;
        tracing::info!(station_id = %created.id, code = %created.code, "Station created");
        Ok(created.into())
    }

    pub async fn update(&self, id: &str, req: StationRequest) -> AppResult<StationResponse> {
        let id = parse_id(id, "station")?;
        let existing = self.find_model(id).await?;

        let mut active: station::ActiveModel = existing.into();
        active.name = Set(req.name.trim().to_string());
        active.city = Set(req.city.trim().to_string());
        active.code = Set(req.code.trim().to_uppercase());

        Ok(active.update(&self.db).await?.into())
    }

    pub async fn delete(&self, id: &str) -> AppResult<()> {
        let id = parse_id(id, "station")?;

        let result = station::Entity::delete_by_id(id)
            .exec(&self.db)
            .await
            .map_err(|e| AppError::still_referenced(e, "Station is used by a schedule"))?;

        if result.rows_affected == 0 {
            return Err(AppError::NotFound("Station not found".to_string()));
        }

        Ok(())
    }

    async fn find_model(&self, id: Uuid) -> AppResult<station::Model> {
        station::Entity::find_by_id(id)
            .one(&self.db)
            .await?
            .ok_or_else(|| AppError::NotFound("Station not found".to_string()))
    }
}
