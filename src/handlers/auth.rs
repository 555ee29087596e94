use axum::{extract::State, Json};
use chrono::Utc;
use sea_orm::{ActiveModelTrait, ColumnTrait, EntityTrait, QueryFilter, Set};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::entities::user;
use crate::error::{AppError, AppResult};
use crate::response::ApiResponse;
use crate::utils::jwt::create_token;
use crate::utils::password::{hash_password, verify_password};
use crate::utils::validation::{email, len_between, min_len, required};
use crate::AppState;

#[derive(Debug, Deserialize)]
pub struct RegisterRequest {
    pub full_name: String,
    pub email: String,
    pub phone_number: String,
    pub identity_number: String,
    pub password: String,
    pub confirm_password: String,
}

impl RegisterRequest {
    fn validate(&self) -> AppResult<()> {
        required(&self.full_name, "full_name")?;
        min_len(self.full_name.trim(), 3, "full_name")?;
        email(&self.email, "email")?;
        min_len(&self.phone_number, 10, "phone_number")?;
        len_between(&self.identity_number, 16, 16, "identity_number")?;
        min_len(&self.password, 6, "password")?;
        if self.password != self.confirm_password {
            return Err(AppError::InvalidInput(
                "Field confirm_password must match password".to_string(),
            ));
        }
        Ok(())
    }
}

#[derive(Debug, Deserialize)]
pub struct LoginRequest {
    pub email: String,
    pub password: String,
}

#[derive(Debug, Serialize)]
pub struct LoginResponse {
    pub token: String,
}

#[derive(Debug, Serialize)]
pub struct UserInfo {
    pub id: Uuid,
    pub full_name: String,
    pub email: String,
    pub phone_number: String,
    pub identity_number: String,
}

impl From<user::Model> for UserInfo {
    fn from(user: user::Model) -> Self {
        Self {
            id: user.id,
            full_name: user.full_name,
            email: user.email,
            phone_number: user.phone_number,
            identity_number: user.identity_number,
        }
    }
}

/// Register a new passenger account
pub async fn register(
    State(state): State<AppState>,
    Json(payload): Json<RegisterRequest>,
) -> AppResult<ApiResponse<UserInfo>> {
    payload.validate()?;
    let email = payload.email.trim().to_lowercase();

    let existing = user::Entity::find()
        .filter(user::Column::Email.eq(&email))
        .one(&state.db)
        .await?;

    if existing.is_some() {
        return Err(AppError::Conflict("Email already registered".to_string()));
    }

    let password_hash = hash_password(&payload.password)?;

    let now = Utc::now().with_timezone(&state.config.utc_offset());
    let new_user = user::ActiveModel {
        id: Set(Uuid::new_v4()),
        full_name: Set(payload.full_name.trim().to_string()),
        email: Set(email),
        password_hash: Set(password_hash),
        phone_number: Set(payload.phone_number),
        identity_number: Set(payload.identity_number),
        created_at: Set(now),
        updated_at: Set(now),
    };

    // A concurrent registration can still hit the unique index
    let user = new_user
        .insert(&state.db)
        .await
        .map_err(|e| AppError::duplicate(e, "Email already registered"))?;

    tracing::info!(user_id = %user.id, "User registered");

    Ok(ApiResponse::created("User registered successfully", user.into()))
}

/// Login with email and password
pub async fn login(
    State(state): State<AppState>,
    Json(payload): Json<LoginRequest>,
) -> AppResult<ApiResponse<LoginResponse>> {
    let email = payload.email.trim().to_lowercase();

    let user = user::Entity::find()
        .filter(user::Column::Email.eq(&email))
        .one(&state.db)
        .await?
        .ok_or_else(|| AppError::Unauthorized("Invalid email or password".to_string()))?;

    if !verify_password(&payload.password, &user.password_hash)? {
        return Err(AppError::Unauthorized("Invalid email or password".to_string()));
    }

    let token = create_token(
        user.id,
        &user.email,
        &state.config.jwt_secret,
        state.config.jwt_expiration_hours,
    )?;

    Ok(ApiResponse::ok("Login successful", LoginResponse { token }))
}
