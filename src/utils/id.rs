use uuid::Uuid;

use crate::error::{AppError, AppResult};

/// Parse a path or body identifier, naming the entity in the error.
pub fn parse_id(value: &str, entity: &str) -> AppResult<Uuid> {
    Uuid::parse_str(value.trim())
        .map_err(|_| AppError::InvalidIdentifier(format!("Invalid {} id", entity)))
}
