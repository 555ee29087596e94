//! Seat inventory: the per-schedule `available_seats` counter.
//!
//! Both operations are single conditional `UPDATE` statements, so concurrent
//! callers cannot observe or produce a negative count.

use sea_orm::sea_query::Expr;
use sea_orm::{ColumnTrait, ConnectionTrait, EntityTrait, QueryFilter};
use uuid::Uuid;

use crate::entities::schedule;
use crate::error::{AppError, AppResult};

/// Take `seats` from the schedule if at least that many remain.
pub async fn reserve_seats<C: ConnectionTrait>(
    conn: &C,
    schedule_id: Uuid,
    seats: i32,
) -> AppResult<()> {
    let result = schedule::Entity::update_many()
        .col_expr(
            schedule::Column::AvailableSeats,
            Expr::col(schedule::Column::AvailableSeats).sub(seats),
        )
        .filter(schedule::Column::Id.eq(schedule_id))
        .filter(schedule::Column::AvailableSeats.gte(seats))
        .exec(conn)
        .await?;

    if result.rows_affected > 0 {
        return Ok(());
    }

    // Nothing matched: either the schedule is gone or it is short on seats
    let schedule = schedule::Entity::find_by_id(schedule_id)
        .one(conn)
        .await?
        .ok_or_else(|| AppError::NotFound("Schedule not found".to_string()))?;

    tracing::warn!(
        schedule_id = %schedule_id,
        requested = seats,
        available = schedule.available_seats,
        "Seat reservation rejected"
    );

    Err(AppError::InvalidInput(format!(
        "Insufficient available seats: requested {}, only {} available",
        seats, schedule.available_seats
    )))
}

/// Return `seats` to the schedule.
pub async fn release_seats<C: ConnectionTrait>(
    conn: &C,
    schedule_id: Uuid,
    seats: i32,
) -> AppResult<()> {
    let result = schedule::Entity::update_many()
        .col_expr(
            schedule::Column::AvailableSeats,
            Expr::col(schedule::Column::AvailableSeats).add(seats),
        )
        .filter(schedule::Column::Id.eq(schedule_id))
        .exec(conn)
        .await?;

    if result.rows_affected == 0 {
        return Err(AppError::NotFound("Schedule not found".to_string()));
    }

    Ok(())
}
