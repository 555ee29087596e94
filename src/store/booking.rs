//! Booking records, keyed by id and queryable by user, schedule and code.

use sea_orm::sea_query::Expr;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, ConnectionTrait, EntityTrait, PaginatorTrait, QueryFilter,
    QueryOrder,
};
use uuid::Uuid;

use crate::entities::booking;
use crate::error::{AppError, AppResult};

pub async fn find_by_id<C: ConnectionTrait>(conn: &C, id: Uuid) -> AppResult<booking::Model> {
    booking::Entity::find_by_id(id)
        .one(conn)
        .await?
        .ok_or_else(|| AppError::NotFound("Booking not found".to_string()))
}

pub async fn find_by_user<C: ConnectionTrait>(
    conn: &C,
    user_id: Uuid,
) -> AppResult<Vec<booking::Model>> {
    Ok(booking::Entity::find()
        .filter(booking::Column::UserId.eq(user_id))
        .order_by_desc(booking::Column::CreatedAt)
        .all(conn)
        .await?)
}

pub async fn find_by_schedule<C: ConnectionTrait>(
    conn: &C,
    schedule_id: Uuid,
) -> AppResult<Vec<booking::Model>> {
    Ok(booking::Entity::find()
        .filter(booking::Column::ScheduleId.eq(schedule_id))
        .all(conn)
        .await?)
}

pub async fn code_exists<C: ConnectionTrait>(conn: &C, code: &str) -> AppResult<bool> {
    let count = booking::Entity::find()
        .filter(booking::Column::BookingCode.eq(code))
        .count(conn)
        .await?;
    Ok(count > 0)
}

pub async fn insert<C: ConnectionTrait>(
    conn: &C,
    booking: booking::ActiveModel,
) -> AppResult<booking::Model> {
    Ok(booking.insert(conn).await?)
}

/// Set `status` unless the booking is already terminal. Returns whether a row changed.
pub async fn set_status_unless_terminal<C: ConnectionTrait>(
    conn: &C,
    id: Uuid,
    status: &str,
) -> AppResult<bool> {
    let result = booking::Entity::update_many()
        .col_expr(booking::Column::Status, Expr::value(status))
        .filter(booking::Column::Id.eq(id))
        .filter(booking::Column::Status.is_not_in(booking::TERMINAL_STATUSES))
        .exec(conn)
        .await?;
    Ok(result.rows_affected > 0)
}

/// Flip the booking to `CANCELLED` unless it already is. Returns whether a row changed.
pub async fn mark_cancelled<C: ConnectionTrait>(conn: &C, id: Uuid) -> AppResult<bool> {
    let result = booking::Entity::update_many()
        .col_expr(booking::Column::Status, Expr::value(booking::STATUS_CANCELLED))
        .filter(booking::Column::Id.eq(id))
        .filter(booking::Column::Status.ne(booking::STATUS_CANCELLED))
        .exec(conn)
        .await?;
    Ok(result.rows_affected > 0)
}

pub async fn delete<C: ConnectionTrait>(conn: &C, id: Uuid) -> AppResult<()> {
    let result = booking::Entity::delete_by_id(id).exec(conn).await?;

    if result.rows_affected == 0 {
        return Err(AppError::NotFound("Booking not found".to_string()));
    }

    Ok(())
}
