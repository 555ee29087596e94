mod common;

use chrono::{Duration, Utc};
use sea_orm::{ConnectionTrait, EntityTrait};
use uuid::Uuid;

use common::{at, available_seats, booking_request, fixture, offset, seed_station};
use train_booking_backend::entities::{booking, station};
use train_booking_backend::AppError;

#[tokio::test]
async fn test_booking_then_cancel_restores_capacity() {
    let fx = fixture(100_000.0, 5).await;
    let bookings = &fx.state.bookings;

    let created = bookings
        .create_booking(
            &fx.user.id.to_string(),
            booking_request(fx.schedule.id, &["EKS1-1A", "EKS1-1B"]),
        )
        .await
        .unwrap();

    assert_eq!(created.total_price, 207_500.0);
    assert_eq!(created.admin_fee, 7_500.0);
    assert_eq!(created.status, booking::STATUS_PENDING_PAYMENT);
    assert_eq!(created.booking_code.len(), 8);
    assert_eq!(created.passengers.len(), 2);
    assert_eq!(created.schedule.available_seats, 3);
    assert_eq!(created.schedule.origin_station.code, "GMR");
    assert_eq!(created.schedule.departure_time, "2025-03-10 08:00");
    assert_eq!(available_seats(&fx.db, fx.schedule.id).await, 3);

    let stored = booking::Entity::find_by_id(created.id)
        .one(&fx.db)
        .await
        .unwrap()
        .unwrap();
    assert_eq!(stored.payment_expiry - stored.created_at, Duration::minutes(30));

    // Wire timestamps are rendered in the service zone, not as stored
    let created_at = at(&created.created_at);
    let expiry = at(&created.payment_expiry);
    assert_eq!(expiry - created_at, Duration::minutes(30));
    let now = Utc::now().with_timezone(&offset());
    assert!((now - created_at).num_minutes().abs() <= 1);

    bookings.cancel_booking(&created.id.to_string()).await.unwrap();

    let cancelled = bookings
        .get_booking_by_id(&created.id.to_string())
        .await
        .unwrap();
    assert_eq!(cancelled.status, booking::STATUS_CANCELLED);
    assert_eq!(available_seats(&fx.db, fx.schedule.id).await, 5);
}

#[tokio::test]
async fn test_booking_exact_capacity_leaves_zero() {
    let fx = fixture(100_000.0, 3).await;

    fx.state
        .bookings
        .create_booking(
            &fx.user.id.to_string(),
            booking_request(fx.schedule.id, &["EKS1-1A", "EKS1-1B", "EKS1-2A"]),
        )
        .await
        .unwrap();

    assert_eq!(available_seats(&fx.db, fx.schedule.id).await, 0);
}

#[tokio::test]
async fn test_booking_over_capacity_is_rejected() {
    let fx = fixture(100_000.0, 2).await;

    let err = fx
        .state
        .bookings
        .create_booking(
            &fx.user.id.to_string(),
            booking_request(fx.schedule.id, &["EKS1-1A", "EKS1-1B", "EKS1-2A"]),
        )
        .await
        .unwrap_err();

    match err {
        AppError::InvalidInput(msg) => assert!(msg.contains("Insufficient available seats")),
        other => panic!("unexpected error: {:?}", other),
    }
    assert_eq!(available_seats(&fx.db, fx.schedule.id).await, 2);

    let count = booking::Entity::find().all(&fx.db).await.unwrap().len();
    assert_eq!(count, 0);
}

#[tokio::test]
async fn test_cancel_twice_releases_once() {
    let fx = fixture(100_000.0, 5).await;
    let bookings = &fx.state.bookings;

    let created = bookings
        .create_booking(
            &fx.user.id.to_string(),
            booking_request(fx.schedule.id, &["EKS1-1A", "EKS1-1B"]),
        )
        .await
        .unwrap();
    let id = created.id.to_string();

    bookings.cancel_booking(&id).await.unwrap();
    bookings.cancel_booking(&id).await.unwrap();

    assert_eq!(available_seats(&fx.db, fx.schedule.id).await, 5);
}

#[tokio::test]
async fn test_cancel_unknown_booking_is_not_found() {
    let fx = fixture(100_000.0, 5).await;

    let err = fx
        .state
        .bookings
        .cancel_booking(&Uuid::new_v4().to_string())
        .await
        .unwrap_err();
    assert!(matches!(err, AppError::NotFound(_)));
    assert_eq!(available_seats(&fx.db, fx.schedule.id).await, 5);
}

#[tokio::test]
async fn test_cancel_after_delete_is_not_found() {
    let fx = fixture(100_000.0, 5).await;
    let bookings = &fx.state.bookings;

    let created = bookings
        .create_booking(&fx.user.id.to_string(), booking_request(fx.schedule.id, &["EKS1-1A"]))
        .await
        .unwrap();
    let id = created.id.to_string();
    bookings.delete_booking(&id).await.unwrap();

    assert!(matches!(
        bookings.cancel_booking(&id).await,
        Err(AppError::NotFound(_))
    ));
    // Deleting never released the seat, and a failed cancel must not either
    assert_eq!(available_seats(&fx.db, fx.schedule.id).await, 4);
}

#[tokio::test]
async fn test_cancel_paid_booking_releases_seats() {
    let fx = fixture(100_000.0, 5).await;
    let bookings = &fx.state.bookings;

    let created = bookings
        .create_booking(&fx.user.id.to_string(), booking_request(fx.schedule.id, &["EKS1-1A"]))
        .await
        .unwrap();
    let id = created.id.to_string();

    bookings
        .update_booking_status(&id, booking::STATUS_PAID)
        .await
        .unwrap();
    bookings.cancel_booking(&id).await.unwrap();

    let cancelled = bookings.get_booking_by_id(&id).await.unwrap();
    assert_eq!(cancelled.status, booking::STATUS_CANCELLED);
    assert_eq!(available_seats(&fx.db, fx.schedule.id).await, 5);
}

#[tokio::test]
async fn test_terminal_bookings_reject_status_updates() {
    let fx = fixture(100_000.0, 5).await;
    let bookings = &fx.state.bookings;
    let user_id = fx.user.id.to_string();

    let paid = bookings
        .create_booking(&user_id, booking_request(fx.schedule.id, &["EKS1-1A"]))
        .await
        .unwrap();
    let paid_id = paid.id.to_string();
    bookings
        .update_booking_status(&paid_id, booking::STATUS_PAID)
        .await
        .unwrap();

    let cancelled = bookings
        .create_booking(&user_id, booking_request(fx.schedule.id, &["EKS1-1B"]))
        .await
        .unwrap();
    let cancelled_id = cancelled.id.to_string();
    bookings.cancel_booking(&cancelled_id).await.unwrap();

    for target in ["PENDING_PAYMENT", "PAID", "CANCELLED", "REFUNDED"] {
        for id in [&paid_id, &cancelled_id] {
            let err = bookings.update_booking_status(id, target).await.unwrap_err();
            assert!(
                matches!(err, AppError::InvalidStateTransition(_)),
                "{} -> {} should be rejected",
                id,
                target
            );
        }
    }

    // Rejected updates leave inventory alone
    assert_eq!(available_seats(&fx.db, fx.schedule.id).await, 4);
    assert_eq!(
        bookings.get_booking_by_id(&paid_id).await.unwrap().status,
        booking::STATUS_PAID
    );
}

#[tokio::test]
async fn test_status_update_to_cancelled_releases_seats() {
    let fx = fixture(100_000.0, 5).await;
    let bookings = &fx.state.bookings;

    let created = bookings
        .create_booking(
            &fx.user.id.to_string(),
            booking_request(fx.schedule.id, &["EKS1-1A", "EKS1-1B"]),
        )
        .await
        .unwrap();
    assert_eq!(available_seats(&fx.db, fx.schedule.id).await, 3);

    bookings
        .update_booking_status(&created.id.to_string(), booking::STATUS_CANCELLED)
        .await
        .unwrap();

    assert_eq!(available_seats(&fx.db, fx.schedule.id).await, 5);
}

#[tokio::test]
async fn test_update_status_unknown_booking() {
    let fx = fixture(100_000.0, 5).await;

    let err = fx
        .state
        .bookings
        .update_booking_status(&Uuid::new_v4().to_string(), booking::STATUS_PAID)
        .await
        .unwrap_err();
    assert!(matches!(err, AppError::NotFound(_)));
}

#[tokio::test]
async fn test_failed_insert_rolls_back_reservation() {
    let fx = fixture(100_000.0, 5).await;

    // No such user, so the booking row violates its foreign key
    let err = fx
        .state
        .bookings
        .create_booking(
            &Uuid::new_v4().to_string(),
            booking_request(fx.schedule.id, &["EKS1-1A", "EKS1-1B"]),
        )
        .await
        .unwrap_err();

    assert!(matches!(err, AppError::Persistence(_)));
    assert_eq!(available_seats(&fx.db, fx.schedule.id).await, 5);
}

#[tokio::test]
async fn test_create_booking_input_errors() {
    let fx = fixture(100_000.0, 5).await;
    let bookings = &fx.state.bookings;
    let user_id = fx.user.id.to_string();

    let mut bad_id = booking_request(fx.schedule.id, &["EKS1-1A"]);
    bad_id.schedule_id = "not-a-uuid".to_string();
    assert!(matches!(
        bookings.create_booking(&user_id, bad_id).await,
        Err(AppError::InvalidIdentifier(_))
    ));

    assert!(matches!(
        bookings
            .create_booking(&user_id, booking_request(Uuid::new_v4(), &["EKS1-1A"]))
            .await,
        Err(AppError::NotFound(_))
    ));

    assert!(matches!(
        bookings
            .create_booking(&user_id, booking_request(fx.schedule.id, &[]))
            .await,
        Err(AppError::InvalidInput(_))
    ));

    assert_eq!(available_seats(&fx.db, fx.schedule.id).await, 5);
}

#[tokio::test]
async fn test_delete_booking_keeps_inventory() {
    let fx = fixture(100_000.0, 5).await;
    let bookings = &fx.state.bookings;

    let created = bookings
        .create_booking(
            &fx.user.id.to_string(),
            booking_request(fx.schedule.id, &["EKS1-1A", "EKS1-1B"]),
        )
        .await
        .unwrap();
    let id = created.id.to_string();

    bookings.delete_booking(&id).await.unwrap();

    assert_eq!(available_seats(&fx.db, fx.schedule.id).await, 3);
    assert!(matches!(
        bookings.get_booking_by_id(&id).await,
        Err(AppError::NotFound(_))
    ));
    assert!(matches!(
        bookings.delete_booking(&id).await,
        Err(AppError::NotFound(_))
    ));
}

#[tokio::test]
async fn test_user_bookings_newest_first_and_skip_broken() {
    let fx = fixture(100_000.0, 10).await;
    let bookings = &fx.state.bookings;
    let user_id = fx.user.id.to_string();

    let first = bookings
        .create_booking(&user_id, booking_request(fx.schedule.id, &["EKS1-1A"]))
        .await
        .unwrap();
    tokio::time::sleep(std::time::Duration::from_millis(10)).await;
    let second = bookings
        .create_booking(&user_id, booking_request(fx.schedule.id, &["EKS1-1B"]))
        .await
        .unwrap();

    let listed = bookings.get_bookings_by_user_id(&user_id).await.unwrap();
    let ids: Vec<Uuid> = listed.iter().map(|b| b.id).collect();
    assert_eq!(ids, vec![second.id, first.id]);

    // A second schedule whose origin station disappears can no longer be rendered
    let orphan_origin = seed_station(&fx.db, "Bandung", "BD").await;
    let orphan = common::seed_schedule(
        &fx.db,
        &fx.train,
        &orphan_origin,
        &fx.destination,
        "2025-03-11 08:00",
        90_000.0,
        5,
    )
    .await;
    bookings
        .create_booking(&user_id, booking_request(orphan.id, &["EKS2-1A"]))
        .await
        .unwrap();

    fx.db
        .execute_unprepared("PRAGMA foreign_keys = OFF")
        .await
        .unwrap();
    station::Entity::delete_by_id(orphan_origin.id)
        .exec(&fx.db)
        .await
        .unwrap();

    let listed = bookings.get_bookings_by_user_id(&user_id).await.unwrap();
    assert_eq!(listed.len(), 2);
    assert!(listed.iter().all(|b| b.schedule.id == fx.schedule.id));
}

#[tokio::test]
async fn test_seats_never_negative_over_mixed_sequence() {
    let fx = fixture(50_000.0, 4).await;
    let bookings = &fx.state.bookings;
    let user_id = fx.user.id.to_string();

    let mut live = Vec::new();
    for round in 0..12 {
        let seats: &[&str] = if round % 3 == 0 {
            &["EKS1-1A", "EKS1-1B", "EKS1-2A"]
        } else {
            &["EKS2-1A"]
        };

        match bookings
            .create_booking(&user_id, booking_request(fx.schedule.id, seats))
            .await
        {
            Ok(created) => live.push(created.id.to_string()),
            Err(AppError::InvalidInput(_)) => {}
            Err(other) => panic!("unexpected error: {:?}", other),
        }

        if round % 4 == 3 {
            if let Some(id) = live.pop() {
                bookings.cancel_booking(&id).await.unwrap();
            }
        }

        let remaining = available_seats(&fx.db, fx.schedule.id).await;
        assert!(remaining >= 0);
    }

    for id in live {
        bookings.cancel_booking(&id).await.unwrap();
    }
    assert_eq!(available_seats(&fx.db, fx.schedule.id).await, 4);
}
