mod common;

use std::sync::Arc;

use tokio::sync::Barrier;

use common::{available_seats, booking_request, is_shared_postgres, shared_fixture};
use train_booking_backend::AppError;

/// Fires `attempts` bookings of `seat_codes.len()` passengers at once and
/// returns how many seats were admitted.
async fn race(fx: &common::Fixture, attempts: usize, seat_codes: &'static [&'static str]) -> i32 {
    let barrier = Arc::new(Barrier::new(attempts));

    let mut handles = Vec::new();
    for _ in 0..attempts {
        let bookings = fx.state.bookings.clone();
        let user_id = fx.user.id.to_string();
        let request = booking_request(fx.schedule.id, seat_codes);
        let barrier = barrier.clone();
        handles.push(tokio::spawn(async move {
            barrier.wait().await;
            bookings.create_booking(&user_id, request).await
        }));
    }

    let mut admitted = 0;
    for handle in handles {
        match handle.await.unwrap() {
            Ok(created) => admitted += created.passengers.len() as i32,
            Err(AppError::InvalidInput(_)) => {}
            // SQLite aborts a writer whose snapshot went stale instead of waiting
            Err(AppError::Persistence(_)) if !is_shared_postgres() => {}
            Err(other) => panic!("unexpected error: {:?}", other),
        }
    }
    admitted
}

#[tokio::test(flavor = "multi_thread", worker_threads = 8)]
async fn test_concurrent_bookings_never_oversell() {
    let fx = shared_fixture(100_000.0, 6).await;

    let admitted = race(&fx, 10, &["EKS1-1A"]).await;

    assert!(admitted >= 1);
    assert!(admitted <= 6);
    if is_shared_postgres() {
        assert_eq!(admitted, 6);
    }
    assert_eq!(available_seats(&fx.db, fx.schedule.id).await, 6 - admitted);
}

#[tokio::test(flavor = "multi_thread", worker_threads = 8)]
async fn test_concurrent_group_bookings_admit_at_most_capacity() {
    let fx = shared_fixture(100_000.0, 5).await;

    let admitted = race(&fx, 12, &["EKS1-1A", "EKS1-1B"]).await;

    assert!(admitted >= 2);
    assert!(admitted <= 5);
    if is_shared_postgres() {
        assert_eq!(admitted, 4);
    }
    assert_eq!(available_seats(&fx.db, fx.schedule.id).await, 5 - admitted);
}
