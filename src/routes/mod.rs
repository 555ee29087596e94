use axum::{
    middleware,
    routing::{get, patch, post, put},
    Router,
};

use crate::handlers::{auth, booking, schedule, station, train};
use crate::middleware::auth::auth_middleware;
use crate::middleware::user_rate_limit::create_user_governor;
use crate::AppState;

pub fn create_router(state: AppState) -> Router {
    let user_governor = create_user_governor();

    let auth_routes = Router::new()
        .route("/register", post(auth::register))
        .route("/login", post(auth::login));

    // Catalogue reads are public, writes require a token
    let public_stations = Router::new()
        .route("/", get(station::list_stations))
        .route("/{id}", get(station::get_station));
    let protected_stations = Router::new()
        .route("/", post(station::create_station))
        .route("/{id}", put(station::update_station).delete(station::delete_station))
        .layer(middleware::from_fn_with_state(state.clone(), auth_middleware));

    let public_trains = Router::new()
        .route("/", get(train::list_trains))
        .route("/{id}", get(train::get_train));
    let protected_trains = Router::new()
        .route("/", post(train::create_train))
        .route("/{id}", put(train::update_train).delete(train::delete_train))
        .layer(middleware::from_fn_with_state(state.clone(), auth_middleware));

    let public_schedules = Router::new()
        .route("/search", post(schedule::search_schedules))
        .route("/{id}", get(schedule::get_schedule))
        .route("/{id}/seats", get(schedule::get_seat_layout));
    let protected_schedules = Router::new()
        .route(
            "/",
            get(schedule::list_schedules).post(schedule::create_schedule),
        )
        .route(
            "/{id}",
            put(schedule::update_schedule).delete(schedule::delete_schedule),
        )
        .layer(middleware::from_fn_with_state(state.clone(), auth_middleware));

    // Per-user limit sits inside auth so the claims are available to it
    let booking_routes = Router::new()
        .route(
            "/",
            post(booking::create_booking).get(booking::my_bookings),
        )
        .route(
            "/{id}",
            get(booking::get_booking).delete(booking::delete_booking),
        )
        .route("/{id}/status", patch(booking::update_booking_status))
        .route("/{id}/cancel", post(booking::cancel_booking))
        .layer(user_governor)
        .layer(middleware::from_fn_with_state(state.clone(), auth_middleware));

    Router::new()
        .nest("/api/auth", auth_routes)
        .nest("/api/stations", public_stations.merge(protected_stations))
        .nest("/api/trains", public_trains.merge(protected_trains))
        .nest("/api/schedules", public_schedules.merge(protected_schedules))
        .nest("/api/bookings", booking_routes)
        .with_state(state)
}
