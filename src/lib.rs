pub mod config;
pub mod db;
pub mod entities;
pub mod error;
pub mod handlers;
pub mod middleware;
pub mod response;
pub mod routes;
pub mod services;
pub mod store;
pub mod utils;

use sea_orm::DatabaseConnection;

pub use config::Config;
pub use error::{AppError, AppResult};

use services::{
    booking::BookingService, schedule::ScheduleService, seat_layout::SeatLayoutService,
    station::StationService, train::TrainService,
};

#[derive(Clone)]
pub struct AppState {
    pub db: DatabaseConnection,
    pub config: Config,
    pub stations: StationService,
    pub trains: TrainService,
    pub schedules: ScheduleService,
    pub seat_layouts: SeatLayoutService,
    pub bookings: BookingService,
}

impl AppState {
    pub fn new(db: DatabaseConnection, config: Config) -> Self {
        let offset = config.utc_offset();
        let stations = StationService::new(db.clone());
        let trains = TrainService::new(db.clone());
        let schedules = ScheduleService::new(db.clone(), offset);
        let seat_layouts = SeatLayoutService::new(db.clone(), schedules.clone(), trains.clone());
        let bookings = BookingService::new(db.clone(), schedules.clone(), offset);

        Self {
            db,
            config,
            stations,
            trains,
            schedules,
            seat_layouts,
            bookings,
        }
    }
}
