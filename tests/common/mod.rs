#![allow(dead_code)]

use chrono::{DateTime, Duration, FixedOffset, Utc};
use sea_orm::{ActiveModelTrait, ConnectOptions, Database, DatabaseConnection, EntityTrait, Set};
use sea_orm_migration::MigratorTrait;
use uuid::Uuid;

use train_booking_backend::entities::train::{Carriage, Seat, SeatMap};
use train_booking_backend::entities::{schedule, station, train, user};
use train_booking_backend::services::booking::{
    BookerRequest, CreateBookingRequest, PassengerRequest,
};
use train_booking_backend::utils::password::hash_password;
use train_booking_backend::utils::time::parse_wire_datetime;
use train_booking_backend::{AppState, Config};

pub const PASSWORD: &str = "secret123";

/// In-memory SQLite with the real migrations applied. A single pooled
/// connection keeps every caller on the same database.
pub async fn setup_db() -> DatabaseConnection {
    let mut opts = ConnectOptions::new("sqlite::memory:");
    opts.max_connections(1)
        .min_connections(1)
        .sqlx_logging(false);

    let db = Database::connect(opts)
        .await
        .expect("Failed to open in-memory database");
    migration::Migrator::up(&db, None)
        .await
        .expect("Failed to run migrations");
    db
}

static MIGRATE: tokio::sync::Mutex<bool> = tokio::sync::Mutex::const_new(false);

/// Pool whose transactions really interleave. Uses `TEST_DATABASE_URL`
/// (Postgres) when set, otherwise a fresh file-backed SQLite database with
/// several connections.
pub async fn setup_shared_db() -> DatabaseConnection {
    match std::env::var("TEST_DATABASE_URL") {
        Ok(url) => {
            let mut opts = ConnectOptions::new(url);
            opts.max_connections(16).sqlx_logging(false);
            let db = Database::connect(opts)
                .await
                .expect("Failed to connect to TEST_DATABASE_URL");

            // Tests in one binary share the database; migrate it once
            let mut migrated = MIGRATE.lock().await;
            if !*migrated {
                migration::Migrator::up(&db, None)
                    .await
                    .expect("Failed to run migrations");
                *migrated = true;
            }
            db
        }
        Err(_) => {
            let path = std::env::temp_dir().join(format!("train-booking-{}.db", Uuid::new_v4()));
            let mut opts = ConnectOptions::new(format!("sqlite://{}?mode=rwc", path.display()));
            opts.max_connections(8)
                .min_connections(8)
                .sqlx_logging(false)
                .map_sqlx_sqlite_opts(|o| o.journal_mode(sea_orm::sqlx::sqlite::SqliteJournalMode::Wal));

            let db = Database::connect(opts)
                .await
                .expect("Failed to open SQLite database file");
            migration::Migrator::up(&db, None)
                .await
                .expect("Failed to run migrations");
            db
        }
    }
}

pub fn is_shared_postgres() -> bool {
    std::env::var("TEST_DATABASE_URL").is_ok()
}

pub fn test_config() -> Config {
    Config {
        database_url: "sqlite::memory:".to_string(),
        jwt_secret: "test-secret".to_string(),
        jwt_expiration_hours: 24,
        server_host: "127.0.0.1".to_string(),
        server_port: 0,
        utc_offset_hours: 7,
        db_max_connections: 1,
        db_timeout_secs: 5,
        request_timeout_secs: 30,
    }
}

pub fn offset() -> FixedOffset {
    test_config().utc_offset()
}

pub fn at(value: &str) -> DateTime<FixedOffset> {
    parse_wire_datetime(value, offset()).expect("valid wire timestamp")
}

pub async fn seed_user(db: &DatabaseConnection, email: &str) -> user::Model {
    let now = Utc::now().with_timezone(&offset());
    user::ActiveModel {
        id: Set(Uuid::new_v4()),
        full_name: Set("John Doe".to_string()),
        email: Set(email.to_string()),
        password_hash: Set(hash_password(PASSWORD).expect("hash")),
        phone_number: Set("081234567890".to_string()),
        identity_number: Set("3201234567890001".to_string()),
        created_at: Set(now),
        updated_at: Set(now),
    }
    .insert(db)
    .await
    .expect("Failed to seed user")
}

pub async fn seed_station(db: &DatabaseConnection, name: &str, code: &str) -> station::Model {
    station::ActiveModel {
        id: Set(Uuid::new_v4()),
        name: Set(name.to_string()),
        city: Set(name.to_string()),
        code: Set(code.to_string()),
        is_active: Set(true),
    }
    .insert(db)
    .await
    .expect("Failed to seed station")
}

/// Two carriages, four seats each
pub fn seat_map() -> SeatMap {
    let carriage = |code: &str| Carriage {
        code: code.to_string(),
        seats: ["1A", "1B", "2A", "2B"]
            .iter()
            .map(|s| Seat {
                code: format!("{}-{}", code, s),
            })
            .collect(),
    };
    SeatMap(vec![carriage("EKS1"), carriage("EKS2")])
}

pub async fn seed_train(db: &DatabaseConnection) -> train::Model {
    train::ActiveModel {
        id: Set(Uuid::new_v4()),
        name: Set("Argo Bromo Anggrek".to_string()),
        class: Set("Executive".to_string()),
        carriages: Set(seat_map()),
    }
    .insert(db)
    .await
    .expect("Failed to seed train")
}

pub async fn seed_schedule(
    db: &DatabaseConnection,
    train: &train::Model,
    origin: &station::Model,
    destination: &station::Model,
    departure: &str,
    price: f64,
    seats: i32,
) -> schedule::Model {
    let departure = at(departure);
    schedule::ActiveModel {
        id: Set(Uuid::new_v4()),
        train_id: Set(train.id),
        origin_station_id: Set(origin.id),
        destination_station_id: Set(destination.id),
        departure_time: Set(departure),
        arrival_time: Set(departure + Duration::minutes(330)),
        price: Set(price),
        available_seats: Set(seats),
    }
    .insert(db)
    .await
    .expect("Failed to seed schedule")
}

pub struct Fixture {
    pub db: DatabaseConnection,
    pub state: AppState,
    pub user: user::Model,
    pub origin: station::Model,
    pub destination: station::Model,
    pub train: train::Model,
    pub schedule: schedule::Model,
}

/// One user and one schedule Gambir -> Surabaya Pasarturi on 2025-03-10 08:00
pub async fn fixture(price: f64, seats: i32) -> Fixture {
    fixture_on(setup_db().await, "john.doe@example.com", price, seats).await
}

/// Same as [`fixture`] on a multi-connection pool, with a unique user
pub async fn shared_fixture(price: f64, seats: i32) -> Fixture {
    let email = format!("john.doe+{}@example.com", Uuid::new_v4().simple());
    fixture_on(setup_shared_db().await, &email, price, seats).await
}

pub async fn fixture_on(db: DatabaseConnection, email: &str, price: f64, seats: i32) -> Fixture {
    let user = seed_user(&db, email).await;
    let origin = seed_station(&db, "Gambir", "GMR").await;
    let destination = seed_station(&db, "Surabaya Pasarturi", "SBI").await;
    let train = seed_train(&db).await;
    let schedule = seed_schedule(
        &db,
        &train,
        &origin,
        &destination,
        "2025-03-10 08:00",
        price,
        seats,
    )
    .await;
    let state = AppState::new(db.clone(), test_config());

    Fixture {
        db,
        state,
        user,
        origin,
        destination,
        train,
        schedule,
    }
}

pub fn booking_request(schedule_id: Uuid, seat_codes: &[&str]) -> CreateBookingRequest {
    CreateBookingRequest {
        schedule_id: schedule_id.to_string(),
        booker: BookerRequest {
            full_name: "John Doe".to_string(),
            email: "john.doe@example.com".to_string(),
            phone_number: "081234567890".to_string(),
        },
        passengers: seat_codes
            .iter()
            .enumerate()
            .map(|(i, seat)| PassengerRequest {
                full_name: format!("Passenger {}", i + 1),
                identity_number: format!("32012345678900{:02}", i),
                seat_code: seat.to_string(),
            })
            .collect(),
    }
}

pub async fn available_seats(db: &DatabaseConnection, schedule_id: Uuid) -> i32 {
    schedule::Entity::find_by_id(schedule_id)
        .one(db)
        .await
        .expect("query schedule")
        .expect("schedule exists")
        .available_seats
}
