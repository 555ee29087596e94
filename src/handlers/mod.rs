pub mod auth;
pub mod booking;
pub mod schedule;
pub mod station;
pub mod train;
