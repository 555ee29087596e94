pub mod booking;
pub mod schedule;
pub mod station;
pub mod train;
pub mod user;
