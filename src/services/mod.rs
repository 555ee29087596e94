pub mod booking;
pub mod schedule;
pub mod seat_layout;
pub mod station;
pub mod train;
