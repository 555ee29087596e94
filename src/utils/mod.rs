pub mod booking_code;
pub mod id;
pub mod jwt;
pub mod password;
pub mod time;
pub mod validation;
