//! Storage primitives the booking lifecycle is built on.
//!
//! Every function is generic over [`sea_orm::ConnectionTrait`] so the same
//! call works on a pooled connection or inside a transaction.

pub mod booking;
pub mod inventory;
