//! Route handlers for the directory tables and operational endpoints

pub mod bookings;
pub mod excursions;
pub mod health;
pub mod schools;
pub mod suppliers;
pub mod trips;
