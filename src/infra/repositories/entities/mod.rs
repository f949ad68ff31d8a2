//! SeaORM entity definitions
//!
//! These are database-specific entities separate from domain models.

pub mod booking;
pub mod city;
pub mod country;
pub mod facility;
pub mod hotel;
pub mod hotel_facility;
pub mod image;
pub mod room;
pub mod room_facility;
pub mod user;
