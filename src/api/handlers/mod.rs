//! HTTP request handlers.

pub mod auth_handler;
pub mod booking_handler;
pub mod city_handler;
pub mod country_handler;
pub mod facility_handler;
pub mod hotel_handler;
pub mod image_handler;
pub mod room_handler;
pub mod user_handler;

pub use auth_handler::auth_routes;
pub use booking_handler::booking_routes;
pub use city_handler::city_routes;
pub use country_handler::country_routes;
pub use facility_handler::facility_routes;
pub use hotel_handler::hotel_routes;
pub use image_handler::image_routes;
pub use room_handler::room_routes;
pub use user_handler::user_routes;
