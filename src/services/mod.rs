//! Application services layer - Use cases and business logic.
//!
//! Services orchestrate domain rules and repositories to fulfil the API's
//! use cases. Handlers depend on the service traits; each implementation
//! reaches the database through a Unit of Work, running every mutation in
//! a transaction.

mod auth_service;
mod booking_service;
mod city_service;
pub mod container;
mod country_service;
mod facility_service;
mod hotel_service;
mod image_service;
mod room_service;
mod user_service;

pub use container::Services;

pub use auth_service::{AuthService, Authenticator, Claims, TokenResponse};
pub use booking_service::{BookingManager, BookingService};
pub use city_service::{CityManager, CityService};
pub use country_service::{CountryManager, CountryService};
pub use facility_service::{FacilityManager, FacilityService};
pub use hotel_service::{HotelManager, HotelService};
pub use image_service::{ImageManager, ImageService};
pub use room_service::{RoomManager, RoomService};
pub use user_service::{UserManager, UserService};

#[cfg(any(test, feature = "test-utils"))]
pub use auth_service::MockAuthService;
#[cfg(any(test, feature = "test-utils"))]
pub use booking_service::MockBookingService;
#[cfg(any(test, feature = "test-utils"))]
pub use city_service::MockCityService;
#[cfg(any(test, feature = "test-utils"))]
pub use country_service::MockCountryService;
#[cfg(any(test, feature = "test-utils"))]
pub use facility_service::MockFacilityService;
#[cfg(any(test, feature = "test-utils"))]
pub use hotel_service::MockHotelService;
#[cfg(any(test, feature = "test-utils"))]
pub use image_service::MockImageService;
#[cfg(any(test, feature = "test-utils"))]
pub use room_service::MockRoomService;
#[cfg(any(test, feature = "test-utils"))]
pub use user_service::MockUserService;
