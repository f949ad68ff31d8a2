//! Service container - one shared handle per application service.
//!
//! Handlers only see the service traits; which implementation sits behind
//! each handle is decided here, once, at startup.

use std::sync::Arc;

use sea_orm::DatabaseConnection;

use super::{
    AuthService, Authenticator, BookingManager, BookingService, CityManager, CityService,
    CountryManager, CountryService, FacilityManager, FacilityService, HotelManager, HotelService,
    ImageManager, ImageService, RoomManager, RoomService, UserManager, UserService,
};
use crate::config::Config;
use crate::infra::Persistence;

/// Thread-safe handles to every service.
#[derive(Clone)]
pub struct Services {
    pub auth: Arc<dyn AuthService>,
    pub users: Arc<dyn UserService>,
    pub countries: Arc<dyn CountryService>,
    pub cities: Arc<dyn CityService>,
    pub hotels: Arc<dyn HotelService>,
    pub rooms: Arc<dyn RoomService>,
    pub bookings: Arc<dyn BookingService>,
    pub facilities: Arc<dyn FacilityService>,
    pub images: Arc<dyn ImageService>,
}

impl Services {
    /// Wire every service to one unit of work over `db`.
    pub fn from_connection(db: DatabaseConnection, config: Config) -> Self {
        let uow = Arc::new(Persistence::new(db));

        Self {
            auth: Arc::new(Authenticator::new(uow.clone(), config)),
            users: Arc::new(UserManager::new(uow.clone())),
            countries: Arc::new(CountryManager::new(uow.clone())),
            cities: Arc::new(CityManager::new(uow.clone())),
            hotels: Arc::new(HotelManager::new(uow.clone())),
            rooms: Arc::new(RoomManager::new(uow.clone())),
            bookings: Arc::new(BookingManager::new(uow.clone())),
            facilities: Arc::new(FacilityManager::new(uow.clone())),
            images: Arc::new(ImageManager::new(uow)),
        }
    }
}

#[cfg(any(test, feature = "test-utils"))]
impl Services {
    /// Mocks without expectations; replace the ones a test exercises.
    pub fn mocked() -> Self {
        use super::{
            MockAuthService, MockBookingService, MockCityService, MockCountryService,
            MockFacilityService, MockHotelService, MockImageService, MockRoomService,
            MockUserService,
        };

        Self {
            auth: Arc::new(MockAuthService::new()),
            users: Arc::new(MockUserService::new()),
            countries: Arc::new(MockCountryService::new()),
            cities: Arc::new(MockCityService::new()),
            hotels: Arc::new(MockHotelService::new()),
            rooms: Arc::new(MockRoomService::new()),
            bookings: Arc::new(MockBookingService::new()),
            facilities: Arc::new(MockFacilityService::new()),
            images: Arc::new(MockImageService::new()),
        }
    }
}
