//! Repository layer - Data access abstraction
//!
//! One trait per entity, each implemented by a store that runs on any
//! sea-orm connection. [`Scope`] bundles the stores for one connection,
//! either the pool or an open transaction.

mod base;
mod booking_repository;
mod city_repository;
mod country_repository;
pub(crate) mod entities;
mod facility_repository;
mod hotel_repository;
mod image_repository;
pub(crate) mod mappers;
mod room_repository;
mod user_repository;

use sea_orm::ConnectionTrait;

pub use base::{Connected, DeleteRepository, ReadRepository, WriteRepository};
pub use booking_repository::{BookingRepository, BookingStore};
pub use city_repository::{CityRepository, CityStore};
pub use country_repository::{CountryRepository, CountryStore};
pub use facility_repository::{FacilityRepository, FacilityStore};
pub use hotel_repository::{HotelRepository, HotelStore};
pub use image_repository::{ImageRepository, ImageStore};
pub use room_repository::{RoomRepository, RoomStore};
pub use user_repository::{UserRepository, UserStore};

#[cfg(any(test, feature = "test-utils"))]
pub use booking_repository::MockBookingRepository;
#[cfg(any(test, feature = "test-utils"))]
pub use city_repository::MockCityRepository;
#[cfg(any(test, feature = "test-utils"))]
pub use country_repository::MockCountryRepository;
#[cfg(any(test, feature = "test-utils"))]
pub use facility_repository::MockFacilityRepository;
#[cfg(any(test, feature = "test-utils"))]
pub use hotel_repository::MockHotelRepository;
#[cfg(any(test, feature = "test-utils"))]
pub use image_repository::MockImageRepository;
#[cfg(any(test, feature = "test-utils"))]
pub use room_repository::MockRoomRepository;
#[cfg(any(test, feature = "test-utils"))]
pub use user_repository::MockUserRepository;

/// Access to every repository over one connection.
pub trait Repositories: Send + Sync {
    fn countries(&self) -> &dyn CountryRepository;
    fn cities(&self) -> &dyn CityRepository;
    fn hotels(&self) -> &dyn HotelRepository;
    fn rooms(&self) -> &dyn RoomRepository;
    fn bookings(&self) -> &dyn BookingRepository;
    fn facilities(&self) -> &dyn FacilityRepository;
    fn images(&self) -> &dyn ImageRepository;
    fn users(&self) -> &dyn UserRepository;
}

impl<R: Repositories + ?Sized> Repositories for &R {
    fn countries(&self) -> &dyn CountryRepository {
        (**self).countries()
    }
    fn cities(&self) -> &dyn CityRepository {
        (**self).cities()
    }
    fn hotels(&self) -> &dyn HotelRepository {
        (**self).hotels()
    }
    fn rooms(&self) -> &dyn RoomRepository {
        (**self).rooms()
    }
    fn bookings(&self) -> &dyn BookingRepository {
        (**self).bookings()
    }
    fn facilities(&self) -> &dyn FacilityRepository {
        (**self).facilities()
    }
    fn images(&self) -> &dyn ImageRepository {
        (**self).images()
    }
    fn users(&self) -> &dyn UserRepository {
        (**self).users()
    }
}

/// The sea-orm stores bound to one connection.
pub struct Scope<'a, C> {
    countries: CountryStore<'a, C>,
    cities: CityStore<'a, C>,
    hotels: HotelStore<'a, C>,
    rooms: RoomStore<'a, C>,
    bookings: BookingStore<'a, C>,
    facilities: FacilityStore<'a, C>,
    images: ImageStore<'a, C>,
    users: UserStore<'a, C>,
}

impl<'a, C> Scope<'a, C> {
    pub fn new(db: &'a C) -> Self {
        Self {
            countries: CountryStore::new(db),
            cities: CityStore::new(db),
            hotels: HotelStore::new(db),
            rooms: RoomStore::new(db),
            bookings: BookingStore::new(db),
            facilities: FacilityStore::new(db),
            images: ImageStore::new(db),
            users: UserStore::new(db),
        }
    }
}

impl<C: ConnectionTrait + Send + Sync> Repositories for Scope<'_, C> {
    fn countries(&self) -> &dyn CountryRepository {
        &self.countries
    }
    fn cities(&self) -> &dyn CityRepository {
        &self.cities
    }
    fn hotels(&self) -> &dyn HotelRepository {
        &self.hotels
    }
    fn rooms(&self) -> &dyn RoomRepository {
        &self.rooms
    }
    fn bookings(&self) -> &dyn BookingRepository {
        &self.bookings
    }
    fn facilities(&self) -> &dyn FacilityRepository {
        &self.facilities
    }
    fn images(&self) -> &dyn ImageRepository {
        &self.images
    }
    fn users(&self) -> &dyn UserRepository {
        &self.users
    }
}
