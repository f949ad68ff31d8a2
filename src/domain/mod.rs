//! Domain layer - Core business entities and logic
//!
//! Entities returned by the API, the validated input schemas that create
//! or change them, and the pure rules they obey. Nothing here touches the
//! database.

pub mod booking;
pub mod city;
pub mod country;
pub mod facility;
pub mod hotel;
pub mod image;
pub mod password;
pub mod room;
pub mod user;

use serde::{Deserialize, Deserializer};

pub use booking::{Booking, BookingDates, BookingInput, BookingPatch, NewBooking};
pub use city::{City, CityFilter, CityInput, CityPatch};
pub use country::{Country, CountryFilter, CountryInput, CountryPatch};
pub use facility::{Facility, FacilityFilter, FacilityInput, FacilityPatch};
pub use hotel::{Hotel, HotelChanges, HotelFilter, HotelInput, HotelPatch, NewHotel};
pub use image::{Image, ImageFilter, ImageInput, ImagePatch};
pub use password::Password;
pub use room::{Room, RoomFilter, RoomInput, RoomPatch};
pub use user::{NewUser, User, UserFilter, UserPatch, UserResponse, UserUpdate};

/// Deserialize a present field as `Some`, so that with `#[serde(default)]`
/// an absent key is `None` and an explicit `null` is `Some(None)`.
pub(crate) fn double_option<'de, D, T>(deserializer: D) -> Result<Option<Option<T>>, D::Error>
where
    D: Deserializer<'de>,
    T: Deserialize<'de>,
{
    Option::<T>::deserialize(deserializer).map(Some)
}
