//! Row to domain conversions.
//!
//! Flat rows convert with `From`; aggregates (hotels, rooms) are assembled
//! from the row plus the related rows loaded alongside it.

use std::collections::HashMap;

use super::entities::{booking, city, country, facility, hotel, image, room, user};
use crate::domain::{Booking, City, Country, Facility, Hotel, Image, Room, User};

impl From<country::Model> for Country {
    fn from(model: country::Model) -> Self {
        Self {
            id: model.id,
            name: model.name,
            iso_code: model.iso_code,
        }
    }
}

impl From<facility::Model> for Facility {
    fn from(model: facility::Model) -> Self {
        Self {
            id: model.id,
            name: model.name,
        }
    }
}

impl From<image::Model> for Image {
    fn from(model: image::Model) -> Self {
        Self {
            id: model.id,
            hotel_id: model.hotel_id,
            url: model.url,
            description: model.description,
        }
    }
}

impl From<booking::Model> for Booking {
    fn from(model: booking::Model) -> Self {
        Self {
            id: model.id,
            room_id: model.room_id,
            user_id: model.user_id,
            date_from: model.date_from,
            date_to: model.date_to,
            price: model.price,
            created_at: model.created_at,
        }
    }
}

impl From<user::Model> for User {
    fn from(model: user::Model) -> Self {
        Self {
            id: model.id,
            email: model.email,
            password_hash: model.hashed_password,
            first_name: model.first_name,
            last_name: model.last_name,
            telegram_id: model.telegram_id,
            pachca_id: model.pachca_id,
            created_at: model.created_at,
        }
    }
}

pub fn city_from(model: city::Model, country: country::Model) -> City {
    City {
        id: model.id,
        name: model.name,
        country: country.into(),
    }
}

/// Location names of a hotel, resolved from its city row.
#[derive(Debug, Default)]
pub struct Location {
    pub city: String,
    pub country: String,
}

pub fn hotel_from(model: hotel::Model, location: Location, facilities: Vec<Facility>) -> Hotel {
    Hotel {
        id: model.id,
        title: model.title,
        address: model.address,
        postal_code: model.postal_code,
        city_id: model.city_id,
        city: location.city,
        country: location.country,
        check_in_time: model.check_in_time,
        check_out_time: model.check_out_time,
        facilities,
    }
}

pub fn room_from(model: room::Model, facilities: Vec<Facility>) -> Room {
    Room {
        id: model.id,
        hotel_id: model.hotel_id,
        title: model.title,
        description: model.description,
        price_per_night: model.price_per_night,
        capacity: model.capacity,
        facilities,
    }
}

/// Group `(owner_id, facility)` link rows by owner, each group sorted by id.
pub fn group_facilities<I>(links: I) -> HashMap<i32, Vec<Facility>>
where
    I: IntoIterator<Item = (i32, Option<facility::Model>)>,
{
    let mut grouped: HashMap<i32, Vec<Facility>> = HashMap::new();
    for (owner_id, facility) in links {
        if let Some(facility) = facility {
            grouped.entry(owner_id).or_default().push(facility.into());
        }
    }
    for facilities in grouped.values_mut() {
        facilities.sort_by_key(|f| f.id);
    }
    grouped
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn facilities_are_grouped_per_owner() {
        let wifi = facility::Model {
            id: 2,
            name: "Wi-Fi".into(),
        };
        let pool = facility::Model {
            id: 1,
            name: "Pool".into(),
        };

        let grouped = group_facilities(vec![
            (10, Some(wifi)),
            (10, Some(pool)),
            (11, None),
        ]);

        let names: Vec<_> = grouped[&10].iter().map(|f| f.name.as_str()).collect();
        assert_eq!(names, ["Pool", "Wi-Fi"]);
        assert!(!grouped.contains_key(&11));
    }

    #[test]
    fn user_row_maps_hash_into_domain_only() {
        let row = user::Model {
            id: 1,
            email: "guest@example.com".into(),
            hashed_password: "$argon2id$hash".into(),
            first_name: Some("Anna".into()),
            last_name: None,
            telegram_id: None,
            pachca_id: Some(5),
            created_at: chrono::Utc::now(),
        };

        let user = User::from(row);
        assert_eq!(user.password_hash, "$argon2id$hash");
        assert_eq!(user.pachca_id, Some(5));
    }
}
