//! Booking entity and the date/price rules every booking obeys.
//!
//! Stays are half-open ranges `[date_from, date_to)`: the guest leaves on
//! `date_to`, so a stay ending on a day and another starting that same day
//! do not collide.

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use validator::Validate;

use crate::errors::{AppError, AppResult};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct Booking {
    #[schema(example = 1)]
    pub id: i32,
    #[schema(example = 1)]
    pub room_id: i32,
    #[schema(example = 1)]
    pub user_id: i32,
    #[schema(value_type = String, example = "2025-07-01")]
    pub date_from: NaiveDate,
    #[schema(value_type = String, example = "2025-07-05")]
    pub date_to: NaiveDate,
    /// Total price of the stay
    #[schema(example = 20000)]
    pub price: i64,
    pub created_at: DateTime<Utc>,
}

/// Body of `POST /bookings`.
#[derive(Debug, Clone, Deserialize, Validate, ToSchema)]
pub struct BookingInput {
    #[validate(range(min = 1))]
    #[schema(example = 1)]
    pub room_id: i32,
    #[schema(value_type = String, example = "2025-07-01")]
    pub date_from: NaiveDate,
    #[schema(value_type = String, example = "2025-07-05")]
    pub date_to: NaiveDate,
}

/// Body of `PUT /bookings/{id}`: move the stay.
#[derive(Debug, Clone, Deserialize, Validate, ToSchema)]
pub struct BookingDates {
    #[schema(value_type = String, example = "2025-07-02")]
    pub date_from: NaiveDate,
    #[schema(value_type = String, example = "2025-07-06")]
    pub date_to: NaiveDate,
}

/// Body of `PATCH /bookings/{id}`.
#[derive(Debug, Clone, Default, Deserialize, Validate, ToSchema)]
pub struct BookingPatch {
    #[schema(value_type = Option<String>)]
    pub date_from: Option<NaiveDate>,
    #[schema(value_type = Option<String>)]
    pub date_to: Option<NaiveDate>,
}

impl BookingPatch {
    pub fn is_empty(&self) -> bool {
        self.date_from.is_none() && self.date_to.is_none()
    }

    /// Dates after applying the patch to an existing booking.
    pub fn apply_to(&self, booking: &Booking) -> (NaiveDate, NaiveDate) {
        (
            self.date_from.unwrap_or(booking.date_from),
            self.date_to.unwrap_or(booking.date_to),
        )
    }
}

impl From<BookingDates> for BookingPatch {
    fn from(dates: BookingDates) -> Self {
        Self {
            date_from: Some(dates.date_from),
            date_to: Some(dates.date_to),
        }
    }
}

/// Row values for a booking insert, price already computed.
#[derive(Debug, Clone, PartialEq)]
pub struct NewBooking {
    pub room_id: i32,
    pub user_id: i32,
    pub date_from: NaiveDate,
    pub date_to: NaiveDate,
    pub price: i64,
}

/// Number of nights in `[date_from, date_to)`.
///
/// # Errors
/// `BadRequest` unless `date_from` is strictly before `date_to`.
pub fn nights(date_from: NaiveDate, date_to: NaiveDate) -> AppResult<i64> {
    if date_from >= date_to {
        return Err(AppError::bad_request(
            "date_from must be earlier than date_to",
        ));
    }
    Ok((date_to - date_from).num_days())
}

/// Total price of a stay.
pub fn total_price(price_per_night: i32, nights: i64) -> AppResult<i64> {
    i64::from(price_per_night)
        .checked_mul(nights)
        .ok_or_else(|| AppError::bad_request("Booking price is out of range"))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn day(d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(2025, 7, d).unwrap()
    }

    #[test]
    fn nights_counts_the_half_open_range() {
        assert_eq!(nights(day(1), day(5)).unwrap(), 4);
        assert_eq!(nights(day(1), day(2)).unwrap(), 1);
    }

    #[test]
    fn empty_or_inverted_range_is_rejected() {
        assert!(matches!(nights(day(3), day(3)), Err(AppError::BadRequest(_))));
        assert!(matches!(nights(day(5), day(1)), Err(AppError::BadRequest(_))));
    }

    #[test]
    fn price_is_per_night_times_nights() {
        assert_eq!(total_price(5000, 4).unwrap(), 20_000);
        assert!(total_price(i32::MAX, i64::MAX).is_err());
    }

    #[test]
    fn patch_keeps_unset_dates() {
        let booking = Booking {
            id: 1,
            room_id: 2,
            user_id: 3,
            date_from: day(1),
            date_to: day(5),
            price: 400,
            created_at: Utc::now(),
        };
        let patch = BookingPatch {
            date_from: None,
            date_to: Some(day(7)),
        };
        assert_eq!(patch.apply_to(&booking), (day(1), day(7)));
    }
}
