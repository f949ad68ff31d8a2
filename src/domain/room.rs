//! Room entity and its input schemas.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use validator::Validate;

use super::Facility;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct Room {
    #[schema(example = 1)]
    pub id: i32,
    #[schema(example = 1)]
    pub hotel_id: i32,
    #[schema(example = "Deluxe double")]
    pub title: String,
    pub description: Option<String>,
    #[schema(example = 5000)]
    pub price_per_night: i32,
    #[schema(example = 2)]
    pub capacity: i32,
    pub facilities: Vec<Facility>,
}

/// Body of `POST`/`PUT` on `/hotels/{hotel_id}/rooms`.
#[derive(Debug, Clone, Deserialize, Validate, ToSchema)]
pub struct RoomInput {
    #[validate(length(min = 1, max = 200, message = "Title must be 1-200 characters"))]
    #[schema(example = "Deluxe double")]
    pub title: String,
    #[validate(length(max = 1000))]
    pub description: Option<String>,
    #[validate(range(min = 1, message = "Price must be positive"))]
    #[schema(example = 5000)]
    pub price_per_night: i32,
    #[validate(range(min = 1, message = "Capacity must be positive"))]
    #[schema(example = 2)]
    pub capacity: i32,
    /// Replaces the room's facilities when present
    pub facility_ids: Option<Vec<i32>>,
}

#[derive(Debug, Clone, Default, Deserialize, Validate, ToSchema)]
pub struct RoomPatch {
    #[validate(length(min = 1, max = 200, message = "Title must be 1-200 characters"))]
    pub title: Option<String>,
    #[serde(default, deserialize_with = "super::double_option")]
    #[validate(length(max = 1000))]
    #[schema(value_type = Option<String>)]
    pub description: Option<Option<String>>,
    #[validate(range(min = 1, message = "Price must be positive"))]
    pub price_per_night: Option<i32>,
    #[validate(range(min = 1, message = "Capacity must be positive"))]
    pub capacity: Option<i32>,
    pub facility_ids: Option<Vec<i32>>,
}

impl RoomPatch {
    pub fn is_empty(&self) -> bool {
        self.title.is_none()
            && self.description.is_none()
            && self.price_per_night.is_none()
            && self.capacity.is_none()
            && self.facility_ids.is_none()
    }

    /// False when the patch touches facility links only.
    pub fn has_column_changes(&self) -> bool {
        self.title.is_some()
            || self.description.is_some()
            || self.price_per_night.is_some()
            || self.capacity.is_some()
    }
}

impl From<RoomInput> for RoomPatch {
    fn from(input: RoomInput) -> Self {
        Self {
            title: Some(input.title),
            description: Some(input.description),
            price_per_night: Some(input.price_per_night),
            capacity: Some(input.capacity),
            facility_ids: input.facility_ids,
        }
    }
}

/// Query filters for `GET /hotels/{hotel_id}/rooms`.
///
/// When both dates are given only rooms free for the whole stay are listed.
#[derive(Debug, Clone, Default, PartialEq, Deserialize, ToSchema, utoipa::IntoParams)]
#[into_params(parameter_in = Query)]
pub struct RoomFilter {
    /// Case-insensitive substring of the title
    pub title: Option<String>,
    #[param(value_type = Option<String>, example = "2025-07-01")]
    #[schema(value_type = Option<String>)]
    pub date_from: Option<NaiveDate>,
    #[param(value_type = Option<String>, example = "2025-07-05")]
    #[schema(value_type = Option<String>)]
    pub date_to: Option<NaiveDate>,
}

impl RoomFilter {
    /// The requested stay, if both ends are present.
    pub fn stay(&self) -> Option<(NaiveDate, NaiveDate)> {
        self.date_from.zip(self.date_to)
    }
}
