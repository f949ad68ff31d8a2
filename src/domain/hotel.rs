//! Hotel entity and its input schemas.

use chrono::NaiveTime;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use validator::Validate;

use super::Facility;
use crate::config::{DEFAULT_CHECK_IN, DEFAULT_CHECK_OUT};

/// Hotel as returned by the API, with its location resolved to names.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct Hotel {
    #[schema(example = 1)]
    pub id: i32,
    #[schema(example = "Grand Volga")]
    pub title: String,
    #[schema(example = "Baumana St, 9")]
    pub address: String,
    #[schema(example = "420111")]
    pub postal_code: Option<String>,
    pub city_id: i32,
    #[schema(example = "Kazan")]
    pub city: String,
    #[schema(example = "Russia")]
    pub country: String,
    #[schema(value_type = String, example = "14:00:00")]
    pub check_in_time: NaiveTime,
    #[schema(value_type = String, example = "12:00:00")]
    pub check_out_time: NaiveTime,
    pub facilities: Vec<Facility>,
}

/// Body of `POST /hotels` and `PUT /hotels/{id}`.
///
/// The city is named, not referenced by id; it is looked up
/// case-insensitively.
#[derive(Debug, Clone, Deserialize, Validate, ToSchema)]
pub struct HotelInput {
    #[validate(length(min = 1, max = 200, message = "Title must be 1-200 characters"))]
    #[schema(example = "Grand Volga")]
    pub title: String,
    #[validate(length(min = 1, max = 100))]
    #[schema(example = "Kazan")]
    pub city: String,
    #[validate(length(min = 1, max = 300, message = "Address must be 1-300 characters"))]
    #[schema(example = "Baumana St, 9")]
    pub address: String,
    #[validate(length(min = 1, max = 20))]
    #[schema(example = "420111")]
    pub postal_code: Option<String>,
    #[schema(value_type = Option<String>, example = "14:00:00")]
    pub check_in_time: Option<NaiveTime>,
    #[schema(value_type = Option<String>, example = "12:00:00")]
    pub check_out_time: Option<NaiveTime>,
    /// Replaces the hotel's facilities when present
    pub facility_ids: Option<Vec<i32>>,
}

#[derive(Debug, Clone, Default, Deserialize, Validate, ToSchema)]
pub struct HotelPatch {
    #[validate(length(min = 1, max = 200, message = "Title must be 1-200 characters"))]
    pub title: Option<String>,
    #[validate(length(min = 1, max = 100))]
    pub city: Option<String>,
    #[validate(length(min = 1, max = 300, message = "Address must be 1-300 characters"))]
    pub address: Option<String>,
    #[serde(default, deserialize_with = "super::double_option")]
    #[validate(length(min = 1, max = 20))]
    #[schema(value_type = Option<String>)]
    pub postal_code: Option<Option<String>>,
    #[schema(value_type = Option<String>)]
    pub check_in_time: Option<NaiveTime>,
    #[schema(value_type = Option<String>)]
    pub check_out_time: Option<NaiveTime>,
    pub facility_ids: Option<Vec<i32>>,
}

impl HotelPatch {
    pub fn is_empty(&self) -> bool {
        self.title.is_none()
            && self.city.is_none()
            && self.address.is_none()
            && self.postal_code.is_none()
            && self.check_in_time.is_none()
            && self.check_out_time.is_none()
            && self.facility_ids.is_none()
    }
}

impl From<HotelInput> for HotelPatch {
    fn from(input: HotelInput) -> Self {
        Self {
            title: Some(input.title),
            city: Some(input.city),
            address: Some(input.address),
            postal_code: Some(input.postal_code),
            check_in_time: Some(input.check_in_time.unwrap_or_else(default_check_in)),
            check_out_time: Some(input.check_out_time.unwrap_or_else(default_check_out)),
            facility_ids: input.facility_ids,
        }
    }
}

/// Resolved column values for a hotel insert.
#[derive(Debug, Clone, PartialEq)]
pub struct NewHotel {
    pub title: String,
    pub address: String,
    pub postal_code: Option<String>,
    pub city_id: i32,
    pub check_in_time: NaiveTime,
    pub check_out_time: NaiveTime,
}

/// Column changes for a hotel update; the city is already resolved to an id.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct HotelChanges {
    pub title: Option<String>,
    pub address: Option<String>,
    pub postal_code: Option<Option<String>>,
    pub city_id: Option<i32>,
    pub check_in_time: Option<NaiveTime>,
    pub check_out_time: Option<NaiveTime>,
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize, ToSchema, utoipa::IntoParams)]
#[into_params(parameter_in = Query)]
pub struct HotelFilter {
    /// Case-insensitive substring of the title
    pub title: Option<String>,
    /// Case-insensitive substring of the address
    pub address: Option<String>,
    /// Case-insensitive substring of the city name
    pub city: Option<String>,
    pub city_id: Option<i32>,
}

pub fn default_check_in() -> NaiveTime {
    NaiveTime::from_hms_opt(DEFAULT_CHECK_IN.0, DEFAULT_CHECK_IN.1, 0).unwrap_or(NaiveTime::MIN)
}

pub fn default_check_out() -> NaiveTime {
    NaiveTime::from_hms_opt(DEFAULT_CHECK_OUT.0, DEFAULT_CHECK_OUT.1, 0).unwrap_or(NaiveTime::MIN)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn put_fills_default_check_times() {
        let input: HotelInput = serde_json::from_value(serde_json::json!({
            "title": "Grand Volga",
            "city": "Kazan",
            "address": "Baumana St, 9"
        }))
        .unwrap();

        let patch = HotelPatch::from(input);
        assert_eq!(patch.check_in_time, NaiveTime::from_hms_opt(14, 0, 0));
        assert_eq!(patch.check_out_time, NaiveTime::from_hms_opt(12, 0, 0));
        assert_eq!(patch.postal_code, Some(None));
    }

    #[test]
    fn patch_distinguishes_null_from_absent() {
        let absent: HotelPatch = serde_json::from_str("{}").unwrap();
        assert!(absent.is_empty());

        let cleared: HotelPatch = serde_json::from_str(r#"{"postal_code": null}"#).unwrap();
        assert_eq!(cleared.postal_code, Some(None));
        assert!(!cleared.is_empty());
    }

    #[test]
    fn missing_required_field_fails_to_parse() {
        let result: Result<HotelInput, _> =
            serde_json::from_value(serde_json::json!({ "title": "No city" }));
        assert!(result.is_err());
    }
}
