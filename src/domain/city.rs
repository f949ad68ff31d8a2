//! City entity and its input schemas.

use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use validator::Validate;

use super::Country;

/// A city together with the country it belongs to.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct City {
    #[schema(example = 1)]
    pub id: i32,
    #[schema(example = "Kazan")]
    pub name: String,
    pub country: Country,
}

#[derive(Debug, Clone, Deserialize, Validate, ToSchema)]
pub struct CityInput {
    #[validate(length(min = 1, max = 100, message = "Name must be 1-100 characters"))]
    #[schema(example = "Kazan")]
    pub name: String,
    #[validate(range(min = 1))]
    #[schema(example = 1)]
    pub country_id: i32,
}

#[derive(Debug, Clone, Default, Deserialize, Validate, ToSchema)]
pub struct CityPatch {
    #[validate(length(min = 1, max = 100, message = "Name must be 1-100 characters"))]
    pub name: Option<String>,
    #[validate(range(min = 1))]
    pub country_id: Option<i32>,
}

impl CityPatch {
    pub fn is_empty(&self) -> bool {
        self.name.is_none() && self.country_id.is_none()
    }
}

impl From<CityInput> for CityPatch {
    fn from(input: CityInput) -> Self {
        Self {
            name: Some(input.name),
            country_id: Some(input.country_id),
        }
    }
}

/// Query filters for `GET /cities`.
#[derive(Debug, Clone, Default, PartialEq, Deserialize, ToSchema, utoipa::IntoParams)]
#[into_params(parameter_in = Query)]
pub struct CityFilter {
    /// Case-insensitive substring of the city name
    pub name: Option<String>,
    pub country_id: Option<i32>,
}
