//! Country entity and its input schemas.

use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use validator::Validate;

/// ISO-3166 alpha-2, either case; stored upper-cased.
static ISO_CODE_REGEX: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^[A-Za-z]{2}$").expect("ISO code pattern is valid"));

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct Country {
    #[schema(example = 1)]
    pub id: i32,
    #[schema(example = "Russia")]
    pub name: String,
    #[schema(example = "RU")]
    pub iso_code: String,
}

/// Body of `POST /countries` and `PUT /countries/{id}`.
#[derive(Debug, Clone, Deserialize, Validate, ToSchema)]
pub struct CountryInput {
    #[validate(length(min = 1, max = 100, message = "Name must be 1-100 characters"))]
    #[schema(example = "Russia")]
    pub name: String,
    #[validate(regex(path = *ISO_CODE_REGEX, message = "ISO code must be two letters"))]
    #[schema(example = "RU")]
    pub iso_code: String,
}

/// Body of `PATCH /countries/{id}`.
#[derive(Debug, Clone, Default, Deserialize, Validate, ToSchema)]
pub struct CountryPatch {
    #[validate(length(min = 1, max = 100, message = "Name must be 1-100 characters"))]
    pub name: Option<String>,
    #[validate(regex(path = *ISO_CODE_REGEX, message = "ISO code must be two letters"))]
    pub iso_code: Option<String>,
}

impl CountryPatch {
    pub fn is_empty(&self) -> bool {
        self.name.is_none() && self.iso_code.is_none()
    }
}

impl From<CountryInput> for CountryPatch {
    fn from(input: CountryInput) -> Self {
        Self {
            name: Some(input.name),
            iso_code: Some(input.iso_code),
        }
    }
}

/// Query filters for `GET /countries`.
#[derive(Debug, Clone, Default, PartialEq, Deserialize, ToSchema, utoipa::IntoParams)]
#[into_params(parameter_in = Query)]
pub struct CountryFilter {
    /// Case-insensitive substring of the country name
    pub name: Option<String>,
}

/// Canonical stored form of an ISO code.
pub fn normalize_iso_code(code: &str) -> String {
    code.trim().to_ascii_uppercase()
}
