//! Hotel image entity.

use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use validator::Validate;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct Image {
    #[schema(example = 1)]
    pub id: i32,
    #[schema(example = 1)]
    pub hotel_id: i32,
    #[schema(example = "https://cdn.example.com/hotels/1/lobby.jpg")]
    pub url: String,
    pub description: Option<String>,
}

#[derive(Debug, Clone, Deserialize, Validate, ToSchema)]
pub struct ImageInput {
    #[validate(range(min = 1))]
    pub hotel_id: i32,
    #[validate(url(message = "Invalid URL"), length(max = 2048))]
    #[schema(example = "https://cdn.example.com/hotels/1/lobby.jpg")]
    pub url: String,
    #[validate(length(max = 500))]
    pub description: Option<String>,
}

#[derive(Debug, Clone, Default, Deserialize, Validate, ToSchema)]
pub struct ImagePatch {
    #[validate(range(min = 1))]
    pub hotel_id: Option<i32>,
    #[validate(url(message = "Invalid URL"), length(max = 2048))]
    pub url: Option<String>,
    /// `null` clears the description
    #[serde(default, deserialize_with = "super::double_option")]
    #[validate(length(max = 500))]
    #[schema(value_type = Option<String>)]
    pub description: Option<Option<String>>,
}

impl ImagePatch {
    pub fn is_empty(&self) -> bool {
        self.hotel_id.is_none() && self.url.is_none() && self.description.is_none()
    }
}

impl From<ImageInput> for ImagePatch {
    fn from(input: ImageInput) -> Self {
        Self {
            hotel_id: Some(input.hotel_id),
            url: Some(input.url),
            description: Some(input.description),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize, ToSchema, utoipa::IntoParams)]
#[into_params(parameter_in = Query)]
pub struct ImageFilter {
    pub hotel_id: Option<i32>,
}
