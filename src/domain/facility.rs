//! Facility entity: an amenity linked to hotels and rooms.

use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use validator::Validate;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct Facility {
    #[schema(example = 1)]
    pub id: i32,
    #[schema(example = "Wi-Fi")]
    pub name: String,
}

/// Body of `POST`/`PUT` on facilities. PATCH reuses it with an optional name.
#[derive(Debug, Clone, Deserialize, Validate, ToSchema)]
pub struct FacilityInput {
    #[validate(length(min = 1, max = 100, message = "Name must be 1-100 characters"))]
    #[schema(example = "Wi-Fi")]
    pub name: String,
}

#[derive(Debug, Clone, Default, Deserialize, Validate, ToSchema)]
pub struct FacilityPatch {
    #[validate(length(min = 1, max = 100, message = "Name must be 1-100 characters"))]
    pub name: Option<String>,
}

impl FacilityPatch {
    pub fn is_empty(&self) -> bool {
        self.name.is_none()
    }
}

impl From<FacilityInput> for FacilityPatch {
    fn from(input: FacilityInput) -> Self {
        Self {
            name: Some(input.name),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize, ToSchema, utoipa::IntoParams)]
#[into_params(parameter_in = Query)]
pub struct FacilityFilter {
    /// Case-insensitive substring of the facility name
    pub name: Option<String>,
}

/// Sorted, de-duplicated facility ids from a request body.
pub fn dedup_ids(ids: &[i32]) -> Vec<i32> {
    let mut ids = ids.to_vec();
    ids.sort_unstable();
    ids.dedup();
    ids
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn facility_ids_are_deduplicated() {
        assert_eq!(dedup_ids(&[3, 1, 3, 2, 1]), vec![1, 2, 3]);
        assert!(dedup_ids(&[]).is_empty());
    }
}
