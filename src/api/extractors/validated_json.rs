//! Validated JSON extractor - Combines deserialization with validation.

use axum::{
    async_trait,
    extract::{rejection::JsonRejection, FromRequest, Request},
    Json,
};
use serde::de::DeserializeOwned;
use validator::Validate;

use crate::errors::AppError;

/// JSON body that must parse and pass its `Validate` rules.
///
/// Malformed JSON, missing fields and failed rules all become a 422.
///
/// # Example
///
/// ```rust,ignore
/// use serde::Deserialize;
/// use validator::Validate;
/// use hotel_booking::api::extractors::ValidatedJson;
///
/// #[derive(Deserialize, Validate)]
/// struct FacilityInput {
///     #[validate(length(min = 1, max = 100))]
///     name: String,
/// }
///
/// async fn create_facility(ValidatedJson(input): ValidatedJson<FacilityInput>) {
///     // input is already validated
/// }
/// ```
pub struct ValidatedJson<T>(pub T);

#[async_trait]
impl<S, T> FromRequest<S> for ValidatedJson<T>
where
    S: Send + Sync,
    T: DeserializeOwned + Validate,
    Json<T>: FromRequest<S, Rejection = JsonRejection>,
{
    type Rejection = AppError;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        let Json(value) = Json::<T>::from_request(req, state)
            .await
            .map_err(|e| AppError::validation(e.body_text()))?;

        value
            .validate()
            .map_err(|e| AppError::validation(format_validation_errors(&e)))?;

        Ok(ValidatedJson(value))
    }
}

/// Join field errors into one message, sorted by field name.
pub(crate) fn format_validation_errors(errors: &validator::ValidationErrors) -> String {
    let mut fields: Vec<_> = errors.field_errors().into_iter().collect();
    fields.sort_by(|a, b| a.0.cmp(&b.0));

    fields
        .into_iter()
        .flat_map(|(field, errs)| {
            errs.iter().map(move |e| {
                e.message
                    .as_ref()
                    .map(|m| m.to_string())
                    .unwrap_or_else(|| format!("{} is invalid", field))
            })
        })
        .collect::<Vec<_>>()
        .join(", ")
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::{body::Body, http::header::CONTENT_TYPE};
    use serde::Deserialize;

    #[derive(Debug, Deserialize, Validate)]
    struct Input {
        #[validate(length(min = 1, message = "name is required"))]
        name: String,
        #[validate(range(min = 1))]
        capacity: i32,
    }

    fn json_request(body: &str) -> Request {
        Request::builder()
            .header(CONTENT_TYPE, "application/json")
            .body(Body::from(body.to_string()))
            .unwrap()
    }

    #[tokio::test]
    async fn accepts_a_valid_body() {
        let ValidatedJson(input) =
            ValidatedJson::<Input>::from_request(json_request(r#"{"name":"Spa","capacity":2}"#), &())
                .await
                .unwrap();
        assert_eq!(input.name, "Spa");
        assert_eq!(input.capacity, 2);
    }

    #[tokio::test]
    async fn missing_field_is_a_validation_error() {
        let err = ValidatedJson::<Input>::from_request(json_request(r#"{"name":"Spa"}"#), &())
            .await
            .err()
            .unwrap();
        assert!(matches!(err, AppError::Validation(_)));
    }

    #[tokio::test]
    async fn failed_rules_are_reported_per_field() {
        let err = ValidatedJson::<Input>::from_request(json_request(r#"{"name":"","capacity":0}"#), &())
            .await
            .err()
            .unwrap();
        let AppError::Validation(message) = err else {
            panic!("expected a validation error");
        };
        assert_eq!(message, "capacity is invalid, name is required");
    }
}
