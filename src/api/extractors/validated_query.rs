//! Query-string and path extractors with 422 rejections.

use axum::{
    async_trait,
    extract::{FromRequestParts, Path, Query},
    http::request::Parts,
};
use serde::de::DeserializeOwned;
use validator::Validate;

use super::validated_json::format_validation_errors;
use crate::errors::AppError;

/// Query parameters that must parse and pass their `Validate` rules.
pub struct ValidatedQuery<T>(pub T);

#[async_trait]
impl<S, T> FromRequestParts<S> for ValidatedQuery<T>
where
    S: Send + Sync,
    T: DeserializeOwned + Validate,
{
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let Query(value) = Query::<T>::from_request_parts(parts, state)
            .await
            .map_err(|e| AppError::validation(e.body_text()))?;

        value
            .validate()
            .map_err(|e| AppError::validation(format_validation_errors(&e)))?;

        Ok(ValidatedQuery(value))
    }
}

/// List filters read from the same query string as the pagination.
///
/// Unknown keys are ignored, so a handler can take both a `Filter` and a
/// `ValidatedQuery<PaginationParams>`.
pub struct Filter<T>(pub T);

#[async_trait]
impl<S, T> FromRequestParts<S> for Filter<T>
where
    S: Send + Sync,
    T: DeserializeOwned,
{
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let Query(value) = Query::<T>::from_request_parts(parts, state)
            .await
            .map_err(|e| AppError::validation(e.body_text()))?;
        Ok(Filter(value))
    }
}

/// Path parameters; `/hotels/abc` is a 422, not a 400.
pub struct IdPath<T>(pub T);

#[async_trait]
impl<S, T> FromRequestParts<S> for IdPath<T>
where
    S: Send + Sync,
    T: DeserializeOwned + Send,
{
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let Path(value) = Path::<T>::from_request_parts(parts, state)
            .await
            .map_err(|e| AppError::validation(e.body_text()))?;
        Ok(IdPath(value))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::HotelFilter;
    use crate::types::PaginationParams;
    use axum::http::Request;

    fn parts(uri: &str) -> Parts {
        Request::builder().uri(uri).body(()).unwrap().into_parts().0
    }

    #[tokio::test]
    async fn pagination_defaults_when_absent() {
        let ValidatedQuery(page) =
            ValidatedQuery::<PaginationParams>::from_request_parts(&mut parts("/hotels"), &())
                .await
                .unwrap();
        assert_eq!(page, PaginationParams::default());
    }

    #[tokio::test]
    async fn page_zero_is_rejected() {
        let result = ValidatedQuery::<PaginationParams>::from_request_parts(
            &mut parts("/hotels?page=0"),
            &(),
        )
        .await;
        assert!(matches!(result, Err(AppError::Validation(_))));
    }

    #[tokio::test]
    async fn non_numeric_page_is_rejected() {
        let result = ValidatedQuery::<PaginationParams>::from_request_parts(
            &mut parts("/hotels?page=first"),
            &(),
        )
        .await;
        assert!(matches!(result, Err(AppError::Validation(_))));
    }

    #[tokio::test]
    async fn filter_and_pagination_share_the_query_string() {
        let mut parts = parts("/hotels?page=2&per_page=3&title=grand&city_id=4");

        let ValidatedQuery(page) = ValidatedQuery::<PaginationParams>::from_request_parts(&mut parts, &())
            .await
            .unwrap();
        let Filter(filter) = Filter::<HotelFilter>::from_request_parts(&mut parts, &())
            .await
            .unwrap();

        assert_eq!(page, PaginationParams::new(2, 3));
        assert_eq!(filter.title.as_deref(), Some("grand"));
        assert_eq!(filter.city_id, Some(4));
    }
}
