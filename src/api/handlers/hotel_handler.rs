//! Hotel handlers.
//!
//! Hotels name their city in the body; the response carries the resolved
//! city and country names.

use axum::{extract::State, response::Json, routing::get, Router};

use crate::api::extractors::{Filter, IdPath, ValidatedJson, ValidatedQuery};
use crate::api::AppState;
use crate::domain::{Hotel, HotelFilter, HotelInput, HotelPatch};
use crate::errors::AppResult;
use crate::types::{PaginationParams, StatusResponse};

pub fn hotel_routes() -> Router<AppState> {
    Router::new()
        .route("/", get(list_hotels).post(create_hotel))
        // Same parameter name as the nested room routes
        .route(
            "/:hotel_id",
            get(get_hotel)
                .put(update_hotel)
                .patch(patch_hotel)
                .delete(delete_hotel),
        )
}

/// List hotels
///
/// Text filters match case-insensitive substrings; `city_id` is exact.
#[utoipa::path(
    get,
    path = "/hotels",
    tag = "Hotels",
    params(PaginationParams, HotelFilter),
    responses(
        (status = 200, description = "Hotels ordered by id", body = Vec<Hotel>),
        (status = 422, description = "Invalid pagination or filter")
    )
)]
pub async fn list_hotels(
    State(state): State<AppState>,
    ValidatedQuery(page): ValidatedQuery<PaginationParams>,
    Filter(filter): Filter<HotelFilter>,
) -> AppResult<Json<Vec<Hotel>>> {
    Ok(Json(state.services.hotels.list(filter, page).await?))
}

#[utoipa::path(
    get,
    path = "/hotels/{id}",
    tag = "Hotels",
    params(("id" = i32, Path, description = "Hotel ID")),
    responses(
        (status = 200, description = "Hotel with its facilities", body = Hotel),
        (status = 404, description = "Hotel not found"),
        (status = 422, description = "Invalid hotel id")
    )
)]
pub async fn get_hotel(
    State(state): State<AppState>,
    IdPath(id): IdPath<i32>,
) -> AppResult<Json<Hotel>> {
    Ok(Json(state.services.hotels.get(id).await?))
}

/// Create a hotel in a city looked up by name
#[utoipa::path(
    post,
    path = "/hotels",
    tag = "Hotels",
    request_body = HotelInput,
    responses(
        (status = 200, description = "Hotel created", body = StatusResponse),
        (status = 404, description = "City or facility not found"),
        (status = 422, description = "Validation error")
    )
)]
pub async fn create_hotel(
    State(state): State<AppState>,
    ValidatedJson(payload): ValidatedJson<HotelInput>,
) -> AppResult<StatusResponse> {
    state.services.hotels.create(payload).await?;
    Ok(StatusResponse::ok())
}

/// Replace a hotel; omitted check-in/out times fall back to the defaults
#[utoipa::path(
    put,
    path = "/hotels/{id}",
    tag = "Hotels",
    params(("id" = i32, Path, description = "Hotel ID")),
    request_body = HotelInput,
    responses(
        (status = 200, description = "Hotel replaced", body = StatusResponse),
        (status = 404, description = "Hotel, city or facility not found"),
        (status = 422, description = "Validation error")
    )
)]
pub async fn update_hotel(
    State(state): State<AppState>,
    IdPath(id): IdPath<i32>,
    ValidatedJson(payload): ValidatedJson<HotelInput>,
) -> AppResult<StatusResponse> {
    state.services.hotels.update(id, payload.into()).await?;
    Ok(StatusResponse::ok())
}

#[utoipa::path(
    patch,
    path = "/hotels/{id}",
    tag = "Hotels",
    params(("id" = i32, Path, description = "Hotel ID")),
    request_body = HotelPatch,
    responses(
        (status = 200, description = "Hotel updated", body = StatusResponse),
        (status = 404, description = "Hotel, city or facility not found"),
        (status = 422, description = "Validation error")
    )
)]
pub async fn patch_hotel(
    State(state): State<AppState>,
    IdPath(id): IdPath<i32>,
    ValidatedJson(payload): ValidatedJson<HotelPatch>,
) -> AppResult<StatusResponse> {
    state.services.hotels.update(id, payload).await?;
    Ok(StatusResponse::ok())
}

/// Delete a hotel with its rooms and images
#[utoipa::path(
    delete,
    path = "/hotels/{id}",
    tag = "Hotels",
    params(("id" = i32, Path, description = "Hotel ID")),
    responses(
        (status = 200, description = "Hotel deleted", body = StatusResponse),
        (status = 404, description = "Hotel not found"),
        (status = 409, description = "Hotel rooms still have bookings")
    )
)]
pub async fn delete_hotel(
    State(state): State<AppState>,
    IdPath(id): IdPath<i32>,
) -> AppResult<StatusResponse> {
    state.services.hotels.delete(id).await?;
    Ok(StatusResponse::ok())
}
