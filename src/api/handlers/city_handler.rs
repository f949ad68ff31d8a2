//! City handlers.

use axum::{extract::State, response::Json, routing::get, Router};

use crate::api::extractors::{Filter, IdPath, ValidatedJson, ValidatedQuery};
use crate::api::AppState;
use crate::domain::{City, CityFilter, CityInput, CityPatch};
use crate::errors::AppResult;
use crate::types::{PaginationParams, StatusResponse};

pub fn city_routes() -> Router<AppState> {
    Router::new()
        .route("/", get(list_cities).post(create_city))
        .route(
            "/:id",
            get(get_city)
                .put(update_city)
                .patch(patch_city)
                .delete(delete_city),
        )
}

/// List cities, optionally filtered by name and country
#[utoipa::path(
    get,
    path = "/cities",
    tag = "Cities",
    params(PaginationParams, CityFilter),
    responses(
        (status = 200, description = "Cities ordered by id", body = Vec<City>),
        (status = 422, description = "Invalid pagination or filter")
    )
)]
pub async fn list_cities(
    State(state): State<AppState>,
    ValidatedQuery(page): ValidatedQuery<PaginationParams>,
    Filter(filter): Filter<CityFilter>,
) -> AppResult<Json<Vec<City>>> {
    Ok(Json(state.services.cities.list(filter, page).await?))
}

#[utoipa::path(
    get,
    path = "/cities/{id}",
    tag = "Cities",
    params(("id" = i32, Path, description = "City ID")),
    responses(
        (status = 200, description = "City found", body = City),
        (status = 404, description = "City not found")
    )
)]
pub async fn get_city(
    State(state): State<AppState>,
    IdPath(id): IdPath<i32>,
) -> AppResult<Json<City>> {
    Ok(Json(state.services.cities.get(id).await?))
}

/// Create a city in an existing country
#[utoipa::path(
    post,
    path = "/cities",
    tag = "Cities",
    request_body = CityInput,
    responses(
        (status = 200, description = "City created", body = StatusResponse),
        (status = 404, description = "Country not found"),
        (status = 409, description = "City already exists in this country"),
        (status = 422, description = "Validation error")
    )
)]
pub async fn create_city(
    State(state): State<AppState>,
    ValidatedJson(payload): ValidatedJson<CityInput>,
) -> AppResult<StatusResponse> {
    state.services.cities.create(payload).await?;
    Ok(StatusResponse::ok())
}

#[utoipa::path(
    put,
    path = "/cities/{id}",
    tag = "Cities",
    params(("id" = i32, Path, description = "City ID")),
    request_body = CityInput,
    responses(
        (status = 200, description = "City replaced", body = StatusResponse),
        (status = 404, description = "City not found"),
        (status = 409, description = "City already exists in this country"),
        (status = 422, description = "Validation error")
    )
)]
pub async fn update_city(
    State(state): State<AppState>,
    IdPath(id): IdPath<i32>,
    ValidatedJson(payload): ValidatedJson<CityInput>,
) -> AppResult<StatusResponse> {
    state.services.cities.update(id, payload.into()).await?;
    Ok(StatusResponse::ok())
}

/// Change only the fields present in the body
#[utoipa::path(
    patch,
    path = "/cities/{id}",
    tag = "Cities",
    params(("id" = i32, Path, description = "City ID")),
    request_body = CityPatch,
    responses(
        (status = 200, description = "City updated", body = StatusResponse),
        (status = 404, description = "City not found"),
        (status = 409, description = "City already exists in this country"),
        (status = 422, description = "Validation error")
    )
)]
pub async fn patch_city(
    State(state): State<AppState>,
    IdPath(id): IdPath<i32>,
    ValidatedJson(payload): ValidatedJson<CityPatch>,
) -> AppResult<StatusResponse> {
    state.services.cities.update(id, payload).await?;
    Ok(StatusResponse::ok())
}

#[utoipa::path(
    delete,
    path = "/cities/{id}",
    tag = "Cities",
    params(("id" = i32, Path, description = "City ID")),
    responses(
        (status = 200, description = "City deleted", body = StatusResponse),
        (status = 404, description = "City not found"),
        (status = 400, description = "City still has hotels")
    )
)]
pub async fn delete_city(
    State(state): State<AppState>,
    IdPath(id): IdPath<i32>,
) -> AppResult<StatusResponse> {
    state.services.cities.delete(id).await?;
    Ok(StatusResponse::ok())
}
