//! Facility handlers.

use axum::{extract::State, response::Json, routing::get, Router};

use crate::api::extractors::{Filter, IdPath, ValidatedJson, ValidatedQuery};
use crate::api::AppState;
use crate::domain::{Facility, FacilityFilter, FacilityInput, FacilityPatch};
use crate::errors::AppResult;
use crate::types::{PaginationParams, StatusResponse};

pub fn facility_routes() -> Router<AppState> {
    Router::new()
        .route("/", get(list_facilities).post(create_facility))
        .route(
            "/:id",
            get(get_facility)
                .put(update_facility)
                .patch(patch_facility)
                .delete(delete_facility),
        )
}

/// List facilities, optionally filtered by name
#[utoipa::path(
    get,
    path = "/facilities",
    tag = "Facilities",
    params(PaginationParams, FacilityFilter),
    responses(
        (status = 200, description = "Facilities ordered by id", body = Vec<Facility>),
        (status = 422, description = "Invalid pagination or filter")
    )
)]
pub async fn list_facilities(
    State(state): State<AppState>,
    ValidatedQuery(page): ValidatedQuery<PaginationParams>,
    Filter(filter): Filter<FacilityFilter>,
) -> AppResult<Json<Vec<Facility>>> {
    Ok(Json(state.services.facilities.list(filter, page).await?))
}

#[utoipa::path(
    get,
    path = "/facilities/{id}",
    tag = "Facilities",
    params(("id" = i32, Path, description = "Facility ID")),
    responses(
        (status = 200, description = "Facility found", body = Facility),
        (status = 404, description = "Facility not found")
    )
)]
pub async fn get_facility(
    State(state): State<AppState>,
    IdPath(id): IdPath<i32>,
) -> AppResult<Json<Facility>> {
    Ok(Json(state.services.facilities.get(id).await?))
}

#[utoipa::path(
    post,
    path = "/facilities",
    tag = "Facilities",
    request_body = FacilityInput,
    responses(
        (status = 200, description = "Facility created", body = StatusResponse),
        (status = 409, description = "Facility name already used"),
        (status = 422, description = "Validation error")
    )
)]
pub async fn create_facility(
    State(state): State<AppState>,
    ValidatedJson(payload): ValidatedJson<FacilityInput>,
) -> AppResult<StatusResponse> {
    state.services.facilities.create(payload).await?;
    Ok(StatusResponse::ok())
}

#[utoipa::path(
    put,
    path = "/facilities/{id}",
    tag = "Facilities",
    params(("id" = i32, Path, description = "Facility ID")),
    request_body = FacilityInput,
    responses(
        (status = 200, description = "Facility replaced", body = StatusResponse),
        (status = 404, description = "Facility not found"),
        (status = 409, description = "Facility name already used"),
        (status = 422, description = "Validation error")
    )
)]
pub async fn update_facility(
    State(state): State<AppState>,
    IdPath(id): IdPath<i32>,
    ValidatedJson(payload): ValidatedJson<FacilityInput>,
) -> AppResult<StatusResponse> {
    state.services.facilities.update(id, payload.into()).await?;
    Ok(StatusResponse::ok())
}

#[utoipa::path(
    patch,
    path = "/facilities/{id}",
    tag = "Facilities",
    params(("id" = i32, Path, description = "Facility ID")),
    request_body = FacilityPatch,
    responses(
        (status = 200, description = "Facility updated", body = StatusResponse),
        (status = 404, description = "Facility not found"),
        (status = 409, description = "Facility name already used"),
        (status = 422, description = "Validation error")
    )
)]
pub async fn patch_facility(
    State(state): State<AppState>,
    IdPath(id): IdPath<i32>,
    ValidatedJson(payload): ValidatedJson<FacilityPatch>,
) -> AppResult<StatusResponse> {
    state.services.facilities.update(id, payload).await?;
    Ok(StatusResponse::ok())
}

#[utoipa::path(
    delete,
    path = "/facilities/{id}",
    tag = "Facilities",
    params(("id" = i32, Path, description = "Facility ID")),
    responses(
        (status = 200, description = "Facility deleted", body = StatusResponse),
        (status = 404, description = "Facility not found")
    )
)]
pub async fn delete_facility(
    State(state): State<AppState>,
    IdPath(id): IdPath<i32>,
) -> AppResult<StatusResponse> {
    state.services.facilities.delete(id).await?;
    Ok(StatusResponse::ok())
}
