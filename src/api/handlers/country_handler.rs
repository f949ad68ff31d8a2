//! Country handlers. ISO codes are stored upper-cased whatever the input case.

use axum::{extract::State, response::Json, routing::get, Router};

use crate::api::extractors::{Filter, IdPath, ValidatedJson, ValidatedQuery};
use crate::api::AppState;
use crate::domain::{Country, CountryFilter, CountryInput, CountryPatch};
use crate::errors::AppResult;
use crate::types::{PaginationParams, StatusResponse};

pub fn country_routes() -> Router<AppState> {
    Router::new()
        .route("/", get(list_countries).post(create_country))
        .route(
            "/:id",
            get(get_country)
                .put(update_country)
                .patch(patch_country)
                .delete(delete_country),
        )
}

/// List countries, optionally filtered by name
#[utoipa::path(
    get,
    path = "/countries",
    tag = "Countries",
    params(PaginationParams, CountryFilter),
    responses(
        (status = 200, description = "Countries ordered by id", body = Vec<Country>),
        (status = 422, description = "Invalid pagination or filter")
    )
)]
pub async fn list_countries(
    State(state): State<AppState>,
    ValidatedQuery(page): ValidatedQuery<PaginationParams>,
    Filter(filter): Filter<CountryFilter>,
) -> AppResult<Json<Vec<Country>>> {
    Ok(Json(state.services.countries.list(filter, page).await?))
}

#[utoipa::path(
    get,
    path = "/countries/{id}",
    tag = "Countries",
    params(("id" = i32, Path, description = "Country ID")),
    responses(
        (status = 200, description = "Country found", body = Country),
        (status = 404, description = "Country not found")
    )
)]
pub async fn get_country(
    State(state): State<AppState>,
    IdPath(id): IdPath<i32>,
) -> AppResult<Json<Country>> {
    Ok(Json(state.services.countries.get(id).await?))
}

/// Create a country; name and ISO code must both be unused
#[utoipa::path(
    post,
    path = "/countries",
    tag = "Countries",
    request_body = CountryInput,
    responses(
        (status = 200, description = "Country created", body = StatusResponse),
        (status = 409, description = "Name or ISO code already used"),
        (status = 422, description = "Validation error")
    )
)]
pub async fn create_country(
    State(state): State<AppState>,
    ValidatedJson(payload): ValidatedJson<CountryInput>,
) -> AppResult<StatusResponse> {
    state.services.countries.create(payload).await?;
    Ok(StatusResponse::ok())
}

#[utoipa::path(
    put,
    path = "/countries/{id}",
    tag = "Countries",
    params(("id" = i32, Path, description = "Country ID")),
    request_body = CountryInput,
    responses(
        (status = 200, description = "Country replaced", body = StatusResponse),
        (status = 404, description = "Country not found"),
        (status = 409, description = "Name or ISO code already used"),
        (status = 422, description = "Validation error")
    )
)]
pub async fn update_country(
    State(state): State<AppState>,
    IdPath(id): IdPath<i32>,
    ValidatedJson(payload): ValidatedJson<CountryInput>,
) -> AppResult<StatusResponse> {
    state.services.countries.update(id, payload.into()).await?;
    Ok(StatusResponse::ok())
}

/// Change only the fields present in the body
#[utoipa::path(
    patch,
    path = "/countries/{id}",
    tag = "Countries",
    params(("id" = i32, Path, description = "Country ID")),
    request_body = CountryPatch,
    responses(
        (status = 200, description = "Country updated", body = StatusResponse),
        (status = 404, description = "Country not found"),
        (status = 409, description = "Name or ISO code already used"),
        (status = 422, description = "Validation error")
    )
)]
pub async fn patch_country(
    State(state): State<AppState>,
    IdPath(id): IdPath<i32>,
    ValidatedJson(payload): ValidatedJson<CountryPatch>,
) -> AppResult<StatusResponse> {
    state.services.countries.update(id, payload).await?;
    Ok(StatusResponse::ok())
}

#[utoipa::path(
    delete,
    path = "/countries/{id}",
    tag = "Countries",
    params(("id" = i32, Path, description = "Country ID")),
    responses(
        (status = 200, description = "Country deleted", body = StatusResponse),
        (status = 404, description = "Country not found"),
        (status = 400, description = "Country still has cities")
    )
)]
pub async fn delete_country(
    State(state): State<AppState>,
    IdPath(id): IdPath<i32>,
) -> AppResult<StatusResponse> {
    state.services.countries.delete(id).await?;
    Ok(StatusResponse::ok())
}
