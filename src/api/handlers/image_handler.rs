//! Hotel image handlers.

use axum::{extract::State, response::Json, routing::get, Router};

use crate::api::extractors::{Filter, IdPath, ValidatedJson, ValidatedQuery};
use crate::api::AppState;
use crate::domain::{Image, ImageFilter, ImageInput, ImagePatch};
use crate::errors::AppResult;
use crate::types::{PaginationParams, StatusResponse};

pub fn image_routes() -> Router<AppState> {
    Router::new()
        .route("/", get(list_images).post(create_image))
        .route(
            "/:id",
            get(get_image)
                .put(update_image)
                .patch(patch_image)
                .delete(delete_image),
        )
}

/// List images, optionally for one hotel
#[utoipa::path(
    get,
    path = "/images",
    tag = "Images",
    params(PaginationParams, ImageFilter),
    responses(
        (status = 200, description = "Images ordered by id", body = Vec<Image>),
        (status = 422, description = "Invalid pagination or filter")
    )
)]
pub async fn list_images(
    State(state): State<AppState>,
    ValidatedQuery(page): ValidatedQuery<PaginationParams>,
    Filter(filter): Filter<ImageFilter>,
) -> AppResult<Json<Vec<Image>>> {
    Ok(Json(state.services.images.list(filter, page).await?))
}

#[utoipa::path(
    get,
    path = "/images/{id}",
    tag = "Images",
    params(("id" = i32, Path, description = "Image ID")),
    responses(
        (status = 200, description = "Image found", body = Image),
        (status = 404, description = "Image not found")
    )
)]
pub async fn get_image(
    State(state): State<AppState>,
    IdPath(id): IdPath<i32>,
) -> AppResult<Json<Image>> {
    Ok(Json(state.services.images.get(id).await?))
}

/// Attach an image to an existing hotel
#[utoipa::path(
    post,
    path = "/images",
    tag = "Images",
    request_body = ImageInput,
    responses(
        (status = 200, description = "Image created", body = StatusResponse),
        (status = 404, description = "Hotel not found"),
        (status = 422, description = "Validation error")
    )
)]
pub async fn create_image(
    State(state): State<AppState>,
    ValidatedJson(payload): ValidatedJson<ImageInput>,
) -> AppResult<StatusResponse> {
    state.services.images.create(payload).await?;
    Ok(StatusResponse::ok())
}

#[utoipa::path(
    put,
    path = "/images/{id}",
    tag = "Images",
    params(("id" = i32, Path, description = "Image ID")),
    request_body = ImageInput,
    responses(
        (status = 200, description = "Image replaced", body = StatusResponse),
        (status = 404, description = "Image not found"),
        (status = 422, description = "Validation error")
    )
)]
pub async fn update_image(
    State(state): State<AppState>,
    IdPath(id): IdPath<i32>,
    ValidatedJson(payload): ValidatedJson<ImageInput>,
) -> AppResult<StatusResponse> {
    state.services.images.update(id, payload.into()).await?;
    Ok(StatusResponse::ok())
}

#[utoipa::path(
    patch,
    path = "/images/{id}",
    tag = "Images",
    params(("id" = i32, Path, description = "Image ID")),
    request_body = ImagePatch,
    responses(
        (status = 200, description = "Image updated", body = StatusResponse),
        (status = 404, description = "Image not found"),
        (status = 422, description = "Validation error")
    )
)]
pub async fn patch_image(
    State(state): State<AppState>,
    IdPath(id): IdPath<i32>,
    ValidatedJson(payload): ValidatedJson<ImagePatch>,
) -> AppResult<StatusResponse> {
    state.services.images.update(id, payload).await?;
    Ok(StatusResponse::ok())
}

#[utoipa::path(
    delete,
    path = "/images/{id}",
    tag = "Images",
    params(("id" = i32, Path, description = "Image ID")),
    responses(
        (status = 200, description = "Image deleted", body = StatusResponse),
        (status = 404, description = "Image not found")
    )
)]
pub async fn delete_image(
    State(state): State<AppState>,
    IdPath(id): IdPath<i32>,
) -> AppResult<StatusResponse> {
    state.services.images.delete(id).await?;
    Ok(StatusResponse::ok())
}
