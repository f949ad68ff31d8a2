//! Room handlers, nested under `/hotels/{hotel_id}/rooms`.

use axum::{extract::State, response::Json, routing::get, Router};

use crate::api::extractors::{Filter, IdPath, ValidatedJson, ValidatedQuery};
use crate::api::AppState;
use crate::domain::{Room, RoomFilter, RoomInput, RoomPatch};
use crate::errors::AppResult;
use crate::types::{PaginationParams, StatusResponse};

pub fn room_routes() -> Router<AppState> {
    Router::new()
        .route("/", get(list_rooms).post(create_room))
        .route(
            "/:id",
            get(get_room)
                .put(update_room)
                .patch(patch_room)
                .delete(delete_room),
        )
}

/// List a hotel's rooms
///
/// With both `date_from` and `date_to` only rooms free for the whole stay
/// are returned.
#[utoipa::path(
    get,
    path = "/hotels/{hotel_id}/rooms",
    tag = "Rooms",
    params(
        ("hotel_id" = i32, Path, description = "Hotel ID"),
        PaginationParams,
        RoomFilter
    ),
    responses(
        (status = 200, description = "Rooms ordered by id", body = Vec<Room>),
        (status = 400, description = "date_from is not before date_to"),
        (status = 404, description = "Hotel not found")
    )
)]
pub async fn list_rooms(
    State(state): State<AppState>,
    IdPath(hotel_id): IdPath<i32>,
    ValidatedQuery(page): ValidatedQuery<PaginationParams>,
    Filter(filter): Filter<RoomFilter>,
) -> AppResult<Json<Vec<Room>>> {
    Ok(Json(state.services.rooms.list(hotel_id, filter, page).await?))
}

#[utoipa::path(
    get,
    path = "/hotels/{hotel_id}/rooms/{id}",
    tag = "Rooms",
    params(
        ("hotel_id" = i32, Path, description = "Hotel ID"),
        ("id" = i32, Path, description = "Room ID")
    ),
    responses(
        (status = 200, description = "Room with its facilities", body = Room),
        (status = 404, description = "Room not found in this hotel")
    )
)]
pub async fn get_room(
    State(state): State<AppState>,
    IdPath((hotel_id, id)): IdPath<(i32, i32)>,
) -> AppResult<Json<Room>> {
    Ok(Json(state.services.rooms.get(hotel_id, id).await?))
}

#[utoipa::path(
    post,
    path = "/hotels/{hotel_id}/rooms",
    tag = "Rooms",
    params(("hotel_id" = i32, Path, description = "Hotel ID")),
    request_body = RoomInput,
    responses(
        (status = 200, description = "Room created", body = StatusResponse),
        (status = 404, description = "Hotel or facility not found"),
        (status = 422, description = "Validation error")
    )
)]
pub async fn create_room(
    State(state): State<AppState>,
    IdPath(hotel_id): IdPath<i32>,
    ValidatedJson(payload): ValidatedJson<RoomInput>,
) -> AppResult<StatusResponse> {
    state.services.rooms.create(hotel_id, payload).await?;
    Ok(StatusResponse::ok())
}

#[utoipa::path(
    put,
    path = "/hotels/{hotel_id}/rooms/{id}",
    tag = "Rooms",
    params(
        ("hotel_id" = i32, Path, description = "Hotel ID"),
        ("id" = i32, Path, description = "Room ID")
    ),
    request_body = RoomInput,
    responses(
        (status = 200, description = "Room replaced", body = StatusResponse),
        (status = 404, description = "Room or facility not found"),
        (status = 422, description = "Validation error")
    )
)]
pub async fn update_room(
    State(state): State<AppState>,
    IdPath((hotel_id, id)): IdPath<(i32, i32)>,
    ValidatedJson(payload): ValidatedJson<RoomInput>,
) -> AppResult<StatusResponse> {
    state
        .services
        .rooms
        .update(hotel_id, id, payload.into())
        .await?;
    Ok(StatusResponse::ok())
}

#[utoipa::path(
    patch,
    path = "/hotels/{hotel_id}/rooms/{id}",
    tag = "Rooms",
    params(
        ("hotel_id" = i32, Path, description = "Hotel ID"),
        ("id" = i32, Path, description = "Room ID")
    ),
    request_body = RoomPatch,
    responses(
        (status = 200, description = "Room updated", body = StatusResponse),
        (status = 404, description = "Room or facility not found"),
        (status = 422, description = "Validation error")
    )
)]
pub async fn patch_room(
    State(state): State<AppState>,
    IdPath((hotel_id, id)): IdPath<(i32, i32)>,
    ValidatedJson(payload): ValidatedJson<RoomPatch>,
) -> AppResult<StatusResponse> {
    state.services.rooms.update(hotel_id, id, payload).await?;
    Ok(StatusResponse::ok())
}

#[utoipa::path(
    delete,
    path = "/hotels/{hotel_id}/rooms/{id}",
    tag = "Rooms",
    params(
        ("hotel_id" = i32, Path, description = "Hotel ID"),
        ("id" = i32, Path, description = "Room ID")
    ),
    responses(
        (status = 200, description = "Room deleted", body = StatusResponse),
        (status = 400, description = "Room has bookings"),
        (status = 404, description = "Room not found in this hotel")
    )
)]
pub async fn delete_room(
    State(state): State<AppState>,
    IdPath((hotel_id, id)): IdPath<(i32, i32)>,
) -> AppResult<StatusResponse> {
    state.services.rooms.delete(hotel_id, id).await?;
    Ok(StatusResponse::ok())
}
