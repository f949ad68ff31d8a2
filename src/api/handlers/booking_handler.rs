//! Booking handlers.
//!
//! Reading is public; creating requires a token, and changing or cancelling
//! a booking is reserved to the guest who made it.

use axum::{
    extract::{Extension, State},
    middleware,
    response::Json,
    routing::{get, post, put},
    Router,
};

use crate::api::extractors::{IdPath, ValidatedJson, ValidatedQuery};
use crate::api::middleware::{auth_middleware, CurrentUser};
use crate::api::AppState;
use crate::domain::{Booking, BookingDates, BookingInput, BookingPatch};
use crate::errors::AppResult;
use crate::types::{PaginationParams, StatusResponse};

pub fn booking_routes(state: AppState) -> Router<AppState> {
    let auth = middleware::from_fn_with_state(state, auth_middleware);

    Router::new()
        .route(
            "/",
            get(list_bookings).merge(post(create_booking).route_layer(auth.clone())),
        )
        .route("/me", get(list_my_bookings).route_layer(auth.clone()))
        .route(
            "/:id",
            get(get_booking).merge(
                put(update_booking)
                    .patch(patch_booking)
                    .delete(delete_booking)
                    .route_layer(auth),
            ),
        )
}

/// List all bookings
#[utoipa::path(
    get,
    path = "/bookings",
    tag = "Bookings",
    params(PaginationParams),
    responses(
        (status = 200, description = "Bookings ordered by id", body = Vec<Booking>)
    )
)]
pub async fn list_bookings(
    State(state): State<AppState>,
    ValidatedQuery(page): ValidatedQuery<PaginationParams>,
) -> AppResult<Json<Vec<Booking>>> {
    Ok(Json(state.services.bookings.list(page).await?))
}

/// Bookings of the authenticated user
#[utoipa::path(
    get,
    path = "/bookings/me",
    tag = "Bookings",
    security(("bearer_auth" = [])),
    params(PaginationParams),
    responses(
        (status = 200, description = "Own bookings ordered by id", body = Vec<Booking>),
        (status = 401, description = "Unauthorized")
    )
)]
pub async fn list_my_bookings(
    Extension(current_user): Extension<CurrentUser>,
    State(state): State<AppState>,
    ValidatedQuery(page): ValidatedQuery<PaginationParams>,
) -> AppResult<Json<Vec<Booking>>> {
    let bookings = state
        .services
        .bookings
        .list_for_user(current_user.id, page)
        .await?;
    Ok(Json(bookings))
}

#[utoipa::path(
    get,
    path = "/bookings/{id}",
    tag = "Bookings",
    params(("id" = i32, Path, description = "Booking ID")),
    responses(
        (status = 200, description = "Booking found", body = Booking),
        (status = 404, description = "Booking not found")
    )
)]
pub async fn get_booking(
    State(state): State<AppState>,
    IdPath(id): IdPath<i32>,
) -> AppResult<Json<Booking>> {
    Ok(Json(state.services.bookings.get(id).await?))
}

/// Book a room
///
/// The price is the room's nightly rate times the number of nights.
#[utoipa::path(
    post,
    path = "/bookings",
    tag = "Bookings",
    security(("bearer_auth" = [])),
    request_body = BookingInput,
    responses(
        (status = 200, description = "Booking created", body = StatusResponse),
        (status = 400, description = "date_from is not before date_to"),
        (status = 401, description = "Unauthorized"),
        (status = 404, description = "Room not found"),
        (status = 409, description = "Room already booked for these dates"),
        (status = 422, description = "Validation error")
    )
)]
pub async fn create_booking(
    Extension(current_user): Extension<CurrentUser>,
    State(state): State<AppState>,
    ValidatedJson(payload): ValidatedJson<BookingInput>,
) -> AppResult<StatusResponse> {
    state
        .services
        .bookings
        .create(current_user.id, payload)
        .await?;
    Ok(StatusResponse::ok())
}

/// Move a booking to new dates
#[utoipa::path(
    put,
    path = "/bookings/{id}",
    tag = "Bookings",
    security(("bearer_auth" = [])),
    params(("id" = i32, Path, description = "Booking ID")),
    request_body = BookingDates,
    responses(
        (status = 200, description = "Booking updated", body = StatusResponse),
        (status = 400, description = "date_from is not before date_to"),
        (status = 403, description = "Not your booking"),
        (status = 404, description = "Booking not found"),
        (status = 409, description = "Room already booked for these dates")
    )
)]
pub async fn update_booking(
    Extension(current_user): Extension<CurrentUser>,
    State(state): State<AppState>,
    IdPath(id): IdPath<i32>,
    ValidatedJson(payload): ValidatedJson<BookingDates>,
) -> AppResult<StatusResponse> {
    state
        .services
        .bookings
        .update(current_user.id, id, payload.into())
        .await?;
    Ok(StatusResponse::ok())
}

#[utoipa::path(
    patch,
    path = "/bookings/{id}",
    tag = "Bookings",
    security(("bearer_auth" = [])),
    params(("id" = i32, Path, description = "Booking ID")),
    request_body = BookingPatch,
    responses(
        (status = 200, description = "Booking updated", body = StatusResponse),
        (status = 400, description = "date_from is not before date_to"),
        (status = 403, description = "Not your booking"),
        (status = 404, description = "Booking not found"),
        (status = 409, description = "Room already booked for these dates")
    )
)]
pub async fn patch_booking(
    Extension(current_user): Extension<CurrentUser>,
    State(state): State<AppState>,
    IdPath(id): IdPath<i32>,
    ValidatedJson(payload): ValidatedJson<BookingPatch>,
) -> AppResult<StatusResponse> {
    state
        .services
        .bookings
        .update(current_user.id, id, payload)
        .await?;
    Ok(StatusResponse::ok())
}

/// Cancel a booking
#[utoipa::path(
    delete,
    path = "/bookings/{id}",
    tag = "Bookings",
    security(("bearer_auth" = [])),
    params(("id" = i32, Path, description = "Booking ID")),
    responses(
        (status = 200, description = "Booking deleted", body = StatusResponse),
        (status = 403, description = "Not your booking"),
        (status = 404, description = "Booking not found")
    )
)]
pub async fn delete_booking(
    Extension(current_user): Extension<CurrentUser>,
    State(state): State<AppState>,
    IdPath(id): IdPath<i32>,
) -> AppResult<StatusResponse> {
    state
        .services
        .bookings
        .delete(current_user.id, id)
        .await?;
    Ok(StatusResponse::ok())
}
