//! User handlers. Every route requires a bearer token; changes are self-only.

use axum::{
    extract::{Extension, State},
    response::Json,
    routing::get,
    Router,
};

use crate::api::extractors::{Filter, IdPath, ValidatedJson, ValidatedQuery};
use crate::api::middleware::CurrentUser;
use crate::api::AppState;
use crate::domain::{UserFilter, UserPatch, UserResponse, UserUpdate};
use crate::errors::AppResult;
use crate::types::{PaginationParams, StatusResponse};

/// Create user routes
pub fn user_routes() -> Router<AppState> {
    Router::new().route("/", get(list_users)).route(
        "/:id",
        get(get_user)
            .put(update_user)
            .patch(patch_user)
            .delete(delete_user),
    )
}

/// List users
#[utoipa::path(
    get,
    path = "/users",
    tag = "Users",
    security(("bearer_auth" = [])),
    params(PaginationParams, UserFilter),
    responses(
        (status = 200, description = "Users ordered by id", body = Vec<UserResponse>),
        (status = 401, description = "Unauthorized")
    )
)]
pub async fn list_users(
    State(state): State<AppState>,
    ValidatedQuery(page): ValidatedQuery<PaginationParams>,
    Filter(filter): Filter<UserFilter>,
) -> AppResult<Json<Vec<UserResponse>>> {
    let users = state.services.users.list_users(filter, page).await?;
    Ok(Json(users.into_iter().map(UserResponse::from).collect()))
}

/// Get user by ID
#[utoipa::path(
    get,
    path = "/users/{id}",
    tag = "Users",
    security(("bearer_auth" = [])),
    params(("id" = i32, Path, description = "User ID")),
    responses(
        (status = 200, description = "User profile", body = UserResponse),
        (status = 401, description = "Unauthorized"),
        (status = 404, description = "User not found")
    )
)]
pub async fn get_user(
    State(state): State<AppState>,
    IdPath(id): IdPath<i32>,
) -> AppResult<Json<UserResponse>> {
    let user = state.services.users.get_user(id).await?;
    Ok(Json(UserResponse::from(user)))
}

/// Replace own profile
#[utoipa::path(
    put,
    path = "/users/{id}",
    tag = "Users",
    security(("bearer_auth" = [])),
    params(("id" = i32, Path, description = "User ID")),
    request_body = UserUpdate,
    responses(
        (status = 200, description = "User updated", body = StatusResponse),
        (status = 403, description = "Not your account"),
        (status = 404, description = "User not found"),
        (status = 409, description = "Email already registered")
    )
)]
pub async fn update_user(
    Extension(current_user): Extension<CurrentUser>,
    State(state): State<AppState>,
    IdPath(id): IdPath<i32>,
    ValidatedJson(payload): ValidatedJson<UserUpdate>,
) -> AppResult<StatusResponse> {
    state
        .services
        .users
        .update_user(current_user.id, id, payload.into())
        .await?;
    Ok(StatusResponse::ok())
}

/// Change some fields of own profile
#[utoipa::path(
    patch,
    path = "/users/{id}",
    tag = "Users",
    security(("bearer_auth" = [])),
    params(("id" = i32, Path, description = "User ID")),
    request_body = UserPatch,
    responses(
        (status = 200, description = "User updated", body = StatusResponse),
        (status = 403, description = "Not your account"),
        (status = 404, description = "User not found"),
        (status = 409, description = "Email already registered")
    )
)]
pub async fn patch_user(
    Extension(current_user): Extension<CurrentUser>,
    State(state): State<AppState>,
    IdPath(id): IdPath<i32>,
    ValidatedJson(payload): ValidatedJson<UserPatch>,
) -> AppResult<StatusResponse> {
    state
        .services
        .users
        .update_user(current_user.id, id, payload)
        .await?;
    Ok(StatusResponse::ok())
}

/// Delete own account and its bookings
#[utoipa::path(
    delete,
    path = "/users/{id}",
    tag = "Users",
    security(("bearer_auth" = [])),
    params(("id" = i32, Path, description = "User ID")),
    responses(
        (status = 200, description = "User deleted", body = StatusResponse),
        (status = 403, description = "Not your account"),
        (status = 404, description = "User not found")
    )
)]
pub async fn delete_user(
    Extension(current_user): Extension<CurrentUser>,
    State(state): State<AppState>,
    IdPath(id): IdPath<i32>,
) -> AppResult<StatusResponse> {
    state
        .services
        .users
        .delete_user(current_user.id, id)
        .await?;
    Ok(StatusResponse::ok())
}
