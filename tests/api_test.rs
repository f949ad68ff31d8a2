//! Integration tests for the HTTP surface.
//!
//! The router runs on the real services over a disconnected database, so
//! every request that reaches a repository fails with 503. That is enough to
//! exercise routing, extraction, authentication and the error envelope
//! without Postgres or Redis.

use std::sync::Arc;

use axum::{
    body::{to_bytes, Body},
    http::{header, Request, StatusCode},
    Router,
};
use chrono::{Duration, NaiveDate, Utc};
use jsonwebtoken::{encode, EncodingKey, Header};
use sea_orm::DatabaseConnection;
use serde_json::{json, Value};
use tower::ServiceExt;

use hotel_booking::api::create_router;
use hotel_booking::config::{AppMode, Config};
use hotel_booking::domain::booking::{nights, total_price};
use hotel_booking::errors::AppError;
use hotel_booking::infra::{Cache, Database};
use hotel_booking::services::{Claims, Services};
use hotel_booking::types::{PaginationParams, StatusResponse};
use hotel_booking::{AppState, Password};

const SECRET: &str = "integration-secret-with-at-least-32-chars";

fn config() -> Config {
    Config {
        database_url: "postgres://localhost/unused".to_string(),
        redis_url: "redis://localhost:6379".to_string(),
        jwt_secret: SECRET.to_string(),
        jwt_expiration_hours: 1,
        server_host: "127.0.0.1".to_string(),
        server_port: 0,
        mode: AppMode::Test,
        cache_enabled: false,
        cache_ttl_seconds: 60,
        auto_migrate: false,
    }
}

fn app() -> Router {
    let services = Services::from_connection(DatabaseConnection::Disconnected, config());
    create_router(AppState::new(
        services,
        Arc::new(Cache::disabled()),
        Arc::new(Database::from_connection(DatabaseConnection::Disconnected)),
    ))
}

fn token_for(user_id: i32) -> String {
    let now = Utc::now();
    let claims = Claims {
        sub: user_id,
        email: format!("user{}@example.com", user_id),
        exp: (now + Duration::hours(1)).timestamp(),
        iat: now.timestamp(),
    };
    encode(
        &Header::default(),
        &claims,
        &EncodingKey::from_secret(SECRET.as_bytes()),
    )
    .unwrap()
}

async fn send(request: Request<Body>) -> (StatusCode, Value) {
    let response = app().oneshot(request).await.unwrap();
    let status = response.status();
    let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    (status, serde_json::from_slice(&bytes).unwrap_or(Value::Null))
}

fn get(uri: &str) -> Request<Body> {
    Request::builder().uri(uri).body(Body::empty()).unwrap()
}

fn post_json(uri: &str, body: Value, token: Option<&str>) -> Request<Body> {
    let mut builder = Request::builder()
        .method("POST")
        .uri(uri)
        .header(header::CONTENT_TYPE, "application/json");
    if let Some(token) = token {
        builder = builder.header(header::AUTHORIZATION, format!("Bearer {}", token));
    }
    builder.body(Body::from(body.to_string())).unwrap()
}

fn day(d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(2025, 7, d).unwrap()
}

// ---------------------------------------------------------------------------
// HTTP
// ---------------------------------------------------------------------------

#[tokio::test]
async fn root_returns_banner() {
    let response = app().oneshot(get("/")).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    assert_eq!(&bytes[..], b"Hotel Booking API");
}

#[tokio::test]
async fn health_reports_unreachable_database() {
    let (status, body) = send(get("/health")).await;
    assert_eq!(status, StatusCode::SERVICE_UNAVAILABLE);
    assert_eq!(body["status"], "degraded");
    assert_eq!(body["services"]["redis"]["status"], "disabled");
}

#[tokio::test]
async fn openapi_document_is_served() {
    let (status, body) = send(get("/api-docs/openapi.json")).await;
    assert_eq!(status, StatusCode::OK);
    assert!(body["paths"]["/hotels"].is_object());
    assert!(body["paths"]["/bookings/me"].is_object());
}

#[tokio::test]
async fn unreachable_database_maps_to_service_unavailable() {
    let (status, body) = send(get("/hotels?city=Paris")).await;
    assert_eq!(status, StatusCode::SERVICE_UNAVAILABLE);
    assert_eq!(body["error"]["code"], "SERVICE_UNAVAILABLE");
}

#[tokio::test]
async fn malformed_path_id_is_rejected_before_the_database() {
    let (status, body) = send(get("/hotels/1/rooms/abc")).await;
    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
    assert_eq!(body["error"]["code"], "VALIDATION_ERROR");
}

#[tokio::test]
async fn pagination_bounds_are_enforced() {
    let (status, _) = send(get("/countries?per_page=101")).await;
    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
}

#[tokio::test]
async fn short_password_is_rejected_on_register() {
    let body = json!({"email": "guest@example.com", "password": "short"});
    let (status, body) = send(post_json("/auth/register", body, None)).await;
    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
    assert_eq!(body["error"]["code"], "VALIDATION_ERROR");
}

#[tokio::test]
async fn users_require_a_token() {
    let (status, body) = send(get("/users")).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(body["error"]["code"], "UNAUTHORIZED");
}

#[tokio::test]
async fn forged_token_is_rejected() {
    let body = json!({"room_id": 1, "date_from": "2025-07-01", "date_to": "2025-07-05"});
    let (status, _) = send(post_json("/bookings", body, Some("not-a-jwt"))).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn valid_token_reaches_the_service() {
    let request = Request::builder()
        .uri("/bookings/me")
        .header(header::AUTHORIZATION, format!("Bearer {}", token_for(7)))
        .body(Body::empty())
        .unwrap();
    let (status, _) = send(request).await;
    // Past authentication, the disconnected pool answers
    assert_eq!(status, StatusCode::SERVICE_UNAVAILABLE);
}

#[tokio::test]
async fn every_response_carries_a_request_id() {
    let response = app().oneshot(get("/")).await.unwrap();
    assert!(response.headers().contains_key("x-request-id"));
}

// ---------------------------------------------------------------------------
// Domain and shared types
// ---------------------------------------------------------------------------

#[test]
fn stays_are_half_open() {
    assert_eq!(nights(day(1), day(5)).unwrap(), 4);
    assert!(nights(day(5), day(5)).is_err());
    assert!(nights(day(8), day(5)).is_err());
}

#[test]
fn price_is_nights_times_rate() {
    assert_eq!(total_price(5000, 4).unwrap(), 20000);
    assert!(total_price(i32::MAX, i64::MAX).is_err());
}

#[test]
fn error_statuses() {
    assert_eq!(AppError::Unauthorized.status(), StatusCode::UNAUTHORIZED);
    assert_eq!(AppError::Forbidden.status(), StatusCode::FORBIDDEN);
    assert_eq!(AppError::not_found("Hotel").status(), StatusCode::NOT_FOUND);
    assert_eq!(AppError::conflict("taken").status(), StatusCode::CONFLICT);
    assert_eq!(
        AppError::validation("bad").status(),
        StatusCode::UNPROCESSABLE_ENTITY
    );
    assert_eq!(AppError::bad_request("dates").status(), StatusCode::BAD_REQUEST);
    assert_eq!(
        AppError::internal("boom").status(),
        StatusCode::INTERNAL_SERVER_ERROR
    );
}

#[test]
fn password_hash_verifies_only_the_original() {
    let password = Password::new("correct horse").unwrap();
    assert!(password.verify("correct horse"));
    assert!(!password.verify("wrong horse"));
    assert!(Password::new("short").is_err());
}

#[test]
fn status_response_shape() {
    assert_eq!(
        serde_json::to_value(StatusResponse::ok()).unwrap(),
        json!({"status": "OK"})
    );
}

#[test]
fn pagination_offset() {
    assert_eq!(PaginationParams::new(3, 20).offset(), 40);
    assert_eq!(PaginationParams::default(), PaginationParams::new(1, 10));
}
