//! Application route configuration.

use axum::{
    extract::State, http::StatusCode, middleware, response::Json, routing::get, Router,
};
use serde::Serialize;
use tower_http::trace::TraceLayer;
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

use super::handlers::{
    auth_routes, booking_routes, city_routes, country_routes, facility_routes, hotel_routes,
    image_routes, room_routes, user_routes,
};
use super::middleware::{
    auth_middleware, http_logging_middleware, rate_limit_auth_middleware, rate_limit_middleware,
    response_cache_middleware, CachePolicy,
};
use super::openapi::ApiDoc;
use super::AppState;

/// Create the application router with all routes configured
pub fn create_router(state: AppState) -> Router {
    let cached = |routes: Router<AppState>, policy: CachePolicy| {
        routes.route_layer(middleware::from_fn_with_state(
            (state.clone(), policy),
            response_cache_middleware,
        ))
    };

    // Resource groups share the general rate limit; /auth has its own, and
    // the banner, health check and docs have none
    let api = Router::new()
        .nest(
            "/users",
            user_routes().route_layer(middleware::from_fn_with_state(
                state.clone(),
                auth_middleware,
            )),
        )
        .nest("/countries", cached(country_routes(), CachePolicy::COUNTRIES))
        .nest("/cities", cached(city_routes(), CachePolicy::CITIES))
        .nest("/hotels", cached(hotel_routes(), CachePolicy::HOTELS))
        .nest(
            "/hotels/:hotel_id/rooms",
            cached(room_routes(), CachePolicy::ROOMS),
        )
        .nest(
            "/bookings",
            cached(booking_routes(state.clone()), CachePolicy::BOOKINGS),
        )
        .nest("/facilities", cached(facility_routes(), CachePolicy::FACILITIES))
        .nest("/images", cached(image_routes(), CachePolicy::IMAGES))
        .route_layer(middleware::from_fn_with_state(
            state.clone(),
            rate_limit_middleware,
        ));

    Router::new()
        // Health check endpoints (no rate limiting)
        .route("/", get(root))
        .route("/health", get(health))
        // OpenAPI Swagger UI documentation
        .merge(SwaggerUi::new("/swagger-ui").url("/api-docs/openapi.json", ApiDoc::openapi()))
        // Public authentication routes (stricter rate limiting)
        .nest(
            "/auth",
            auth_routes(state.clone()).route_layer(middleware::from_fn_with_state(
                state.clone(),
                rate_limit_auth_middleware,
            )),
        )
        .merge(api)
        // Global middleware
        .layer(middleware::from_fn_with_state(
            state.clone(),
            http_logging_middleware,
        ))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

/// Root endpoint
async fn root() -> &'static str {
    "Hotel Booking API"
}

/// Health check response
#[derive(Serialize)]
struct HealthResponse {
    status: &'static str,
    services: ServiceHealth,
}

/// Individual service health status
#[derive(Serialize)]
struct ServiceHealth {
    database: ServiceStatus,
    redis: ServiceStatus,
}

/// Service status
#[derive(Serialize)]
struct ServiceStatus {
    status: &'static str,
    #[serde(skip_serializing_if = "Option::is_none")]
    error: Option<String>,
}

impl ServiceStatus {
    fn from_result<E: std::fmt::Display>(result: Result<(), E>) -> Self {
        match result {
            Ok(()) => Self {
                status: "healthy",
                error: None,
            },
            Err(e) => Self {
                status: "unhealthy",
                error: Some(e.to_string()),
            },
        }
    }

    fn is_healthy(&self) -> bool {
        self.status != "unhealthy"
    }
}

/// Health check endpoint with database and Redis connectivity check
async fn health(State(state): State<AppState>) -> (StatusCode, Json<HealthResponse>) {
    let (db, redis) = tokio::join!(state.database.ping(), state.cache.ping());

    let database = ServiceStatus::from_result(db);
    let redis = if state.cache.is_enabled() {
        ServiceStatus::from_result(redis)
    } else {
        ServiceStatus {
            status: "disabled",
            error: None,
        }
    };

    let all_healthy = database.is_healthy() && redis.is_healthy();

    let response = HealthResponse {
        status: if all_healthy { "healthy" } else { "degraded" },
        services: ServiceHealth { database, redis },
    };

    let status_code = if all_healthy {
        StatusCode::OK
    } else {
        StatusCode::SERVICE_UNAVAILABLE
    };

    (status_code, Json(response))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;

    use axum::{
        body::{to_bytes, Body},
        http::{header, Request},
        Router,
    };
    use chrono::{NaiveDate, Utc};
    use serde_json::{json, Value};
    use tower::ServiceExt;

    use crate::config::REQUEST_ID_HEADER;
    use crate::domain::{Booking, Country};
    use crate::errors::AppError;
    use crate::services::{
        Claims, MockAuthService, MockBookingService, MockCountryService, MockHotelService,
        Services,
    };

    fn app(services: Services) -> Router {
        create_router(AppState::for_tests(services))
    }

    /// Auth mock accepting the token "guest-<id>".
    fn auth_accepting_guests() -> Arc<MockAuthService> {
        let mut auth = MockAuthService::new();
        auth.expect_verify_token().returning(|token| {
            let id = token
                .strip_prefix("guest-")
                .and_then(|id| id.parse::<i32>().ok())
                .ok_or(AppError::Unauthorized)?;
            Ok(Claims {
                sub: id,
                email: format!("guest{id}@example.com"),
                exp: i64::MAX,
                iat: 0,
            })
        });
        Arc::new(auth)
    }

    async fn send(app: Router, request: Request<Body>) -> (StatusCode, Value) {
        let response = app.oneshot(request).await.unwrap();
        let status = response.status();
        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        let body = serde_json::from_slice(&bytes).unwrap_or(Value::Null);
        (status, body)
    }

    fn get(uri: &str) -> Request<Body> {
        Request::builder().uri(uri).body(Body::empty()).unwrap()
    }

    fn json_request(method: &str, uri: &str, body: Value, token: Option<&str>) -> Request<Body> {
        let mut builder = Request::builder()
            .method(method)
            .uri(uri)
            .header(header::CONTENT_TYPE, "application/json");
        if let Some(token) = token {
            builder = builder.header(header::AUTHORIZATION, format!("Bearer {token}"));
        }
        builder.body(Body::from(body.to_string())).unwrap()
    }

    fn booking(id: i32, user_id: i32) -> Booking {
        Booking {
            id,
            room_id: 1,
            user_id,
            date_from: NaiveDate::from_ymd_opt(2025, 7, 1).unwrap(),
            date_to: NaiveDate::from_ymd_opt(2025, 7, 5).unwrap(),
            price: 20_000,
            created_at: Utc::now(),
        }
    }

    #[tokio::test]
    async fn root_answers_with_a_banner() {
        let response = app(Services::mocked()).oneshot(get("/")).await.unwrap();
        assert_eq!(response.status(), StatusCode::OK);
    }

    #[tokio::test]
    async fn non_numeric_id_is_unprocessable() {
        let (status, body) = send(app(Services::mocked()), get("/hotels/abc")).await;
        assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
        assert_eq!(body["error"]["code"], "VALIDATION_ERROR");
    }

    #[tokio::test]
    async fn page_zero_is_unprocessable() {
        let (status, _) = send(app(Services::mocked()), get("/hotels?page=0")).await;
        assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
    }

    #[tokio::test]
    async fn list_passes_pagination_and_filters_through() {
        let mut countries = MockCountryService::new();
        countries
            .expect_list()
            .withf(|filter, page| {
                filter.name.as_deref() == Some("rus") && page.page == 1 && page.per_page == 3
            })
            .returning(|_, _| {
                Ok(vec![Country {
                    id: 1,
                    name: "Russia".into(),
                    iso_code: "RU".into(),
                }])
            });
        let services = Services {
            countries: Arc::new(countries),
            ..Services::mocked()
        };

        let (status, body) = send(app(services), get("/countries?name=rus&page=1&per_page=3")).await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(body, json!([{ "id": 1, "name": "Russia", "iso_code": "RU" }]));
    }

    #[tokio::test]
    async fn missing_body_field_is_unprocessable() {
        let mut countries = MockCountryService::new();
        countries.expect_create().never();
        let services = Services {
            countries: Arc::new(countries),
            ..Services::mocked()
        };

        let request = json_request("POST", "/countries", json!({ "name": "Russia" }), None);
        let (status, _) = send(app(services), request).await;
        assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
    }

    #[tokio::test]
    async fn conflicts_use_the_error_envelope() {
        let mut countries = MockCountryService::new();
        countries
            .expect_create()
            .returning(|_| Err(AppError::conflict("Country with this name already exists")));
        let services = Services {
            countries: Arc::new(countries),
            ..Services::mocked()
        };

        let request = json_request(
            "POST",
            "/countries",
            json!({ "name": "russia", "iso_code": "ru" }),
            None,
        );
        let (status, body) = send(app(services), request).await;

        assert_eq!(status, StatusCode::CONFLICT);
        assert_eq!(
            body,
            json!({ "error": {
                "code": "CONFLICT",
                "message": "Country with this name already exists"
            }})
        );
    }

    #[tokio::test]
    async fn mutations_answer_with_status_ok() {
        let mut hotels = MockHotelService::new();
        hotels
            .expect_update()
            .withf(|id, patch| *id == 3 && patch.is_empty())
            .returning(|_, _| Err(AppError::not_found("Hotel")));
        hotels.expect_delete().withf(|id| *id == 4).returning(|_| Ok(()));
        let services = Services {
            hotels: Arc::new(hotels),
            ..Services::mocked()
        };
        let app = app(services);

        let (status, _) = send(app.clone(), json_request("PATCH", "/hotels/3", json!({}), None)).await;
        assert_eq!(status, StatusCode::NOT_FOUND);

        let request = Request::builder()
            .method("DELETE")
            .uri("/hotels/4")
            .body(Body::empty())
            .unwrap();
        let (status, body) = send(app, request).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body, json!({ "status": "OK" }));
    }

    #[tokio::test]
    async fn booking_requires_a_token() {
        let mut bookings = MockBookingService::new();
        bookings.expect_create().never();
        let services = Services {
            auth: auth_accepting_guests(),
            bookings: Arc::new(bookings),
            ..Services::mocked()
        };

        let request = json_request(
            "POST",
            "/bookings",
            json!({ "room_id": 1, "date_from": "2025-07-01", "date_to": "2025-07-05" }),
            None,
        );
        let (status, body) = send(app(services), request).await;

        assert_eq!(status, StatusCode::UNAUTHORIZED);
        assert_eq!(body["error"]["code"], "UNAUTHORIZED");
    }

    #[tokio::test]
    async fn booking_is_made_for_the_token_holder() {
        let mut bookings = MockBookingService::new();
        bookings
            .expect_create()
            .withf(|user_id, input| *user_id == 7 && input.room_id == 1)
            .returning(|user_id, _| Ok(booking(10, user_id)));
        let services = Services {
            auth: auth_accepting_guests(),
            bookings: Arc::new(bookings),
            ..Services::mocked()
        };

        let request = json_request(
            "POST",
            "/bookings",
            json!({ "room_id": 1, "date_from": "2025-07-01", "date_to": "2025-07-05" }),
            Some("guest-7"),
        );
        let (status, body) = send(app(services), request).await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(body, json!({ "status": "OK" }));
    }

    #[tokio::test]
    async fn booking_reads_are_public() {
        let mut bookings = MockBookingService::new();
        bookings.expect_get().returning(|id| Ok(booking(id, 2)));
        let services = Services {
            bookings: Arc::new(bookings),
            ..Services::mocked()
        };

        let (status, body) = send(app(services), get("/bookings/5")).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["id"], 5);
        assert_eq!(body["price"], 20_000);
    }

    #[tokio::test]
    async fn own_bookings_use_the_token_holder() {
        let mut bookings = MockBookingService::new();
        bookings
            .expect_list_for_user()
            .withf(|user_id, _| *user_id == 3)
            .returning(|user_id, _| Ok(vec![booking(1, user_id)]));
        let services = Services {
            auth: auth_accepting_guests(),
            bookings: Arc::new(bookings),
            ..Services::mocked()
        };

        let request = Request::builder()
            .uri("/bookings/me")
            .header(header::AUTHORIZATION, "Bearer guest-3")
            .body(Body::empty())
            .unwrap();
        let (status, body) = send(app(services), request).await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(body[0]["user_id"], 3);
    }

    #[tokio::test]
    async fn cancelling_someone_elses_booking_is_forbidden() {
        let mut bookings = MockBookingService::new();
        bookings
            .expect_delete()
            .withf(|user_id, id| *user_id == 7 && *id == 5)
            .returning(|_, _| Err(AppError::Forbidden));
        let services = Services {
            auth: auth_accepting_guests(),
            bookings: Arc::new(bookings),
            ..Services::mocked()
        };

        let request = Request::builder()
            .method("DELETE")
            .uri("/bookings/5")
            .header(header::AUTHORIZATION, "Bearer guest-7")
            .body(Body::empty())
            .unwrap();
        let (status, _) = send(app(services), request).await;
        assert_eq!(status, StatusCode::FORBIDDEN);
    }

    #[tokio::test]
    async fn request_id_is_echoed() {
        let request = Request::builder()
            .uri("/")
            .header(REQUEST_ID_HEADER, "req-123")
            .body(Body::empty())
            .unwrap();
        let response = app(Services::mocked()).oneshot(request).await.unwrap();
        assert_eq!(response.headers()[REQUEST_ID_HEADER], "req-123");
    }
}
