//! Redis-backed cache of catalog GET responses.
//!
//! Each route group caches under its own namespace. Successful writes to a
//! group drop every cached page of the namespaces that embed its data.
//! Redis failures are logged and the request runs uncached.

use axum::{
    body::{to_bytes, Body},
    extract::{OriginalUri, Request, State},
    http::{header::CONTENT_TYPE, HeaderValue, Method, StatusCode},
    middleware::Next,
    response::{IntoResponse, Response},
};
use serde::{Deserialize, Serialize};

use crate::api::AppState;
use crate::config::{
    CACHE_NS_CITIES, CACHE_NS_COUNTRIES, CACHE_NS_FACILITIES, CACHE_NS_HOTELS, CACHE_NS_IMAGES,
    CACHE_NS_ROOMS, CACHE_PREFIX_RESPONSE,
};
use crate::errors::AppError;

/// Where a route group caches its reads and which namespaces its writes stale.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CachePolicy {
    /// `None` for groups whose reads are never cached
    pub namespace: Option<&'static str>,
    pub invalidates: &'static [&'static str],
}

impl CachePolicy {
    pub const HOTELS: Self = Self {
        namespace: Some(CACHE_NS_HOTELS),
        // Deleting a hotel takes its rooms and images with it
        invalidates: &[CACHE_NS_HOTELS, CACHE_NS_ROOMS, CACHE_NS_IMAGES],
    };
    pub const ROOMS: Self = Self {
        namespace: Some(CACHE_NS_ROOMS),
        invalidates: &[CACHE_NS_ROOMS],
    };
    pub const CITIES: Self = Self {
        namespace: Some(CACHE_NS_CITIES),
        invalidates: &[CACHE_NS_CITIES, CACHE_NS_HOTELS],
    };
    pub const COUNTRIES: Self = Self {
        namespace: Some(CACHE_NS_COUNTRIES),
        invalidates: &[CACHE_NS_COUNTRIES, CACHE_NS_CITIES, CACHE_NS_HOTELS],
    };
    pub const FACILITIES: Self = Self {
        namespace: Some(CACHE_NS_FACILITIES),
        invalidates: &[CACHE_NS_FACILITIES, CACHE_NS_ROOMS, CACHE_NS_HOTELS],
    };
    pub const IMAGES: Self = Self {
        namespace: Some(CACHE_NS_IMAGES),
        invalidates: &[CACHE_NS_IMAGES],
    };
    /// Bookings change room availability
    pub const BOOKINGS: Self = Self {
        namespace: None,
        invalidates: &[CACHE_NS_ROOMS],
    };

    /// Keyed on the full request target; nested routers only see the
    /// stripped path, which would merge `/hotels/1/rooms` and `/hotels/2/rooms`.
    fn key(&self, namespace: &str, request: &Request) -> String {
        let uri = request
            .extensions()
            .get::<OriginalUri>()
            .map_or_else(|| request.uri(), |original| &original.0);
        let target = uri.path_and_query().map_or_else(|| uri.path(), |pq| pq.as_str());
        format!("{}{}:{}", CACHE_PREFIX_RESPONSE, namespace, target)
    }
}

/// A cached 200 response.
#[derive(Debug, Serialize, Deserialize)]
struct CachedResponse {
    content_type: Option<String>,
    body: String,
}

impl IntoResponse for CachedResponse {
    fn into_response(self) -> Response {
        let mut response = (StatusCode::OK, self.body).into_response();
        match self.content_type.as_deref().map(HeaderValue::from_str) {
            Some(Ok(content_type)) => {
                response.headers_mut().insert(CONTENT_TYPE, content_type);
            }
            _ => {
                response.headers_mut().remove(CONTENT_TYPE);
            }
        }
        response
    }
}

pub async fn response_cache_middleware(
    State((state, policy)): State<(AppState, CachePolicy)>,
    request: Request,
    next: Next,
) -> Response {
    if !state.cache.is_enabled() {
        return next.run(request).await;
    }

    match *request.method() {
        Method::GET => match policy.namespace {
            Some(namespace) => cached_read(&state, policy.key(namespace, &request), request, next).await,
            None => next.run(request).await,
        },
        Method::POST | Method::PUT | Method::PATCH | Method::DELETE => {
            let response = next.run(request).await;
            if response.status().is_success() {
                invalidate(&state, policy.invalidates).await;
            }
            response
        }
        _ => next.run(request).await,
    }
}

async fn cached_read(state: &AppState, key: String, request: Request, next: Next) -> Response {
    match state.cache.get::<CachedResponse>(&key).await {
        Ok(Some(cached)) => {
            tracing::debug!(key = %key, "Response cache hit");
            return cached.into_response();
        }
        Ok(None) => {}
        Err(e) => tracing::warn!(key = %key, error = %e, "Response cache read failed"),
    }

    let response = next.run(request).await;
    if response.status() != StatusCode::OK {
        return response;
    }

    let (parts, body) = response.into_parts();
    let bytes = match to_bytes(body, usize::MAX).await {
        Ok(bytes) => bytes,
        Err(e) => return AppError::internal(format!("Failed to buffer response: {}", e)).into_response(),
    };

    if let Ok(text) = std::str::from_utf8(&bytes) {
        let cached = CachedResponse {
            content_type: parts
                .headers
                .get(CONTENT_TYPE)
                .and_then(|v| v.to_str().ok())
                .map(str::to_string),
            body: text.to_string(),
        };
        if let Err(e) = state.cache.set(&key, &cached).await {
            tracing::warn!(key = %key, error = %e, "Response cache write failed");
        }
    }

    Response::from_parts(parts, Body::from(bytes))
}

async fn invalidate(state: &AppState, namespaces: &[&str]) {
    for namespace in namespaces {
        let pattern = format!("{}{}:*", CACHE_PREFIX_RESPONSE, namespace);
        match state.cache.delete_pattern(&pattern).await {
            Ok(removed) => tracing::debug!(namespace, removed, "Response cache invalidated"),
            Err(e) => tracing::warn!(namespace, error = %e, "Response cache invalidation failed"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::{middleware, routing::get, Router};
    use tower::ServiceExt;

    #[test]
    fn key_includes_namespace_path_and_query() {
        let request = Request::builder()
            .uri("/hotels?title=grand&page=2")
            .body(Body::empty())
            .unwrap();
        assert_eq!(
            CachePolicy::HOTELS.key(CACHE_NS_HOTELS, &request),
            "cache:hotels:/hotels?title=grand&page=2"
        );
    }

    #[test]
    fn catalog_writes_stale_the_groups_that_embed_them() {
        assert!(CachePolicy::COUNTRIES.invalidates.contains(&CACHE_NS_HOTELS));
        assert!(CachePolicy::COUNTRIES.invalidates.contains(&CACHE_NS_CITIES));
        assert!(CachePolicy::CITIES.invalidates.contains(&CACHE_NS_HOTELS));
        assert!(CachePolicy::FACILITIES.invalidates.contains(&CACHE_NS_ROOMS));
        assert!(CachePolicy::HOTELS.invalidates.contains(&CACHE_NS_ROOMS));
        assert!(CachePolicy::HOTELS.invalidates.contains(&CACHE_NS_IMAGES));
        assert_eq!(CachePolicy::BOOKINGS.invalidates, &[CACHE_NS_ROOMS]);
        assert_eq!(CachePolicy::BOOKINGS.namespace, None);
    }

    async fn echo_room_key(request: Request, _next: Next) -> Response {
        CachePolicy::ROOMS
            .key(CACHE_NS_ROOMS, &request)
            .into_response()
    }

    async fn key_for(app: &Router, uri: &str) -> String {
        let request = Request::builder().uri(uri).body(Body::empty()).unwrap();
        let response = app.clone().oneshot(request).await.unwrap();
        let body = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        String::from_utf8(body.to_vec()).unwrap()
    }

    #[tokio::test]
    async fn nested_room_keys_keep_the_hotel() {
        // Same layering as the room routes in `create_router`
        let rooms = Router::new()
            .route("/", get(|| async {}))
            .route("/:id", get(|| async {}))
            .route_layer(middleware::from_fn(echo_room_key));
        let app = Router::new().nest("/hotels/:hotel_id/rooms", rooms);

        assert_eq!(
            key_for(&app, "/hotels/1/rooms?page=1").await,
            "cache:rooms:/hotels/1/rooms?page=1"
        );
        assert_eq!(
            key_for(&app, "/hotels/2/rooms?page=1").await,
            "cache:rooms:/hotels/2/rooms?page=1"
        );
        assert_eq!(key_for(&app, "/hotels/2/rooms/3").await, "cache:rooms:/hotels/2/rooms/3");
    }

    #[tokio::test]
    async fn cached_body_replays_with_its_content_type() {
        let response = CachedResponse {
            content_type: Some("application/json".into()),
            body: "[]".into(),
        }
        .into_response();

        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(response.headers()[CONTENT_TYPE], "application/json");
        let body = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        assert_eq!(&body[..], b"[]");
    }
}
