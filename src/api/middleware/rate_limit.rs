//! Rate limiting middleware using Redis cache.
//!
//! Fixed one-minute windows keyed by client address. A disabled cache
//! means no limit; a failing Redis lets the request through with a warning.

use axum::{
    extract::{ConnectInfo, Request, State},
    http::{HeaderMap, HeaderValue, StatusCode},
    middleware::Next,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use std::net::SocketAddr;

use crate::api::AppState;
use crate::config::{
    RATE_LIMIT_AUTH_REQUESTS, RATE_LIMIT_AUTH_WINDOW_SECONDS, RATE_LIMIT_REQUESTS,
    RATE_LIMIT_WINDOW_SECONDS,
};

const X_RATE_LIMIT_LIMIT: &str = "x-ratelimit-limit";
const X_RATE_LIMIT_REMAINING: &str = "x-ratelimit-remaining";

/// Rate limit error response
#[derive(Debug)]
pub struct RateLimitError {
    pub retry_after: u64,
}

impl IntoResponse for RateLimitError {
    fn into_response(self) -> Response {
        let mut headers = HeaderMap::new();
        headers.insert(
            axum::http::header::RETRY_AFTER,
            HeaderValue::from(self.retry_after),
        );
        headers.insert(X_RATE_LIMIT_REMAINING, HeaderValue::from_static("0"));

        let body = json!({
            "error": {
                "code": "RATE_LIMITED",
                "message": "Too many requests. Please try again later.",
            }
        });

        (StatusCode::TOO_MANY_REQUESTS, headers, Json(body)).into_response()
    }
}

/// Requests allowed per window for one bucket.
#[derive(Debug, Clone, Copy)]
struct Limit {
    bucket: &'static str,
    max_requests: u64,
    window_seconds: u64,
}

const GENERAL: Limit = Limit {
    bucket: "general",
    max_requests: RATE_LIMIT_REQUESTS,
    window_seconds: RATE_LIMIT_WINDOW_SECONDS,
};

const AUTH: Limit = Limit {
    bucket: "auth",
    max_requests: RATE_LIMIT_AUTH_REQUESTS,
    window_seconds: RATE_LIMIT_AUTH_WINDOW_SECONDS,
};

/// Extract client identifier for rate limiting.
/// Uses X-Forwarded-For header if behind proxy, otherwise uses connection IP.
pub(crate) fn client_identifier(request: &Request) -> String {
    // First address in the chain is the original client
    if let Some(ip) = request
        .headers()
        .get("X-Forwarded-For")
        .and_then(|h| h.to_str().ok())
        .and_then(|forwarded| forwarded.split(',').next())
        .map(str::trim)
        .filter(|ip| !ip.is_empty())
    {
        return ip.to_string();
    }

    if let Some(real_ip) = request
        .headers()
        .get("X-Real-IP")
        .and_then(|h| h.to_str().ok())
    {
        return real_ip.to_string();
    }

    if let Some(connect_info) = request.extensions().get::<ConnectInfo<SocketAddr>>() {
        return connect_info.0.ip().to_string();
    }

    "unknown".to_string()
}

async fn enforce(
    state: &AppState,
    limit: Limit,
    request: Request,
    next: Next,
) -> Result<Response, RateLimitError> {
    if !state.cache.is_enabled() {
        return Ok(next.run(request).await);
    }

    let client_id = client_identifier(&request);
    let key = format!("{}:{}", limit.bucket, client_id);

    let count = match state
        .cache
        .check_rate_limit(&key, limit.max_requests, limit.window_seconds)
        .await
    {
        Ok((count, true)) => count,
        Ok((count, false)) => {
            tracing::warn!(
                client = %client_id,
                bucket = limit.bucket,
                count = count,
                "Rate limit exceeded"
            );
            return Err(RateLimitError {
                retry_after: limit.window_seconds,
            });
        }
        Err(e) => {
            tracing::warn!(error = %e, bucket = limit.bucket, "Rate limit check failed, allowing request");
            return Ok(next.run(request).await);
        }
    };

    let mut response = next.run(request).await;

    let remaining = limit.max_requests.saturating_sub(count);
    let headers = response.headers_mut();
    headers.insert(X_RATE_LIMIT_LIMIT, HeaderValue::from(limit.max_requests));
    headers.insert(X_RATE_LIMIT_REMAINING, HeaderValue::from(remaining));

    Ok(response)
}

/// General rate limiting middleware.
/// Limits requests to RATE_LIMIT_REQUESTS per RATE_LIMIT_WINDOW_SECONDS.
pub async fn rate_limit_middleware(
    State(state): State<AppState>,
    request: Request,
    next: Next,
) -> Result<Response, RateLimitError> {
    enforce(&state, GENERAL, request, next).await
}

/// Stricter rate limiting for authentication endpoints.
/// Limits requests to RATE_LIMIT_AUTH_REQUESTS per RATE_LIMIT_AUTH_WINDOW_SECONDS.
pub async fn rate_limit_auth_middleware(
    State(state): State<AppState>,
    request: Request,
    next: Next,
) -> Result<Response, RateLimitError> {
    enforce(&state, AUTH, request, next).await
}
