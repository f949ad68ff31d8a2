//! Access log and request correlation ids.

use std::time::Instant;

use axum::{
    extract::{Request, State},
    http::{HeaderValue, Version},
    middleware::Next,
    response::Response,
};
use uuid::Uuid;

use super::rate_limit::client_identifier;
use crate::api::AppState;
use crate::config::REQUEST_ID_HEADER;

/// Logs `client - "METHOD /path?query HTTP/1.1" status` once the response is ready.
///
/// Every response carries `x-request-id`, echoed from the request when the
/// caller sent one.
pub async fn http_logging_middleware(
    State(state): State<AppState>,
    request: Request,
    next: Next,
) -> Response {
    let request_id = request
        .headers()
        .get(REQUEST_ID_HEADER)
        .cloned()
        .unwrap_or_else(new_request_id);

    if !state.request_logging {
        let mut response = next.run(request).await;
        response.headers_mut().insert(REQUEST_ID_HEADER, request_id);
        return response;
    }

    let client = client_identifier(&request);
    let line = request_line(&request);
    let started = Instant::now();

    let mut response = next.run(request).await;

    tracing::info!(
        request_id = request_id.to_str().unwrap_or_default(),
        latency_ms = started.elapsed().as_millis() as u64,
        "{} - \"{}\" {}",
        client,
        line,
        response.status().as_u16()
    );

    response.headers_mut().insert(REQUEST_ID_HEADER, request_id);
    response
}

fn new_request_id() -> HeaderValue {
    let id = Uuid::new_v4().to_string();
    // A hyphenated uuid is always a valid header value
    HeaderValue::from_str(&id).unwrap_or_else(|_| HeaderValue::from_static("unknown"))
}

/// `METHOD /path?query HTTP/x.y`
fn request_line(request: &Request) -> String {
    let target = request
        .uri()
        .path_and_query()
        .map_or_else(|| request.uri().path(), |pq| pq.as_str());

    format!(
        "{} {} {}",
        request.method(),
        target,
        http_version(request.version())
    )
}

fn http_version(version: Version) -> &'static str {
    match version {
        Version::HTTP_09 => "HTTP/0.9",
        Version::HTTP_10 => "HTTP/1.0",
        Version::HTTP_2 => "HTTP/2.0",
        Version::HTTP_3 => "HTTP/3.0",
        _ => "HTTP/1.1",
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::body::Body;

    #[test]
    fn request_line_keeps_the_query() {
        let request = Request::builder()
            .method("GET")
            .uri("/hotels?page=2&per_page=3")
            .body(Body::empty())
            .unwrap();
        assert_eq!(request_line(&request), "GET /hotels?page=2&per_page=3 HTTP/1.1");
    }

    #[test]
    fn generated_ids_are_uuids() {
        let id = new_request_id();
        assert!(Uuid::parse_str(id.to_str().unwrap()).is_ok());
    }
}
