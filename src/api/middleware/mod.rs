//! API middleware.

mod auth;
mod http_logging;
mod rate_limit;
mod response_cache;

pub use auth::{auth_middleware, CurrentUser};
pub use http_logging::http_logging_middleware;
pub use rate_limit::{rate_limit_auth_middleware, rate_limit_middleware, RateLimitError};
pub use response_cache::{response_cache_middleware, CachePolicy};
