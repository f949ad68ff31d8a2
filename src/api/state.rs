//! Application state - Dependency injection container.
//!
//! Provides centralized access to all application services and infrastructure.

use std::sync::Arc;

use crate::config::Config;
use crate::infra::{Cache, Database};
use crate::services::Services;

/// Application state shared by every handler and middleware.
#[derive(Clone)]
pub struct AppState {
    pub services: Services,
    /// Redis cache (possibly disabled)
    pub cache: Arc<Cache>,
    pub database: Arc<Database>,
    /// Whether each request gets an access-log line
    pub request_logging: bool,
}

impl AppState {
    /// Wire the services to `database` and keep handles to the infrastructure.
    pub fn from_config(database: Arc<Database>, cache: Arc<Cache>, config: Config) -> Self {
        let request_logging = config.request_logging();
        let services = Services::from_connection(database.get_connection(), config);

        Self {
            services,
            cache,
            database,
            request_logging,
        }
    }

    /// Create state with manually injected services.
    pub fn new(services: Services, cache: Arc<Cache>, database: Arc<Database>) -> Self {
        Self {
            services,
            cache,
            database,
            request_logging: false,
        }
    }
}

#[cfg(any(test, feature = "test-utils"))]
impl AppState {
    /// Mocked services, a disabled cache and a database that is never reached.
    pub fn for_tests(services: Services) -> Self {
        Self::new(
            services,
            Arc::new(Cache::disabled()),
            Arc::new(Database::from_connection(
                sea_orm::DatabaseConnection::Disconnected,
            )),
        )
    }
}
