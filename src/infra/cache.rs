//! Redis cache implementation.
//!
//! Backs the HTTP response cache and the rate limiter. A cache built with
//! [`Cache::disabled`] turns every operation into a no-op, which is what
//! test mode and deployments without Redis run with.

use redis::{aio::ConnectionManager, AsyncCommands, Client, RedisError};
use serde::{de::DeserializeOwned, Serialize};

use crate::config::{Config, CACHE_PREFIX_RATE_LIMIT};
use crate::errors::{AppError, AppResult};

/// Redis cache wrapper with connection pooling.
#[derive(Clone)]
pub struct Cache {
    connection: Option<ConnectionManager>,
    default_ttl: u64,
}

impl Cache {
    /// Connect to Redis.
    pub async fn connect(config: &Config) -> Result<Self, RedisError> {
        let client = Client::open(config.redis_url.as_str())?;
        let connection = ConnectionManager::new(client).await?;

        tracing::info!("Redis cache connected");

        Ok(Self {
            connection: Some(connection),
            default_ttl: config.cache_ttl_seconds,
        })
    }

    /// A cache that stores nothing and never fails.
    pub fn disabled() -> Self {
        Self {
            connection: None,
            default_ttl: 0,
        }
    }

    pub fn is_enabled(&self) -> bool {
        self.connection.is_some()
    }

    /// TTL applied by [`Cache::set`].
    pub fn default_ttl(&self) -> u64 {
        self.default_ttl
    }

    /// Round-trip to Redis; `Ok` when disabled.
    pub async fn ping(&self) -> AppResult<()> {
        let Some(mut conn) = self.connection.clone() else {
            return Ok(());
        };
        let _: String = redis::cmd("PING")
            .query_async(&mut conn)
            .await
            .map_err(cache_error)?;
        Ok(())
    }

    // =========================================================================
    // Generic Cache Operations
    // =========================================================================

    /// Get a value from cache.
    pub async fn get<T: DeserializeOwned>(&self, key: &str) -> AppResult<Option<T>> {
        let Some(mut conn) = self.connection.clone() else {
            return Ok(None);
        };
        let value: Option<String> = conn.get(key).await.map_err(cache_error)?;

        match value {
            Some(json) => {
                let parsed = serde_json::from_str(&json).map_err(|e| {
                    AppError::internal(format!("Cache deserialization error: {}", e))
                })?;
                Ok(Some(parsed))
            }
            None => Ok(None),
        }
    }

    /// Set a value in cache with default TTL.
    pub async fn set<T: Serialize + Sync>(&self, key: &str, value: &T) -> AppResult<()> {
        self.set_with_ttl(key, value, self.default_ttl).await
    }

    /// Set a value in cache with custom TTL (in seconds).
    pub async fn set_with_ttl<T: Serialize + Sync>(
        &self,
        key: &str,
        value: &T,
        ttl_seconds: u64,
    ) -> AppResult<()> {
        let Some(mut conn) = self.connection.clone() else {
            return Ok(());
        };
        let json = serde_json::to_string(value)
            .map_err(|e| AppError::internal(format!("Cache serialization error: {}", e)))?;

        conn.set_ex::<_, _, ()>(key, json, ttl_seconds)
            .await
            .map_err(cache_error)?;

        Ok(())
    }

    /// Delete all keys matching a glob pattern, returning how many matched.
    pub async fn delete_pattern(&self, pattern: &str) -> AppResult<u64> {
        let Some(mut conn) = self.connection.clone() else {
            return Ok(0);
        };

        let keys: Vec<String> = conn.keys(pattern).await.map_err(cache_error)?;
        if keys.is_empty() {
            return Ok(0);
        }

        // UNLINK frees memory off the main Redis thread
        let _: i64 = redis::cmd("UNLINK")
            .arg(&keys)
            .query_async(&mut conn)
            .await
            .map_err(cache_error)?;

        Ok(keys.len() as u64)
    }

    // =========================================================================
    // Rate Limiting Operations
    // =========================================================================

    /// Count one request against `identifier`'s fixed window.
    /// Returns (current_count, is_allowed); always allowed when disabled.
    pub async fn check_rate_limit(
        &self,
        identifier: &str,
        max_requests: u64,
        window_seconds: u64,
    ) -> AppResult<(u64, bool)> {
        let Some(mut conn) = self.connection.clone() else {
            return Ok((0, true));
        };
        let key = format!("{}{}", CACHE_PREFIX_RATE_LIMIT, identifier);

        let count: i64 = conn.incr(&key, 1).await.map_err(cache_error)?;
        if count == 1 {
            // First request opens the window
            let _: () = conn
                .expire(&key, window_seconds as i64)
                .await
                .map_err(cache_error)?;
        }

        let count = count.max(0) as u64;
        Ok((count, count <= max_requests))
    }
}

/// Convert Redis error to AppError.
fn cache_error(e: RedisError) -> AppError {
    tracing::error!("Redis error: {}", e);
    AppError::internal(format!("Cache error: {}", e))
}
