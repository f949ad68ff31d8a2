//! Application settings loaded from environment variables.

use std::{env, str::FromStr};

use thiserror::Error;

use super::constants::{
    DEFAULT_CACHE_TTL_SECONDS, DEFAULT_DATABASE_URL, DEFAULT_JWT_EXPIRATION_HOURS,
    DEFAULT_LOG_DIR, DEFAULT_LOG_LEVEL, DEFAULT_REDIS_URL, DEFAULT_SERVER_HOST,
    DEFAULT_SERVER_PORT, LOG_FILE_NAME, MIN_JWT_SECRET_LENGTH, TEST_LOG_FILE_NAME,
};

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("JWT_SECRET environment variable must be set in production")]
    MissingJwtSecret,

    #[error("JWT_SECRET must be at least {0} characters long")]
    WeakJwtSecret(usize),

    #[error("{name} has an invalid value: {value}")]
    Invalid { name: &'static str, value: String },
}

/// Deployment mode, read from `APP_MODE`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum AppMode {
    #[default]
    Local,
    Test,
    Prod,
}

impl FromStr for AppMode {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "local" | "dev" => Ok(AppMode::Local),
            "test" => Ok(AppMode::Test),
            "prod" | "production" => Ok(AppMode::Prod),
            _ => Err(ConfigError::Invalid {
                name: "APP_MODE",
                value: s.to_string(),
            }),
        }
    }
}

/// Logging settings.
///
/// Split from [`Config`] so tracing can be initialized before the rest of
/// the configuration is validated.
#[derive(Debug, Clone)]
pub struct LogSettings {
    pub level: String,
    pub dir: String,
    pub mode: AppMode,
}

impl LogSettings {
    pub fn from_env() -> Self {
        Self {
            level: env::var("LOG_LEVEL").unwrap_or_else(|_| DEFAULT_LOG_LEVEL.to_string()),
            dir: env::var("LOG_DIR").unwrap_or_else(|_| DEFAULT_LOG_DIR.to_string()),
            mode: env::var("APP_MODE")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or_default(),
        }
    }

    /// Log file name; test runs write to their own file.
    pub fn file_name(&self) -> &'static str {
        match self.mode {
            AppMode::Test => TEST_LOG_FILE_NAME,
            _ => LOG_FILE_NAME,
        }
    }
}

/// Application configuration
#[derive(Clone)]
pub struct Config {
    pub database_url: String,
    pub redis_url: String,
    pub jwt_secret: String,
    pub jwt_expiration_hours: i64,
    pub server_host: String,
    pub server_port: u16,
    pub mode: AppMode,
    pub cache_enabled: bool,
    pub cache_ttl_seconds: u64,
    pub auto_migrate: bool,
}

impl std::fmt::Debug for Config {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Config")
            .field("database_url", &"[REDACTED]")
            .field("redis_url", &"[REDACTED]")
            .field("jwt_secret", &"[REDACTED]")
            .field("jwt_expiration_hours", &self.jwt_expiration_hours)
            .field("server_host", &self.server_host)
            .field("server_port", &self.server_port)
            .field("mode", &self.mode)
            .field("cache_enabled", &self.cache_enabled)
            .field("cache_ttl_seconds", &self.cache_ttl_seconds)
            .field("auto_migrate", &self.auto_migrate)
            .finish()
    }
}

impl Config {
    /// Load configuration from environment variables.
    ///
    /// Call `dotenvy::dotenv()` first if a `.env` file should be honoured.
    pub fn from_env() -> Result<Self, ConfigError> {
        let jwt_secret = match env::var("JWT_SECRET") {
            Ok(secret) => secret,
            Err(_) if cfg!(debug_assertions) => {
                tracing::warn!("JWT_SECRET not set, using insecure default for development");
                "dev-secret-key-minimum-32-chars!!".to_string()
            }
            Err(_) => return Err(ConfigError::MissingJwtSecret),
        };

        if jwt_secret.len() < MIN_JWT_SECRET_LENGTH {
            return Err(ConfigError::WeakJwtSecret(MIN_JWT_SECRET_LENGTH));
        }

        let mode = match env::var("APP_MODE") {
            Ok(v) => v.parse()?,
            Err(_) => AppMode::default(),
        };

        Ok(Self {
            database_url: env::var("DATABASE_URL")
                .unwrap_or_else(|_| DEFAULT_DATABASE_URL.to_string()),
            redis_url: env::var("REDIS_URL").unwrap_or_else(|_| DEFAULT_REDIS_URL.to_string()),
            jwt_secret,
            jwt_expiration_hours: parse_var("JWT_EXPIRATION_HOURS", DEFAULT_JWT_EXPIRATION_HOURS)?,
            server_host: env::var("SERVER_HOST")
                .unwrap_or_else(|_| DEFAULT_SERVER_HOST.to_string()),
            server_port: parse_var("SERVER_PORT", DEFAULT_SERVER_PORT)?,
            mode,
            // The response cache stays off in tests so assertions see fresh data
            cache_enabled: parse_var("CACHE_ENABLED", mode != AppMode::Test)?,
            cache_ttl_seconds: parse_var("CACHE_TTL_SECONDS", DEFAULT_CACHE_TTL_SECONDS)?,
            auto_migrate: parse_var("AUTO_MIGRATE", true)?,
        })
    }

    /// Get JWT secret bytes for token signing/verification.
    pub fn jwt_secret_bytes(&self) -> &[u8] {
        self.jwt_secret.as_bytes()
    }

    /// Get the full server address.
    pub fn server_addr(&self) -> String {
        format!("{}:{}", self.server_host, self.server_port)
    }

    /// Whether each request gets an access-log line.
    pub fn request_logging(&self) -> bool {
        self.mode != AppMode::Test
    }

    /// Test-mode configuration that touches no environment variables.
    #[cfg(any(test, feature = "test-utils"))]
    pub fn for_tests() -> Self {
        Self {
            database_url: DEFAULT_DATABASE_URL.to_string(),
            redis_url: DEFAULT_REDIS_URL.to_string(),
            jwt_secret: "test-secret-key-with-at-least-32-chars".to_string(),
            jwt_expiration_hours: DEFAULT_JWT_EXPIRATION_HOURS,
            server_host: DEFAULT_SERVER_HOST.to_string(),
            server_port: DEFAULT_SERVER_PORT,
            mode: AppMode::Test,
            cache_enabled: false,
            cache_ttl_seconds: DEFAULT_CACHE_TTL_SECONDS,
            auto_migrate: false,
        }
    }
}

fn parse_var<T: FromStr>(name: &'static str, default: T) -> Result<T, ConfigError> {
    match env::var(name) {
        Ok(value) => value
            .parse()
            .map_err(|_| ConfigError::Invalid { name, value }),
        Err(_) => Ok(default),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn app_mode_parses_case_insensitively() {
        assert_eq!("TEST".parse::<AppMode>().unwrap(), AppMode::Test);
        assert_eq!("production".parse::<AppMode>().unwrap(), AppMode::Prod);
        assert_eq!("local".parse::<AppMode>().unwrap(), AppMode::Local);
        assert!("staging".parse::<AppMode>().is_err());
    }

    #[test]
    fn test_mode_logs_to_its_own_file() {
        let settings = LogSettings {
            level: "info".into(),
            dir: "logs".into(),
            mode: AppMode::Test,
        };
        assert_eq!(settings.file_name(), TEST_LOG_FILE_NAME);

        let settings = LogSettings {
            mode: AppMode::Prod,
            ..settings
        };
        assert_eq!(settings.file_name(), LOG_FILE_NAME);
    }
}
