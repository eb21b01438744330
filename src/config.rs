//! Runtime configuration.
//!
//! Settings come from an optional JSON file and are then overridden by
//! `TASKFLOW_*` environment variables.

use crate::tracker::adapters::postgres::TrackerPgPool;
use diesel::pg::PgConnection;
use diesel::r2d2::{ConnectionManager, Pool, PoolError};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::time::Duration;
use thiserror::Error;

/// Environment variable overriding [`TaskflowConfig::database_url`].
pub const DATABASE_URL_ENV: &str = "TASKFLOW_DATABASE_URL";
/// Environment variable overriding [`TaskflowConfig::pool_max_size`].
pub const POOL_MAX_SIZE_ENV: &str = "TASKFLOW_POOL_MAX_SIZE";
/// Environment variable overriding [`TaskflowConfig::connection_timeout_secs`].
pub const CONNECTION_TIMEOUT_ENV: &str = "TASKFLOW_CONNECTION_TIMEOUT_SECS";

/// Errors raised while loading configuration or building the pool.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// The configuration file could not be read.
    #[error("failed to read config file {path}: {source}")]
    Read {
        /// File that was requested.
        path: PathBuf,
        /// Underlying I/O failure.
        source: std::io::Error,
    },

    /// The configuration file is not valid JSON for [`TaskflowConfig`].
    #[error("failed to parse config file {path}: {source}")]
    Parse {
        /// File that was parsed.
        path: PathBuf,
        /// Underlying parse failure.
        source: serde_json::Error,
    },

    /// A setting has an unusable value.
    #[error("invalid value for {key}: '{value}'")]
    InvalidValue {
        /// Setting name.
        key: &'static str,
        /// Rejected value.
        value: String,
    },

    /// No database URL was configured.
    #[error("no database URL configured; set TASKFLOW_DATABASE_URL")]
    MissingDatabaseUrl,

    /// The connection pool could not be created.
    #[error("failed to build connection pool: {0}")]
    Pool(#[from] PoolError),
}

/// Tracker runtime settings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TaskflowConfig {
    /// `PostgreSQL` connection URL.
    #[serde(default)]
    pub database_url: Option<String>,

    /// Maximum number of pooled connections.
    #[serde(default = "default_pool_max_size")]
    pub pool_max_size: u32,

    /// Seconds to wait for a pooled connection.
    #[serde(default = "default_connection_timeout_secs")]
    pub connection_timeout_secs: u64,
}

const fn default_pool_max_size() -> u32 {
    8
}

const fn default_connection_timeout_secs() -> u64 {
    30
}

impl Default for TaskflowConfig {
    fn default() -> Self {
        Self {
            database_url: None,
            pool_max_size: default_pool_max_size(),
            connection_timeout_secs: default_connection_timeout_secs(),
        }
    }
}

impl TaskflowConfig {
    /// Loads settings from `path` (when given) and the process environment.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError`] when the file cannot be read or parsed, or an
    /// override has an invalid value.
    pub fn load(path: Option<&Path>) -> Result<Self, ConfigError> {
        let base = match path {
            Some(file) => Self::from_file(file)?,
            None => Self::default(),
        };
        base.with_overrides(|key| std::env::var(key).ok())
    }

    /// Reads settings from a JSON file. Missing keys take their defaults.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Read`] or [`ConfigError::Parse`].
    pub fn from_file(path: &Path) -> Result<Self, ConfigError> {
        let raw = std::fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        serde_json::from_str(&raw).map_err(|source| ConfigError::Parse {
            path: path.to_path_buf(),
            source,
        })
    }

    /// Applies overrides resolved through `lookup`, which maps an
    /// environment variable name to its value. Blank values are ignored.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::InvalidValue`] when a numeric override does
    /// not parse or is zero.
    pub fn with_overrides(
        mut self,
        lookup: impl Fn(&str) -> Option<String>,
    ) -> Result<Self, ConfigError> {
        let read = |key: &str| {
            lookup(key)
                .map(|value| value.trim().to_owned())
                .filter(|value| !value.is_empty())
        };
        if let Some(url) = read(DATABASE_URL_ENV) {
            self.database_url = Some(url);
        }
        if let Some(raw) = read(POOL_MAX_SIZE_ENV) {
            self.pool_max_size = parse_positive(POOL_MAX_SIZE_ENV, raw)?;
        }
        if let Some(raw) = read(CONNECTION_TIMEOUT_ENV) {
            self.connection_timeout_secs = parse_positive(CONNECTION_TIMEOUT_ENV, raw)?;
        }
        Ok(self)
    }

    /// Builds the connection pool used by the `PostgreSQL` store.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::MissingDatabaseUrl`] when no URL is set,
    /// [`ConfigError::InvalidValue`] for a zero pool size and
    /// [`ConfigError::Pool`] when the pool cannot connect.
    pub fn build_pool(&self) -> Result<TrackerPgPool, ConfigError> {
        let url = self
            .database_url
            .as_deref()
            .ok_or(ConfigError::MissingDatabaseUrl)?;
        if self.pool_max_size == 0 {
            return Err(ConfigError::InvalidValue {
                key: "pool_max_size",
                value: self.pool_max_size.to_string(),
            });
        }
        let manager = ConnectionManager::<PgConnection>::new(url);
        let pool = Pool::builder()
            .max_size(self.pool_max_size)
            .connection_timeout(Duration::from_secs(self.connection_timeout_secs))
            .build(manager)?;
        tracing::debug!(max_size = self.pool_max_size, "connection pool ready");
        Ok(pool)
    }
}

fn parse_positive<T>(key: &'static str, raw: String) -> Result<T, ConfigError>
where
    T: std::str::FromStr + PartialEq + Default,
{
    match raw.parse::<T>() {
        Ok(value) if value != T::default() => Ok(value),
        _ => Err(ConfigError::InvalidValue { key, value: raw }),
    }
}
