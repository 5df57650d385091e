//! Configuration loading and representation.
//!
//! Everything is read from environment variables. [`AppConfig::from_lookup`]
//! takes any key → value function so tests never touch the real environment.

use core::str::FromStr;

use banking_observability::{LogFormat, TracingConfig};
use thiserror::Error;

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ConfigError {
    #[error("invalid value `{value}` for {key}: {reason}")]
    Invalid {
        key: &'static str,
        value: String,
        reason: String,
    },
}

impl ConfigError {
    fn invalid(key: &'static str, value: &str, reason: impl Into<String>) -> Self {
        Self::Invalid {
            key,
            value: value.to_string(),
            reason: reason.into(),
        }
    }
}

/// Run mode, mirroring the debug/release switch of the HTTP layer.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Default)]
pub enum RunMode {
    #[default]
    Debug,
    Release,
}

impl RunMode {
    pub fn default_log_level(self) -> &'static str {
        match self {
            RunMode::Debug => "debug",
            RunMode::Release => "info",
        }
    }
}

impl FromStr for RunMode {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "debug" => Ok(RunMode::Debug),
            "release" => Ok(RunMode::Release),
            _ => Err("expected `debug` or `release`".to_string()),
        }
    }
}

/// Which persistence backend the services are wired to.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Default)]
pub enum StoreBackend {
    #[default]
    InMemory,
    Postgres,
}

impl FromStr for StoreBackend {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "memory" | "in-memory" | "in_memory" => Ok(StoreBackend::InMemory),
            "postgres" | "postgresql" => Ok(StoreBackend::Postgres),
            _ => Err("expected `memory` or `postgres`".to_string()),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
    pub mode: RunMode,
}

impl ServerConfig {
    pub fn bind_addr(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

#[derive(Clone, PartialEq, Eq)]
pub struct DatabaseConfig {
    /// Full URL; when set it wins over the individual parts.
    pub url: Option<String>,
    pub host: String,
    pub port: u16,
    pub user: String,
    pub password: String,
    pub name: String,
    pub max_connections: u32,
}

impl core::fmt::Debug for DatabaseConfig {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("DatabaseConfig")
            .field("url", &self.url.as_ref().map(|_| "<redacted>"))
            .field("host", &self.host)
            .field("port", &self.port)
            .field("user", &self.user)
            .field("password", &"<redacted>")
            .field("name", &self.name)
            .field("max_connections", &self.max_connections)
            .finish()
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AppConfig {
    pub server: ServerConfig,
    pub store: StoreBackend,
    pub database: DatabaseConfig,
    pub tracing: TracingConfig,
}

impl AppConfig {
    /// Load from the process environment.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Load from an arbitrary key → value source.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());

        let mode = parse_or(&get, "BANKING_MODE", RunMode::default())?;
        let server = ServerConfig {
            host: get("BANKING_HOST").unwrap_or_else(|| "0.0.0.0".to_string()),
            port: parse_or(&get, "BANKING_PORT", 8080)?,
            mode,
        };

        let store = parse_or(&get, "BANKING_STORE", StoreBackend::default())?;

        let max_connections: u32 = parse_or(&get, "BANKING_DB_MAX_CONNECTIONS", 5)?;
        if max_connections == 0 {
            return Err(ConfigError::invalid("BANKING_DB_MAX_CONNECTIONS", "0", "must be at least 1"));
        }
        let database = DatabaseConfig {
            url: get("DATABASE_URL"),
            host: get("BANKING_DB_HOST").unwrap_or_else(|| "localhost".to_string()),
            port: parse_or(&get, "BANKING_DB_PORT", 5432)?,
            user: get("BANKING_DB_USER").unwrap_or_else(|| "postgres".to_string()),
            password: get("BANKING_DB_PASSWORD").unwrap_or_default(),
            name: get("BANKING_DB_NAME").unwrap_or_else(|| "banking".to_string()),
            max_connections,
        };

        let format = match get("BANKING_LOG_FORMAT") {
            Some(raw) => raw
                .parse::<LogFormat>()
                .map_err(|e| ConfigError::invalid("BANKING_LOG_FORMAT", &raw, e.to_string()))?,
            None => LogFormat::default(),
        };
        let tracing = TracingConfig {
            default_level: mode.default_log_level().to_string(),
            format,
        };

        Ok(Self {
            server,
            store,
            database,
            tracing,
        })
    }
}

fn parse_or<T, G>(get: &G, key: &'static str, default: T) -> Result<T, ConfigError>
where
    T: FromStr,
    T::Err: core::fmt::Display,
    G: Fn(&str) -> Option<String>,
{
    match get(key) {
        Some(raw) => raw
            .trim()
            .parse::<T>()
            .map_err(|e| ConfigError::invalid(key, &raw, e.to_string())),
        None => Ok(default),
    }
}
