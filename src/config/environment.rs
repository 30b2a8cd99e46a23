// ABOUTME: Environment-based server configuration with typed sections and defaults
// ABOUTME: Invalid values are reported as CONFIG_ERROR naming the offending variable
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 GOYA Mentorship Platform

use std::env;
use std::fmt;
use std::net::{IpAddr, Ipv4Addr, SocketAddr};
use std::str::FromStr;
use std::time::Duration;

use goya_core::errors::{AppError, AppResult};
use serde::{Deserialize, Serialize};

use crate::capacity::DEFAULT_MENTOR_CAPACITY;
use crate::lifecycle::DEFAULT_SWEEP_INTERVAL;

/// Default HTTP port
pub const DEFAULT_HTTP_PORT: u16 = 8081;
/// Default database location
pub const DEFAULT_DATABASE_URL: &str = "sqlite:./data/goya.db";
/// Default sender for outbound mail
pub const DEFAULT_MAIL_FROM: &str = "no-reply@goya.africa";

const DEFAULT_MAX_CONNECTIONS: u32 = 5;
const DEFAULT_MAIL_TIMEOUT: Duration = Duration::from_secs(10);

/// Log output format
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LogFormat {
    /// Single-line human readable output
    #[default]
    Compact,
    /// One JSON object per event
    Json,
}

impl FromStr for LogFormat {
    type Err = AppError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "compact" | "pretty" | "text" => Ok(Self::Compact),
            "json" => Ok(Self::Json),
            other => Err(AppError::config(format!(
                "Unknown log format '{other}'. Use 'compact' or 'json'"
            ))),
        }
    }
}

impl fmt::Display for LogFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Compact => f.write_str("compact"),
            Self::Json => f.write_str("json"),
        }
    }
}

/// Logging settings
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LoggingConfig {
    /// Default filter directive; `RUST_LOG` takes precedence at init
    pub level: String,
    /// Output format
    pub format: LogFormat,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "info".to_owned(),
            format: LogFormat::Compact,
        }
    }
}

/// Database settings
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DatabaseConfig {
    /// SQLite connection URL
    pub url: String,
    /// Pool size for file-backed databases
    pub max_connections: u32,
}

/// Cohort sweeper settings
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct SweeperConfig {
    /// Pause between sweeps
    pub interval: Duration,
}

/// Outbound mail settings
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MailConfig {
    /// Relay endpoint; notifications are only logged when absent
    pub relay_url: Option<String>,
    /// Sender address
    pub from_address: String,
    /// Per-request timeout for the relay
    pub timeout: Duration,
}

/// Complete server configuration
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ServerConfig {
    /// Interface to bind
    pub host: IpAddr,
    /// HTTP port
    pub http_port: u16,
    /// Database settings
    pub database: DatabaseConfig,
    /// Sweeper settings
    pub sweeper: SweeperConfig,
    /// Maximum students per coach
    pub mentor_capacity: u32,
    /// Mail settings
    pub mail: MailConfig,
    /// Logging settings
    pub logging: LoggingConfig,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: IpAddr::V4(Ipv4Addr::UNSPECIFIED),
            http_port: DEFAULT_HTTP_PORT,
            database: DatabaseConfig {
                url: DEFAULT_DATABASE_URL.to_owned(),
                max_connections: DEFAULT_MAX_CONNECTIONS,
            },
            sweeper: SweeperConfig {
                interval: DEFAULT_SWEEP_INTERVAL,
            },
            mentor_capacity: DEFAULT_MENTOR_CAPACITY,
            mail: MailConfig {
                relay_url: None,
                from_address: DEFAULT_MAIL_FROM.to_owned(),
                timeout: DEFAULT_MAIL_TIMEOUT,
            },
            logging: LoggingConfig::default(),
        }
    }
}

impl ServerConfig {
    /// Load configuration from environment variables
    ///
    /// # Errors
    ///
    /// Returns a config error if a variable is set to an unparseable or
    /// out-of-range value
    pub fn from_env() -> AppResult<Self> {
        let defaults = Self::default();

        let sweep_secs: u64 = env_parse(
            "GOYA_SWEEP_INTERVAL_SECS",
            defaults.sweeper.interval.as_secs(),
        )?;
        if sweep_secs == 0 {
            return Err(AppError::config("GOYA_SWEEP_INTERVAL_SECS must be greater than 0"));
        }
        let mentor_capacity: u32 = env_parse("GOYA_MENTOR_CAPACITY", defaults.mentor_capacity)?;
        if mentor_capacity == 0 {
            return Err(AppError::config("GOYA_MENTOR_CAPACITY must be greater than 0"));
        }
        let mail_timeout_secs: u64 =
            env_parse("GOYA_MAIL_TIMEOUT_SECS", defaults.mail.timeout.as_secs())?;

        Ok(Self {
            host: env_parse("GOYA_HOST", defaults.host)?,
            http_port: env_parse("GOYA_HTTP_PORT", defaults.http_port)?,
            database: DatabaseConfig {
                url: env_string("DATABASE_URL").unwrap_or(defaults.database.url),
                max_connections: env_parse(
                    "GOYA_DB_MAX_CONNECTIONS",
                    defaults.database.max_connections,
                )?,
            },
            sweeper: SweeperConfig {
                interval: Duration::from_secs(sweep_secs),
            },
            mentor_capacity,
            mail: MailConfig {
                relay_url: env_string("GOYA_MAIL_RELAY_URL"),
                from_address: env_string("GOYA_MAIL_FROM").unwrap_or(defaults.mail.from_address),
                timeout: Duration::from_secs(mail_timeout_secs),
            },
            logging: LoggingConfig {
                level: env_string("GOYA_LOG_LEVEL").unwrap_or(defaults.logging.level),
                format: env_parse("GOYA_LOG_FORMAT", defaults.logging.format)?,
            },
        })
    }

    /// Address the HTTP server binds to
    #[must_use]
    pub const fn socket_addr(&self) -> SocketAddr {
        SocketAddr::new(self.host, self.http_port)
    }

    /// One-line summary for startup logs
    #[must_use]
    pub fn summary(&self) -> String {
        format!(
            "addr={} database={} sweep_interval={}s mentor_capacity={} mail_relay={} log_format={}",
            self.socket_addr(),
            self.database.url,
            self.sweeper.interval.as_secs(),
            self.mentor_capacity,
            self.mail.relay_url.as_deref().unwrap_or("none"),
            self.logging.format,
        )
    }
}

/// Non-empty value of an environment variable
fn env_string(key: &str) -> Option<String> {
    env::var(key)
        .ok()
        .map(|v| v.trim().to_owned())
        .filter(|v| !v.is_empty())
}

/// Parse an environment variable, falling back to `default` when unset
fn env_parse<T>(key: &str, default: T) -> AppResult<T>
where
    T: FromStr,
    T::Err: fmt::Display,
{
    env_string(key).map_or(Ok(default), |raw| {
        raw.parse()
            .map_err(|e| AppError::config(format!("Invalid value '{raw}' for {key}: {e}")))
    })
}
