//! Configuration loading and representation.
//!
//! Everything comes from environment variables:
//!
//! | Variable | Default | Meaning |
//! |----------|---------|---------|
//! | `AGENDA_HTTP_ADDR` | `0.0.0.0:8080` | listen address |
//! | `AGENDA_API_PREFIX` | `/v1` | versioned namespace for every resource |
//! | `DATABASE_URL` | unset | Postgres URL; in-memory stores when unset |
//! | `AGENDA_DB_MAX_CONNECTIONS` | `5` | pool size |

use std::net::SocketAddr;

use thiserror::Error;

pub const DEFAULT_HTTP_ADDR: &str = "0.0.0.0:8080";
pub const DEFAULT_API_PREFIX: &str = "/v1";
pub const DEFAULT_DB_MAX_CONNECTIONS: u32 = 5;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum ConfigError {
    #[error("invalid value for {key}: {value:?} ({reason})")]
    Invalid {
        key: &'static str,
        value: String,
        reason: String,
    },
}

/// Process configuration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AppConfig {
    pub http_addr: SocketAddr,
    /// Normalized prefix: empty, or `/segment[/segment...]` without a trailing slash.
    pub api_prefix: String,
    pub database_url: Option<String>,
    pub db_max_connections: u32,
}

impl AppConfig {
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build from an arbitrary key lookup (tests pass a map).
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let get = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());

        let raw_addr = get("AGENDA_HTTP_ADDR").unwrap_or_else(|| DEFAULT_HTTP_ADDR.to_string());
        let http_addr = raw_addr.parse().map_err(|e: std::net::AddrParseError| ConfigError::Invalid {
            key: "AGENDA_HTTP_ADDR",
            value: raw_addr.clone(),
            reason: e.to_string(),
        })?;

        let api_prefix = normalize_prefix(
            &get("AGENDA_API_PREFIX").unwrap_or_else(|| DEFAULT_API_PREFIX.to_string()),
        );

        let db_max_connections = match get("AGENDA_DB_MAX_CONNECTIONS") {
            None => DEFAULT_DB_MAX_CONNECTIONS,
            Some(raw) => match raw.trim().parse::<u32>() {
                Ok(n) if n > 0 => n,
                Ok(_) => {
                    return Err(ConfigError::Invalid {
                        key: "AGENDA_DB_MAX_CONNECTIONS",
                        value: raw,
                        reason: "must be positive".to_string(),
                    })
                }
                Err(e) => {
                    return Err(ConfigError::Invalid {
                        key: "AGENDA_DB_MAX_CONNECTIONS",
                        value: raw,
                        reason: e.to_string(),
                    })
                }
            },
        };

        Ok(Self {
            http_addr,
            api_prefix,
            database_url: get("DATABASE_URL"),
            db_max_connections,
        })
    }
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            http_addr: SocketAddr::from(([0, 0, 0, 0], 8080)),
            api_prefix: DEFAULT_API_PREFIX.to_string(),
            database_url: None,
            db_max_connections: DEFAULT_DB_MAX_CONNECTIONS,
        }
    }
}

fn normalize_prefix(raw: &str) -> String {
    let trimmed = raw.trim().trim_matches('/');
    if trimmed.is_empty() {
        String::new()
    } else {
        format!("/{trimmed}")
    }
}
