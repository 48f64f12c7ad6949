//! Server configuration management.
//!
//! Consolidates all environment variable reads and provides validated configuration.

use std::net::SocketAddr;
use tictactoe::SessionConfig;

/// Default bind address when neither `--bind` nor `SERVER_BIND` is given.
pub const DEFAULT_BIND: &str = "127.0.0.1:3001";

/// Complete server configuration loaded from environment variables
#[derive(Debug, Clone)]
pub struct ServerConfig {
    /// Server bind address
    pub bind: SocketAddr,
    /// Prometheus exporter bind address (disabled when `None`)
    pub metrics_bind: Option<SocketAddr>,
    /// Session engine configuration
    pub session: SessionConfig,
    /// Per-connection message limits
    pub rate_limits: RateLimitConfig,
}

/// Per-connection WebSocket rate limits
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RateLimitConfig {
    /// Messages allowed per second
    pub burst_per_second: usize,
    /// Messages allowed per minute
    pub sustained_per_minute: usize,
}

impl Default for RateLimitConfig {
    fn default() -> Self {
        Self {
            burst_per_second: 10,
            sustained_per_minute: 100,
        }
    }
}

impl ServerConfig {
    /// Load configuration from environment variables
    ///
    /// # Arguments
    ///
    /// * `bind_override` - Optional bind address override (from CLI args)
    /// * `metrics_bind_override` - Optional metrics address override (from CLI args)
    ///
    /// # Errors
    ///
    /// Returns error if an address variable is set but cannot be parsed
    pub fn from_env(
        bind_override: Option<SocketAddr>,
        metrics_bind_override: Option<SocketAddr>,
    ) -> Result<Self, ConfigError> {
        let bind = match bind_override {
            Some(addr) => addr,
            None => parse_addr_env("SERVER_BIND")?.unwrap_or_else(default_bind),
        };

        let metrics_bind = match metrics_bind_override {
            Some(addr) => Some(addr),
            None => parse_addr_env("METRICS_BIND")?,
        };

        let defaults = SessionConfig::default();
        let session = SessionConfig {
            inbox_capacity: parse_env_or("SESSION_INBOX_CAPACITY", defaults.inbox_capacity),
            max_code_attempts: parse_env_or("SESSION_CODE_ATTEMPTS", defaults.max_code_attempts),
        };

        let defaults = RateLimitConfig::default();
        let rate_limits = RateLimitConfig {
            burst_per_second: parse_env_or("WS_BURST_LIMIT", defaults.burst_per_second),
            sustained_per_minute: parse_env_or("WS_SUSTAINED_LIMIT", defaults.sustained_per_minute),
        };

        Ok(ServerConfig {
            bind,
            metrics_bind,
            session,
            rate_limits,
        })
    }

    /// Validate configuration after loading
    pub fn validate(&self) -> Result<(), ConfigError> {
        self.session
            .validate()
            .map_err(|reason| ConfigError::Invalid {
                var: "SESSION_*".to_string(),
                reason,
            })?;

        if self.rate_limits.burst_per_second == 0 {
            return Err(ConfigError::Invalid {
                var: "WS_BURST_LIMIT".to_string(),
                reason: "Must be greater than 0".to_string(),
            });
        }

        if self.rate_limits.sustained_per_minute < self.rate_limits.burst_per_second {
            return Err(ConfigError::Invalid {
                var: "WS_SUSTAINED_LIMIT".to_string(),
                reason: format!(
                    "Must be at least the burst limit ({})",
                    self.rate_limits.burst_per_second
                ),
            });
        }

        if self.metrics_bind == Some(self.bind) {
            return Err(ConfigError::Invalid {
                var: "METRICS_BIND".to_string(),
                reason: "Must differ from SERVER_BIND".to_string(),
            });
        }

        Ok(())
    }
}

/// Configuration error types
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Invalid configuration for {var}: {reason}")]
    Invalid { var: String, reason: String },
}

fn default_bind() -> SocketAddr {
    SocketAddr::from(([127, 0, 0, 1], 3001))
}

/// Parse an optional socket address variable, failing on malformed values
fn parse_addr_env(key: &str) -> Result<Option<SocketAddr>, ConfigError> {
    match std::env::var(key) {
        Ok(value) => value
            .parse()
            .map(Some)
            .map_err(|e| ConfigError::Invalid {
                var: key.to_string(),
                reason: format!("'{value}' is not a socket address: {e}"),
            }),
        Err(_) => Ok(None),
    }
}

/// Helper to parse environment variable with default fallback
fn parse_env_or<T>(key: &str, default: T) -> T
where
    T: std::str::FromStr,
{
    std::env::var(key)
        .ok()
        .and_then(|v| v.parse().ok())
        .unwrap_or(default)
}
