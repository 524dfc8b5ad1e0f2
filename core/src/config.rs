//! Executor configuration.
//!
//! # Design
//! Timeouts are stored as `Duration` but exchanged in milliseconds, the unit
//! hosts pass across the C boundary and in JSON. A zero duration disables
//! the corresponding timeout. The socket buffer size is fixed per executor.

use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::error::ConfigError;

/// Default connection and socket timeout, in milliseconds.
pub const LONG_CONNECTION_TIMEOUT: u64 = 30 * 1000;

/// Faster-failing preset for callers that would rather give up early.
pub const SHORT_CONNECTION_TIMEOUT: u64 = 8 * 1000;

/// Buffer size used when reading a response body.
pub const SOCKET_BUFFER_SIZE: usize = 8192;

pub const CONNECT_TIMEOUT_VAR: &str = "HTTPHELPER_CONNECT_TIMEOUT_MS";
pub const SOCKET_TIMEOUT_VAR: &str = "HTTPHELPER_SOCKET_TIMEOUT_MS";

/// Connection settings applied once when a `RequestExecutor` is built.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "RawConfig", into = "RawConfig")]
pub struct ExecutorConfig {
    /// Time allowed to establish a connection. Zero means no timeout.
    pub connect_timeout: Duration,
    /// Time allowed to receive the status line and headers, and separately
    /// the whole body. Zero means infinite.
    pub socket_timeout: Duration,
    pub socket_buffer_size: usize,
}

impl Default for ExecutorConfig {
    fn default() -> Self {
        Self::from_millis(LONG_CONNECTION_TIMEOUT, LONG_CONNECTION_TIMEOUT)
    }
}

impl ExecutorConfig {
    pub fn from_millis(connect_timeout_ms: u64, socket_timeout_ms: u64) -> Self {
        Self {
            connect_timeout: Duration::from_millis(connect_timeout_ms),
            socket_timeout: Duration::from_millis(socket_timeout_ms),
            socket_buffer_size: SOCKET_BUFFER_SIZE,
        }
    }

    /// 8s connect and socket timeouts.
    pub fn short() -> Self {
        Self::from_millis(SHORT_CONNECTION_TIMEOUT, SHORT_CONNECTION_TIMEOUT)
    }

    /// Read timeouts from `HTTPHELPER_CONNECT_TIMEOUT_MS` and
    /// `HTTPHELPER_SOCKET_TIMEOUT_MS`, keeping the default for unset ones.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|var| std::env::var(var).ok())
    }

    fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&'static str) -> Option<String>,
    {
        let connect = parse_millis(CONNECT_TIMEOUT_VAR, lookup(CONNECT_TIMEOUT_VAR))?;
        let socket = parse_millis(SOCKET_TIMEOUT_VAR, lookup(SOCKET_TIMEOUT_VAR))?;
        Ok(Self::from_millis(
            connect.unwrap_or(LONG_CONNECTION_TIMEOUT),
            socket.unwrap_or(LONG_CONNECTION_TIMEOUT),
        ))
    }

    /// `None` when the timeout is disabled.
    pub fn connect_timeout(&self) -> Option<Duration> {
        non_zero(self.connect_timeout)
    }

    /// `None` when the timeout is disabled.
    pub fn socket_timeout(&self) -> Option<Duration> {
        non_zero(self.socket_timeout)
    }
}

fn non_zero(d: Duration) -> Option<Duration> {
    if d.is_zero() {
        None
    } else {
        Some(d)
    }
}

fn parse_millis(var: &'static str, value: Option<String>) -> Result<Option<u64>, ConfigError> {
    let Some(value) = value else {
        return Ok(None);
    };
    value
        .trim()
        .parse()
        .map(Some)
        .map_err(|source| ConfigError::InvalidMillis { var, value, source })
}

/// Wire form of `ExecutorConfig`.
#[derive(Serialize, Deserialize)]
struct RawConfig {
    #[serde(default = "long_timeout")]
    connect_timeout_ms: u64,
    #[serde(default = "long_timeout")]
    socket_timeout_ms: u64,
    #[serde(default = "socket_buffer_size")]
    socket_buffer_size: usize,
}

fn long_timeout() -> u64 {
    LONG_CONNECTION_TIMEOUT
}

fn socket_buffer_size() -> usize {
    SOCKET_BUFFER_SIZE
}

impl From<RawConfig> for ExecutorConfig {
    fn from(raw: RawConfig) -> Self {
        Self {
            socket_buffer_size: raw.socket_buffer_size.max(1),
            ..Self::from_millis(raw.connect_timeout_ms, raw.socket_timeout_ms)
        }
    }
}

impl From<ExecutorConfig> for RawConfig {
    fn from(config: ExecutorConfig) -> Self {
        Self {
            connect_timeout_ms: u64::try_from(config.connect_timeout.as_millis()).unwrap_or(u64::MAX),
            socket_timeout_ms: u64::try_from(config.socket_timeout.as_millis()).unwrap_or(u64::MAX),
            socket_buffer_size: config.socket_buffer_size,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_uses_long_timeout_for_both() {
        let config = ExecutorConfig::default();
        assert_eq!(config.connect_timeout, Duration::from_secs(30));
        assert_eq!(config.socket_timeout, Duration::from_secs(30));
        assert_eq!(config.socket_buffer_size, 8192);
    }

    #[test]
    fn short_preset() {
        let config = ExecutorConfig::short();
        assert_eq!(config.connect_timeout, Duration::from_secs(8));
        assert_eq!(config.socket_timeout, Duration::from_secs(8));
    }

    #[test]
    fn zero_disables_timeouts() {
        let config = ExecutorConfig::from_millis(0, 0);
        assert_eq!(config.connect_timeout(), None);
        assert_eq!(config.socket_timeout(), None);

        let config = ExecutorConfig::from_millis(1, 250);
        assert_eq!(config.connect_timeout(), Some(Duration::from_millis(1)));
        assert_eq!(config.socket_timeout(), Some(Duration::from_millis(250)));
    }

    #[test]
    fn deserialize_fills_missing_fields_with_defaults() {
        let config: ExecutorConfig = serde_json::from_str(r#"{"connect_timeout_ms":500}"#).unwrap();
        assert_eq!(config.connect_timeout, Duration::from_millis(500));
        assert_eq!(config.socket_timeout, Duration::from_secs(30));
        assert_eq!(config.socket_buffer_size, SOCKET_BUFFER_SIZE);
    }

    #[test]
    fn serializes_as_millis() {
        let json = serde_json::to_value(ExecutorConfig::short()).unwrap();
        assert_eq!(json["connect_timeout_ms"], 8000);
        assert_eq!(json["socket_timeout_ms"], 8000);
        assert_eq!(json["socket_buffer_size"], 8192);
    }

    #[test]
    fn huge_duration_saturates_when_serialized() {
        let config = ExecutorConfig {
            connect_timeout: Duration::MAX,
            ..ExecutorConfig::default()
        };
        let json = serde_json::to_value(config).unwrap();
        assert_eq!(json["connect_timeout_ms"], u64::MAX);
        assert_eq!(json["socket_timeout_ms"], 30_000);
    }

    #[test]
    fn lookup_with_nothing_set_is_default() {
        let config = ExecutorConfig::from_lookup(|_| None).unwrap();
        assert_eq!(config, ExecutorConfig::default());
    }

    #[test]
    fn lookup_reads_both_variables() {
        let config = ExecutorConfig::from_lookup(|var| match var {
            CONNECT_TIMEOUT_VAR => Some("1000".to_string()),
            SOCKET_TIMEOUT_VAR => Some(" 0 ".to_string()),
            _ => None,
        })
        .unwrap();
        assert_eq!(config.connect_timeout, Duration::from_secs(1));
        assert_eq!(config.socket_timeout(), None);
    }

    #[test]
    fn lookup_rejects_non_numeric_value() {
        let err = ExecutorConfig::from_lookup(|var| {
            (var == SOCKET_TIMEOUT_VAR).then(|| "soon".to_string())
        })
        .unwrap_err();
        let ConfigError::InvalidMillis { var, value, .. } = err;
        assert_eq!(var, SOCKET_TIMEOUT_VAR);
        assert_eq!(value, "soon");
    }
}
