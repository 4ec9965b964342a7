//! Configuration types.
//!
//! This module defines the log enums shared with the CLI and the library
//! [`Config`] struct.

use clap::ValueEnum;
use log::LevelFilter;

use crate::config::constants::{
    DEFAULT_BIND_ADDRESS, DEFAULT_PORT, MAX_TIMEOUT_SECS, TCP_CONNECT_TIMEOUT_SECS,
    TLS_HANDSHAKE_TIMEOUT_SECS,
};
use crate::error_handling::ConfigValidationError;

/// Verbosity of the `certinfo` log target, as accepted by `--log-level`.
#[derive(Clone, Copy, Debug, PartialEq, Eq, ValueEnum)]
pub enum LogLevel {
    /// Failures only
    Error,
    /// Failures and rejected targets
    Warn,
    /// One line per described chain (default)
    Info,
    /// Adds per-certificate and TLS negotiation details
    Debug,
    /// Everything, including dependency internals allowed through `RUST_LOG`
    Trace,
}

impl From<LogLevel> for LevelFilter {
    fn from(level: LogLevel) -> Self {
        match level {
            LogLevel::Error => LevelFilter::Error,
            LogLevel::Warn => LevelFilter::Warn,
            LogLevel::Info => LevelFilter::Info,
            LogLevel::Debug => LevelFilter::Debug,
            LogLevel::Trace => LevelFilter::Trace,
        }
    }
}

/// Log line format, as accepted by `--log-format`.
#[derive(Clone, Copy, Debug, PartialEq, Eq, ValueEnum)]
pub enum LogFormat {
    /// Colored text with a level marker (default)
    Plain,
    /// One JSON object per line: `ts`, `level`, `target`, `msg`
    Json,
}

/// Library configuration (no CLI dependencies).
///
/// # Examples
///
/// ```
/// use certinfo::Config;
///
/// let config = Config {
///     port: 9443,
///     connect_timeout_secs: 2,
///     ..Default::default()
/// };
/// assert!(config.validate().is_ok());
/// ```
#[derive(Debug, Clone)]
pub struct Config {
    /// Log level
    pub log_level: LogLevel,

    /// Log format
    pub log_format: LogFormat,

    /// Address the HTTP server binds to
    pub bind_address: String,

    /// Port the HTTP server listens on
    pub port: u16,

    /// TCP connect timeout in seconds
    pub connect_timeout_secs: u64,

    /// TLS handshake timeout in seconds
    pub handshake_timeout_secs: u64,

    /// Skip the loopback/private address check on target hosts
    pub allow_private_hosts: bool,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            log_level: LogLevel::Info,
            log_format: LogFormat::Plain,
            bind_address: DEFAULT_BIND_ADDRESS.to_string(),
            port: DEFAULT_PORT,
            connect_timeout_secs: TCP_CONNECT_TIMEOUT_SECS,
            handshake_timeout_secs: TLS_HANDSHAKE_TIMEOUT_SECS,
            allow_private_hosts: false,
        }
    }
}

impl Config {
    /// Checks option ranges.
    ///
    /// # Errors
    ///
    /// Returns the first offending option: port 0, an empty bind address, or a
    /// timeout of zero or above the maximum.
    pub fn validate(&self) -> Result<(), ConfigValidationError> {
        if self.port == 0 {
            return Err(ConfigValidationError::new(
                "port",
                "must be greater than 0",
            ));
        }
        if self.bind_address.trim().is_empty() {
            return Err(ConfigValidationError::new(
                "bind-address",
                "must not be empty",
            ));
        }
        validate_timeout("connect-timeout-secs", self.connect_timeout_secs)?;
        validate_timeout("handshake-timeout-secs", self.handshake_timeout_secs)?;
        Ok(())
    }
}

fn validate_timeout(field: &'static str, secs: u64) -> Result<(), ConfigValidationError> {
    if secs == 0 {
        return Err(ConfigValidationError::new(field, "must be greater than 0"));
    }
    if secs > MAX_TIMEOUT_SECS {
        return Err(ConfigValidationError::new(
            field,
            format!("must be at most {MAX_TIMEOUT_SECS} (got {secs})"),
        ));
    }
    Ok(())
}
