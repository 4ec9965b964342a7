//! Error type definitions.
//!
//! This module defines all error types used throughout the application.

use std::io;
use std::time::Duration;

use log::SetLoggerError;
use thiserror::Error;

/// Error types for initialization failures.
#[derive(Error, Debug)]
#[allow(clippy::enum_variant_names)] // All variants end with "Error" by convention
pub enum InitializationError {
    /// Error initializing the logger.
    #[error("Logger initialization error: {0}")]
    LoggerError(#[from] SetLoggerError),

    /// Error building the TLS client configuration.
    #[error("TLS client initialization error: {0}")]
    TlsConfigError(#[from] rustls::Error),
}

/// A configuration value outside its accepted range.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("Invalid {field}: {message}")]
pub struct ConfigValidationError {
    /// Name of the offending option, as spelled on the command line.
    pub field: &'static str,
    /// What is wrong with it.
    pub message: String,
}

impl ConfigValidationError {
    pub(crate) fn new(field: &'static str, message: impl Into<String>) -> Self {
        Self {
            field,
            message: message.into(),
        }
    }
}

/// Errors from turning certificate bytes into a record.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum DescribeError {
    /// The bytes are not a DER-encoded X.509 certificate.
    #[error("Certificate parse error: {0}")]
    Parse(String),

    /// The text is not well-formed PEM.
    #[error("PEM parse error: {0}")]
    Pem(String),

    /// The PEM text holds no `CERTIFICATE` block.
    #[error("No CERTIFICATE blocks found")]
    NoCertificates,
}

/// Errors from retrieving a certificate chain over TLS.
#[derive(Error, Debug)]
pub enum FetchError {
    /// The host is not a valid DNS name or IP address for SNI.
    #[error("Invalid server name: {0}")]
    InvalidServerName(String),

    /// The host name could not be resolved.
    #[error("Failed to resolve {host}: {source}")]
    Resolve {
        /// Host that was looked up
        host: String,
        /// Resolver error
        #[source]
        source: io::Error,
    },

    /// Every address the host resolved to is loopback, private or reserved.
    #[error("{host} resolves only to non-public addresses")]
    NonPublicAddress {
        /// Host that was looked up
        host: String,
    },

    /// TCP connection failed.
    #[error("Failed to connect to {host}:{port}: {source}")]
    Connect {
        /// Host that was dialed
        host: String,
        /// Port that was dialed
        port: u16,
        /// Underlying socket error
        #[source]
        source: io::Error,
    },

    /// TCP connection did not complete in time.
    #[error("Connection to {host}:{port} timed out after {timeout:?}")]
    ConnectTimeout {
        /// Host that was dialed
        host: String,
        /// Port that was dialed
        port: u16,
        /// Configured timeout
        timeout: Duration,
    },

    /// TLS handshake failed, including certificate verification failures.
    #[error("TLS handshake with {host} failed: {source}")]
    Handshake {
        /// Server name sent in SNI
        host: String,
        /// Error reported by rustls, wrapped by tokio-rustls
        #[source]
        source: io::Error,
    },

    /// TLS handshake did not complete in time.
    #[error("TLS handshake with {host} timed out after {timeout:?}")]
    HandshakeTimeout {
        /// Server name sent in SNI
        host: String,
        /// Configured timeout
        timeout: Duration,
    },

    /// The handshake completed without the server presenting certificates.
    #[error("{host} presented no certificates")]
    NoPeerCertificates {
        /// Server name sent in SNI
        host: String,
    },

    /// The handshake succeeded but the verified path could not be rebuilt
    /// from the presented certificates.
    #[error("Could not rebuild the verified chain of {host}: {reason}")]
    ChainPath {
        /// Server name sent in SNI
        host: String,
        /// Path building error
        reason: String,
    },
}

/// Errors from handling a `/certs` request.
#[derive(Error, Debug)]
pub enum RequestError {
    /// The body is not `{"domain": "<url>"}`.
    #[error("Invalid request body: {0}")]
    InvalidBody(String),

    /// The domain is not a parseable URL.
    #[error("Invalid URL: {0}")]
    InvalidUrl(#[from] url::ParseError),

    /// Only `https` URLs carry a certificate chain.
    #[error("Unsupported scheme '{0}', expected https")]
    NotHttps(String),

    /// The URL has no host component.
    #[error("URL has no host")]
    MissingHost,

    /// The target resolves to a loopback, private or otherwise reserved address.
    #[error("Refusing to connect to non-public target: {0}")]
    UnsafeTarget(String),

    /// Retrieving the chain failed.
    #[error(transparent)]
    Fetch(#[from] FetchError),
}
