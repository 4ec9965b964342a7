//! Configuration constants.
//!
//! Defaults for the HTTP server and the TLS chain fetcher.

/// Default port for `certinfo serve`
pub const DEFAULT_PORT: u16 = 8080;
/// Default bind address for `certinfo serve`
pub const DEFAULT_BIND_ADDRESS: &str = "127.0.0.1";

// Network operation timeouts
/// TCP connection timeout in seconds
pub const TCP_CONNECT_TIMEOUT_SECS: u64 = 5;
/// TLS handshake timeout in seconds
pub const TLS_HANDSHAKE_TIMEOUT_SECS: u64 = 5;
/// Upper bound accepted for either timeout
pub const MAX_TIMEOUT_SECS: u64 = 60;

/// Port assumed when the target URL does not carry one
pub const HTTPS_DEFAULT_PORT: u16 = 443;

/// Maximum accepted `/certs` request body in bytes
pub const MAX_REQUEST_BODY_SIZE: usize = 16 * 1024;
