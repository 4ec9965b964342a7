//! Error handling.
//!
//! This module provides the error types for each layer:
//! - Initialization (logger, TLS client)
//! - Configuration validation
//! - Certificate description
//! - Chain retrieval and request handling
//!
//! Library code returns these typed errors; the binary and the server
//! bootstrap wrap them with `anyhow` context.

mod types;

// Re-export public API
pub use types::{
    ConfigValidationError, DescribeError, FetchError, InitializationError, RequestError,
};
