//! Application initialization.
//!
//! Logger setup. The TLS client configuration is built by
//! [`ChainFetcher::new`](crate::ChainFetcher::new), which passes the `ring`
//! crypto provider explicitly instead of relying on a process-wide default.

mod logger;

// Re-export public API
pub use logger::init_logger_with;
