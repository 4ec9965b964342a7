//! Application configuration and constants.
//!
//! This module provides:
//! - Configuration constants (ports, timeouts, limits)
//! - Library configuration with validation
//! - CLI option types and parsing

mod cli;
mod constants;
mod types;

// Re-export all constants
pub use cli::{Cli, Command};
pub use constants::*;
pub use types::{Config, LogFormat, LogLevel};
