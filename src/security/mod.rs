//! Target validation.
//!
//! This module guards outbound connections against SSRF:
//! - Only `https` URLs with a host are accepted
//! - Localhost names and non-public IP literals are rejected up front
//! - [`is_public_ip`] is reused by the fetcher to filter resolved addresses

mod ip;
mod url_validation;

pub use ip::is_public_ip;
pub use url_validation::{ensure_public_target, parse_https_target, Target};
