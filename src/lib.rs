//! certinfo library: TLS certificate chain description
//!
//! This library fetches the certificate chain an HTTPS endpoint presents and
//! turns every certificate into a serializable [`CertificateRecord`]: names,
//! validity, public key, extensions, fingerprints and a PEM copy.
//!
//! # Example
//!
//! ```no_run
//! use certinfo::{describe_url, ChainFetcher, Config};
//!
//! # #[tokio::main]
//! # async fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let config = Config::default();
//! let fetcher = ChainFetcher::new(&config)?;
//!
//! let chain = describe_url(&fetcher, "https://example.com", false).await?;
//! for cert in &chain.certs {
//!     println!("{} (issued by {})", cert.subject.common_name, cert.issuer.common_name);
//! }
//! # Ok(())
//! # }
//! ```
//!
//! Describing certificates needs no runtime:
//!
//! ```
//! let err = certinfo::describe_pem("").unwrap_err();
//! assert_eq!(err.to_string(), "No CERTIFICATE blocks found");
//! ```

#![warn(missing_docs)]

pub mod config;
pub mod describe;
mod error_handling;
pub mod initialization;
pub mod security;
pub mod server;
mod tls;

// Re-export public API
pub use config::{Config, LogFormat, LogLevel};
pub use describe::{
    describe, describe_certificate, describe_chain, describe_pem, format_id, CertificateRecord,
    ChainDescription, Miscellaneous, Name, PublicKeyInfo,
};
pub use error_handling::{
    ConfigValidationError, DescribeError, FetchError, InitializationError, RequestError,
};
pub use tls::ChainFetcher;

use log::info;

use security::{ensure_public_target, parse_https_target};

/// Fetches and describes the certificate chain of an `https` URL.
///
/// Unless `allow_private_hosts` is set, localhost names and non-public IP
/// literals are rejected before connecting.
///
/// # Errors
///
/// Returns `RequestError` for an unusable URL or target, or wraps the
/// `FetchError` if the chain cannot be retrieved.
pub async fn describe_url(
    fetcher: &ChainFetcher,
    url: &str,
    allow_private_hosts: bool,
) -> Result<ChainDescription, RequestError> {
    let target = parse_https_target(url)?;
    if !allow_private_hosts {
        ensure_public_target(&target)?;
    }

    info!("Describing chain of {}:{}", target.host, target.port);
    let chain = fetcher.fetch_chain(&target.host, target.port).await?;
    Ok(describe_chain(&chain))
}
