//! TLS certificate chain retrieval.
//!
//! Connects to an HTTPS endpoint, completes a TLS handshake and returns the
//! verified certificate chain: leaf, intermediates, then the trust anchor.
//! Trust-chain and hostname verification happen inside rustls during the
//! handshake; a chain that does not verify surfaces as
//! [`FetchError::Handshake`].
//!
//! Host names are resolved once and the connection goes to the resolved
//! addresses, so the address check cannot be bypassed by DNS rebinding.
//!
//! Uses `tokio-rustls` for async TLS connections and `webpki-roots` as the
//! trust store.

use std::io;
use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;

use log::{debug, info, warn};
use rustls::crypto::ring::default_provider;
use rustls::pki_types::{CertificateDer, ServerName};
use rustls::ClientConfig;
use tokio::net::{lookup_host, TcpStream};
use tokio_rustls::TlsConnector;

use crate::config::Config;
use crate::error_handling::{FetchError, InitializationError};
use crate::security::is_public_ip;

use chain::{verified_chain, TrustAnchors};

mod chain;

#[cfg(test)]
pub(crate) mod test_helpers;

/// Fetches certificate chains over TLS.
///
/// Holds one rustls client configuration shared by every connection; cheap to
/// share behind an `Arc`.
#[derive(Clone)]
pub struct ChainFetcher {
    connector: TlsConnector,
    anchors: Arc<TrustAnchors>,
    connect_timeout: Duration,
    handshake_timeout: Duration,
    allow_private_addresses: bool,
}

impl std::fmt::Debug for ChainFetcher {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ChainFetcher")
            .field("trust_anchors", &self.anchors.len())
            .field("connect_timeout", &self.connect_timeout)
            .field("handshake_timeout", &self.handshake_timeout)
            .field("allow_private_addresses", &self.allow_private_addresses)
            .finish_non_exhaustive()
    }
}

impl ChainFetcher {
    /// Builds a fetcher trusting the Mozilla root program (`webpki-roots`),
    /// with the timeouts and private address policy from `config`.
    ///
    /// # Errors
    ///
    /// Returns `InitializationError::TlsConfigError` if the crypto provider
    /// supports none of the default protocol versions.
    pub fn new(config: &Config) -> Result<Self, InitializationError> {
        Ok(Self::build(
            TrustAnchors::webpki_roots(),
            Duration::from_secs(config.connect_timeout_secs),
            Duration::from_secs(config.handshake_timeout_secs),
        )?
        .allow_private_addresses(config.allow_private_hosts))
    }

    /// Builds a fetcher trusting exactly the `roots` certificates, which are
    /// also reported as the last element of every chain they anchor. Only
    /// public addresses are dialed until
    /// [`allow_private_addresses`](Self::allow_private_addresses) says
    /// otherwise.
    ///
    /// # Errors
    ///
    /// Same as [`ChainFetcher::new`].
    pub fn with_roots(
        roots: impl IntoIterator<Item = CertificateDer<'static>>,
        connect_timeout: Duration,
        handshake_timeout: Duration,
    ) -> Result<Self, InitializationError> {
        Self::build(
            TrustAnchors::from_certificates(roots),
            connect_timeout,
            handshake_timeout,
        )
    }

    fn build(
        anchors: TrustAnchors,
        connect_timeout: Duration,
        handshake_timeout: Duration,
    ) -> Result<Self, InitializationError> {
        let client_config = ClientConfig::builder_with_provider(Arc::new(default_provider()))
            .with_safe_default_protocol_versions()?
            .with_root_certificates(anchors.store())
            .with_no_client_auth();
        debug!("TLS client trusts {} anchor(s)", anchors.len());

        Ok(Self {
            connector: TlsConnector::from(Arc::new(client_config)),
            anchors: Arc::new(anchors),
            connect_timeout,
            handshake_timeout,
            allow_private_addresses: false,
        })
    }

    /// Whether loopback, private and reserved addresses may be dialed.
    pub fn allow_private_addresses(mut self, allow: bool) -> Self {
        self.allow_private_addresses = allow;
        self
    }

    /// Connects to `host:port` and returns the verified chain as owned DER:
    /// the leaf, the intermediates on the verified path in issuing order, then
    /// the trust anchor's certificate if it is known or was presented.
    /// Presented certificates outside the path are left out.
    ///
    /// `host` is used both for the TCP connection and as the TLS server name,
    /// so it may be a DNS name or an IP literal (IPv6 without brackets).
    ///
    /// # Errors
    ///
    /// - `FetchError::InvalidServerName` if `host` is not usable as a server name
    /// - `FetchError::Resolve` if the name does not resolve
    /// - `FetchError::NonPublicAddress` if only non-public addresses remain
    /// - `FetchError::Connect` / `FetchError::ConnectTimeout` for TCP failures
    /// - `FetchError::Handshake` / `FetchError::HandshakeTimeout` for TLS
    ///   failures, including chains that do not verify
    /// - `FetchError::NoPeerCertificates` if the server sent no certificates
    /// - `FetchError::ChainPath` if the verified path cannot be rebuilt
    pub async fn fetch_chain(
        &self,
        host: &str,
        port: u16,
    ) -> Result<Vec<CertificateDer<'static>>, FetchError> {
        let server_name = ServerName::try_from(host.to_string())
            .map_err(|e| FetchError::InvalidServerName(format!("{host}: {e}")))?;

        let addrs = self.resolve(host, port).await?;

        debug!("Connecting to {host}:{port} via {addrs:?}");
        let sock = match tokio::time::timeout(self.connect_timeout, connect_any(&addrs)).await {
            Ok(Ok(sock)) => sock,
            Ok(Err(source)) => {
                warn!("Failed to connect to {host}:{port} - {source}");
                return Err(FetchError::Connect {
                    host: host.to_string(),
                    port,
                    source,
                });
            }
            Err(_) => {
                warn!("TCP connection timeout for {host}:{port}");
                return Err(FetchError::ConnectTimeout {
                    host: host.to_string(),
                    port,
                    timeout: self.connect_timeout,
                });
            }
        };

        let tls_stream = match tokio::time::timeout(
            self.handshake_timeout,
            self.connector.connect(server_name, sock),
        )
        .await
        {
            Ok(Ok(stream)) => stream,
            Ok(Err(source)) => {
                warn!("TLS handshake failed for {host}: {source}");
                return Err(FetchError::Handshake {
                    host: host.to_string(),
                    source,
                });
            }
            Err(_) => {
                warn!("TLS handshake timeout for {host}");
                return Err(FetchError::HandshakeTimeout {
                    host: host.to_string(),
                    timeout: self.handshake_timeout,
                });
            }
        };

        let connection = tls_stream.get_ref().1;
        debug!(
            "Negotiated {:?} with {host} using {:?}",
            connection.protocol_version(),
            connection.negotiated_cipher_suite().map(|cs| cs.suite())
        );

        let presented: Vec<CertificateDer<'static>> = connection
            .peer_certificates()
            .map(|certs| certs.iter().map(|cert| cert.clone().into_owned()).collect())
            .unwrap_or_default();

        if presented.is_empty() {
            return Err(FetchError::NoPeerCertificates {
                host: host.to_string(),
            });
        }

        let chain = verified_chain(&presented, &self.anchors).map_err(|e| {
            warn!("Could not rebuild verified chain for {host}: {e}");
            FetchError::ChainPath {
                host: host.to_string(),
                reason: e.to_string(),
            }
        })?;

        info!("Retrieved {} certificate(s) from {host}:{port}", chain.len());
        Ok(chain)
    }

    /// Resolves `host` and drops non-public addresses unless they are allowed.
    async fn resolve(&self, host: &str, port: u16) -> Result<Vec<SocketAddr>, FetchError> {
        let resolved: Vec<SocketAddr> =
            match tokio::time::timeout(self.connect_timeout, lookup_host((host, port))).await {
                Ok(Ok(addrs)) => addrs.collect(),
                Ok(Err(source)) => {
                    warn!("Failed to resolve {host} - {source}");
                    return Err(FetchError::Resolve {
                        host: host.to_string(),
                        source,
                    });
                }
                Err(_) => {
                    warn!("DNS resolution timeout for {host}");
                    return Err(FetchError::ConnectTimeout {
                        host: host.to_string(),
                        port,
                        timeout: self.connect_timeout,
                    });
                }
            };

        if resolved.is_empty() {
            return Err(FetchError::Resolve {
                host: host.to_string(),
                source: io::Error::new(io::ErrorKind::NotFound, "no addresses"),
            });
        }
        if self.allow_private_addresses {
            return Ok(resolved);
        }

        let public: Vec<SocketAddr> = resolved
            .iter()
            .copied()
            .filter(|addr| is_public_ip(addr.ip()))
            .collect();
        if public.is_empty() {
            warn!("Blocked {host}: resolves only to {resolved:?}");
            return Err(FetchError::NonPublicAddress {
                host: host.to_string(),
            });
        }
        Ok(public)
    }
}

/// Tries each address in order; returns the last error if none connects.
async fn connect_any(addrs: &[SocketAddr]) -> io::Result<TcpStream> {
    let mut last_err = io::Error::new(io::ErrorKind::NotFound, "no addresses to connect to");
    for addr in addrs {
        match TcpStream::connect(addr).await {
            Ok(sock) => return Ok(sock),
            Err(e) => {
                debug!("Connect to {addr} failed: {e}");
                last_err = e;
            }
        }
    }
    Err(last_err)
}
