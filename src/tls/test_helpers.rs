//! In-process TLS server for fetcher and handler tests.
//!
//! By default the server presents `localhost_p256.pem` (SANs `localhost` and
//! `127.0.0.1`) followed by `root_rsa.pem`, which signed it.

use std::sync::Arc;
use std::time::Duration;

use rustls::crypto::ring::default_provider;
use rustls::pki_types::{CertificateDer, PrivateKeyDer, PrivatePkcs8KeyDer};
use rustls::ServerConfig;
use tokio::io::AsyncReadExt;
use tokio::net::TcpListener;
use tokio_rustls::TlsAcceptor;

use super::ChainFetcher;

pub(crate) const LOCALHOST_CERT: &str = include_str!("../../tests/fixtures/localhost_p256.pem");
pub(crate) const LOCALHOST_KEY: &str = include_str!("../../tests/fixtures/localhost_p256.key");
pub(crate) const ROOT_CERT: &str = include_str!("../../tests/fixtures/root_rsa.pem");
/// Self-signed and unrelated to the fixture root.
pub(crate) const UNRELATED_CERT: &str = include_str!("../../tests/fixtures/p384_self_signed.pem");

pub(crate) fn der(pem_text: &str) -> CertificateDer<'static> {
    CertificateDer::from(pem::parse(pem_text).unwrap().into_contents())
}

/// A fetcher that trusts only the fixture root and may dial loopback.
pub(crate) fn fixture_fetcher() -> ChainFetcher {
    ChainFetcher::with_roots([der(ROOT_CERT)], Duration::from_secs(2), Duration::from_secs(2))
        .unwrap()
        .allow_private_addresses(true)
}

/// Starts a TLS server on an ephemeral loopback port and returns the port.
pub(crate) async fn spawn_tls_server() -> u16 {
    spawn_tls_server_presenting(vec![der(LOCALHOST_CERT), der(ROOT_CERT)]).await
}

/// Like [`spawn_tls_server`], but the server sends `chain` as its
/// certificate list. The first entry must be the localhost certificate.
pub(crate) async fn spawn_tls_server_presenting(chain: Vec<CertificateDer<'static>>) -> u16 {
    let key = PrivateKeyDer::Pkcs8(PrivatePkcs8KeyDer::from(
        pem::parse(LOCALHOST_KEY).unwrap().into_contents(),
    ));
    let config = ServerConfig::builder_with_provider(Arc::new(default_provider()))
        .with_safe_default_protocol_versions()
        .unwrap()
        .with_no_client_auth()
        .with_single_cert(chain, key)
        .unwrap();
    let acceptor = TlsAcceptor::from(Arc::new(config));

    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let port = listener.local_addr().unwrap().port();

    tokio::spawn(async move {
        while let Ok((stream, _)) = listener.accept().await {
            let acceptor = acceptor.clone();
            tokio::spawn(async move {
                if let Ok(mut tls) = acceptor.accept(stream).await {
                    let mut sink = Vec::new();
                    let _ = tls.read_to_end(&mut sink).await;
                }
            });
        }
    });

    port
}

/// Starts a listener that accepts connections and immediately closes them.
pub(crate) async fn spawn_closing_server() -> u16 {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let port = listener.local_addr().unwrap().port();
    tokio::spawn(async move {
        while let Ok((stream, _)) = listener.accept().await {
            drop(stream);
        }
    });
    port
}

/// Starts a listener that accepts connections and never answers.
pub(crate) async fn spawn_silent_server() -> u16 {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let port = listener.local_addr().unwrap().port();
    tokio::spawn(async move {
        let mut held = Vec::new();
        while let Ok((stream, _)) = listener.accept().await {
            held.push(stream);
        }
    });
    port
}

/// A loopback port with nothing listening on it.
pub(crate) async fn closed_port() -> u16 {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    listener.local_addr().unwrap().port()
}
