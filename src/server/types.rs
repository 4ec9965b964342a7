//! Server data structures.

use std::sync::Arc;

use serde::Deserialize;

use crate::tls::ChainFetcher;

/// Shared state for the `/certs` handlers
#[derive(Clone, Debug)]
pub struct AppState {
    /// Fetcher shared by every request
    pub fetcher: Arc<ChainFetcher>,
    /// Skip the up-front private target check
    pub allow_private_hosts: bool,
}

/// JSON body of `POST /certs`
#[derive(Debug, Deserialize)]
pub struct DomainRequest {
    pub domain: String,
}
