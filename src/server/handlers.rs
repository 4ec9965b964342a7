//! `/certs` handlers.

use axum::{
    extract::State,
    http::{header, HeaderValue, StatusCode},
    response::{IntoResponse, Response},
    Json,
};
use log::warn;

use super::types::{AppState, DomainRequest};
use crate::describe::ChainDescription;
use crate::describe_url;
use crate::error_handling::{FetchError, RequestError};

/// `POST /certs`: fetches and describes the chain of `{"domain": "https://..."}`.
///
/// Errors are returned as plain text with the status from [`status_for`].
pub async fn certs_handler(State(state): State<AppState>, body: String) -> Response {
    match describe_target(&state, &body).await {
        Ok(chain) => (StatusCode::OK, Json(chain)).into_response(),
        Err(e) => {
            let status = status_for(&e);
            warn!("POST /certs failed with {status}: {e}");
            (status, e.to_string()).into_response()
        }
    }
}

/// `OPTIONS /certs`: CORS preflight. Headers are added by [`add_cors_headers`].
pub async fn preflight_handler() -> StatusCode {
    StatusCode::NO_CONTENT
}

async fn describe_target(state: &AppState, body: &str) -> Result<ChainDescription, RequestError> {
    let request: DomainRequest =
        serde_json::from_str(body).map_err(|e| RequestError::InvalidBody(e.to_string()))?;

    describe_url(&state.fetcher, &request.domain, state.allow_private_hosts).await
}

/// Maps a request failure to its HTTP status.
///
/// Problems with the request itself, and endpoints that cannot be described,
/// are 400; failing to reach the endpoint is 404.
pub fn status_for(error: &RequestError) -> StatusCode {
    match error {
        RequestError::InvalidBody(_)
        | RequestError::InvalidUrl(_)
        | RequestError::NotHttps(_)
        | RequestError::MissingHost
        | RequestError::UnsafeTarget(_) => StatusCode::BAD_REQUEST,
        RequestError::Fetch(fetch) => match fetch {
            FetchError::InvalidServerName(_)
            | FetchError::NonPublicAddress { .. }
            | FetchError::NoPeerCertificates { .. } => StatusCode::BAD_REQUEST,
            FetchError::Resolve { .. }
            | FetchError::Connect { .. }
            | FetchError::ConnectTimeout { .. }
            | FetchError::Handshake { .. }
            | FetchError::HandshakeTimeout { .. }
            | FetchError::ChainPath { .. } => StatusCode::NOT_FOUND,
        },
    }
}

/// Adds the CORS headers every response carries.
pub async fn add_cors_headers(mut response: Response) -> Response {
    let headers = response.headers_mut();
    headers.insert(
        header::ACCESS_CONTROL_ALLOW_ORIGIN,
        HeaderValue::from_static("*"),
    );
    headers.insert(
        header::ACCESS_CONTROL_ALLOW_METHODS,
        HeaderValue::from_static("POST, OPTIONS"),
    );
    headers.insert(
        header::ACCESS_CONTROL_ALLOW_HEADERS,
        HeaderValue::from_static("Content-Type"),
    );
    response
}
