//! HTTP client factory with consistent timeout configuration.
//!
//! Stateless outbound clients are built here so timeouts stay uniform. The
//! backend client, which needs a cookie jar, is built by `Flow83Client::new`.

use reqwest::Client;
use std::time::Duration;

/// Default connect timeout (TCP handshake + TLS).
pub const DEFAULT_CONNECT_TIMEOUT: Duration = Duration::from_secs(5);

/// Client for stateless calls such as the identity provider's REST API.
pub fn try_build_client(request_timeout: Duration) -> Result<Client, reqwest::Error> {
    Client::builder()
        .connect_timeout(DEFAULT_CONNECT_TIMEOUT)
        .timeout(request_timeout)
        .build()
}
