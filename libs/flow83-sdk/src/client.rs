//! Flow 83 backend client implementation.

use std::time::Duration;

use flow83_types::{SubscriptionStatus, TrialStatus, UserProfile};
use reqwest::{StatusCode, redirect};
use serde::de::DeserializeOwned;
use tracing::debug;
use url::Url;

use crate::error::Flow83Error;

/// Default connect timeout (TCP handshake + TLS).
pub const DEFAULT_CONNECT_TIMEOUT: Duration = Duration::from_secs(5);

/// Default request timeout (total request/response time).
pub const DEFAULT_REQUEST_TIMEOUT: Duration = Duration::from_secs(30);

const CURRENT_USER_PATH: &str = "/api/auth/user";
const FIREBASE_EXCHANGE_PATH: &str = "/api/auth/firebase";
const TRIAL_STATUS_PATH: &str = "/api/trial-status";
const SUBSCRIPTION_STATUS_PATH: &str = "/api/subscription-status";
const LOGOUT_PATH: &str = "/api/logout";

/// Configuration for the Flow 83 client.
#[derive(Debug, Clone)]
pub struct Flow83Config {
    /// Backend origin (e.g., "https://app.flow83.com")
    pub base_url: Url,

    /// Total request timeout (default: 30 seconds)
    pub request_timeout: Option<Duration>,
}

/// Client for the Flow 83 backend.
///
/// Every request is credentialed: the client keeps the first-party session
/// cookie in its own cookie jar, so one instance should live for the whole
/// application lifetime.
#[derive(Debug, Clone)]
pub struct Flow83Client {
    base_url: Url,
    http_client: reqwest::Client,
}

impl Flow83Client {
    /// Create a new client with a fresh cookie jar.
    ///
    /// # Returns
    /// A configured `Flow83Client` or an error if configuration is invalid.
    pub fn new(config: Flow83Config) -> Result<Self, Flow83Error> {
        let http_client = reqwest::Client::builder()
            .cookie_store(true)
            .redirect(redirect::Policy::none())
            .connect_timeout(DEFAULT_CONNECT_TIMEOUT)
            .timeout(config.request_timeout.unwrap_or(DEFAULT_REQUEST_TIMEOUT))
            .build()?;

        Self::with_http_client(config.base_url, http_client)
    }

    /// Create a client around an existing `reqwest::Client`.
    ///
    /// The caller is responsible for enabling a cookie store on it.
    pub fn with_http_client(
        base_url: Url,
        http_client: reqwest::Client,
    ) -> Result<Self, Flow83Error> {
        if !matches!(base_url.scheme(), "http" | "https") {
            return Err(Flow83Error::Config(format!(
                "base URL must be http or https, got {}",
                base_url.scheme()
            )));
        }

        if base_url.cannot_be_a_base() {
            return Err(Flow83Error::Config("base URL cannot be a base".into()));
        }

        Ok(Self {
            base_url,
            http_client,
        })
    }

    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    /// Fetch the signed-in user.
    ///
    /// # Returns
    /// The user profile, or `None` when there is no first-party session.
    pub async fn current_user(&self) -> Result<Option<UserProfile>, Flow83Error> {
        self.get_optional(CURRENT_USER_PATH).await
    }

    /// Fetch the trial status. `None` when there is no session.
    pub async fn trial_status(&self) -> Result<Option<TrialStatus>, Flow83Error> {
        self.get_optional(TRIAL_STATUS_PATH).await
    }

    /// Fetch the subscription status. `None` when there is no session or no record.
    pub async fn subscription_status(&self) -> Result<Option<SubscriptionStatus>, Flow83Error> {
        self.get_optional(SUBSCRIPTION_STATUS_PATH).await
    }

    /// Exchange an identity provider token for a first-party session cookie.
    ///
    /// # Arguments
    /// * `id_token` - Short-lived token minted by the identity provider
    ///
    /// # Example
    /// ```rust,ignore
    /// client.exchange_identity_token(&token).await?;
    /// let me = client.current_user().await?;
    /// ```
    pub async fn exchange_identity_token(&self, id_token: &str) -> Result<(), Flow83Error> {
        let url = self.endpoint(FIREBASE_EXCHANGE_PATH)?;

        let response = self
            .http_client
            .post(url)
            .bearer_auth(id_token)
            .send()
            .await?;

        let status = response.status();
        debug!(status = status.as_u16(), "identity token exchange answered");

        if !status.is_success() {
            return Err(http_error(status));
        }

        Ok(())
    }

    /// End the first-party session.
    ///
    /// The backend answers with a redirect, which is not followed.
    pub async fn logout(&self) -> Result<(), Flow83Error> {
        let url = self.endpoint(LOGOUT_PATH)?;

        let response = self.http_client.get(url).send().await?;
        let status = response.status();

        if !(status.is_success() || status.is_redirection()) {
            return Err(http_error(status));
        }

        Ok(())
    }

    fn endpoint(&self, path: &str) -> Result<Url, Flow83Error> {
        Ok(self.base_url.join(path)?)
    }

    /// GET a credentialed resource, mapping 401 to `None`.
    async fn get_optional<T: DeserializeOwned>(&self, path: &str) -> Result<Option<T>, Flow83Error> {
        let url = self.endpoint(path)?;

        let response = self.http_client.get(url).send().await?;
        let status = response.status();

        if status == StatusCode::UNAUTHORIZED {
            debug!(path, "no session for resource");
            return Ok(None);
        }

        if !status.is_success() {
            return Err(http_error(status));
        }

        // Backend may answer 200 with a literal null when no record exists
        let body = response.bytes().await?;
        serde_json::from_slice::<Option<T>>(&body)
            .map_err(|e| Flow83Error::Decode(format!("{}: {}", path, e)))
    }
}

fn http_error(status: StatusCode) -> Flow83Error {
    Flow83Error::Http {
        status: status.as_u16(),
        status_text: status.canonical_reason().unwrap_or("Unknown").to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn config(url: &str) -> Flow83Config {
        Flow83Config {
            base_url: Url::parse(url).unwrap(),
            request_timeout: None,
        }
    }

    #[test]
    fn test_valid_config() {
        let result = Flow83Client::new(config("https://app.flow83.com"));
        assert!(result.is_ok());
    }

    #[test]
    fn test_config_rejects_non_http_scheme() {
        let result = Flow83Client::new(config("ftp://app.flow83.com"));
        assert!(matches!(result, Err(Flow83Error::Config(_))));
    }

    #[test]
    fn test_config_rejects_non_base_url() {
        let result = Flow83Client::new(config("mailto:someone@flow83.com"));
        assert!(matches!(result, Err(Flow83Error::Config(_))));
    }

    #[test]
    fn test_endpoint_joins_absolute_path() {
        let client = Flow83Client::new(config("https://app.flow83.com/some/page")).unwrap();

        let url = client.endpoint(TRIAL_STATUS_PATH).unwrap();

        assert_eq!(url.as_str(), "https://app.flow83.com/api/trial-status");
    }

    #[test]
    fn test_http_error_carries_status_text() {
        let err = http_error(StatusCode::BAD_GATEWAY);
        match err {
            Flow83Error::Http {
                status,
                status_text,
            } => {
                assert_eq!(status, 502);
                assert_eq!(status_text, "Bad Gateway");
            }
            other => panic!("unexpected error: {:?}", other),
        }
    }
}
