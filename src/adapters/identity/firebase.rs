//! Firebase Authentication over its REST API.
//!
//! Signs in with email and password, keeps the refresh token in memory and
//! mints a fresh ID token when the cached one is about to expire.

use async_trait::async_trait;
use chrono::Utc;
use flow83_types::token_expires_within;
use reqwest::{Client, StatusCode};
use secrecy::{ExposeSecret, SecretString};
use serde::{Deserialize, Serialize};
use tokio::sync::{Mutex, watch};
use tracing::{debug, info, instrument};
use url::Url;

use crate::{
    app_error::{AppError, AppResult},
    application::ports::{IdentityProvider, IdentitySubscription},
    domain::entities::identity::Identity,
};

/// Refresh when the ID token has less than this many seconds left.
const REFRESH_WINDOW_SECS: i64 = 60;

const SIGN_IN_PATH: &str = "/v1/accounts:signInWithPassword";
const REFRESH_PATH: &str = "/v1/token";

/// Base URLs of the Firebase REST services.
#[derive(Debug, Clone)]
pub struct FirebaseEndpoints {
    pub identity_toolkit: Url,
    pub secure_token: Url,
}

impl Default for FirebaseEndpoints {
    fn default() -> Self {
        Self {
            identity_toolkit: Url::parse("https://identitytoolkit.googleapis.com")
                .expect("static URL is valid"),
            secure_token: Url::parse("https://securetoken.googleapis.com")
                .expect("static URL is valid"),
        }
    }
}

struct TokenSet {
    id_token: SecretString,
    refresh_token: SecretString,
}

pub struct FirebaseIdentityProvider {
    http: Client,
    api_key: SecretString,
    endpoints: FirebaseEndpoints,
    state: watch::Sender<Option<Identity>>,
    tokens: Mutex<Option<TokenSet>>,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct SignInRequest<'a> {
    email: &'a str,
    password: &'a str,
    return_secure_token: bool,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct SignInResponse {
    local_id: String,
    email: Option<String>,
    display_name: Option<String>,
    id_token: String,
    refresh_token: String,
}

#[derive(Serialize)]
struct RefreshRequest<'a> {
    grant_type: &'static str,
    refresh_token: &'a str,
}

#[derive(Deserialize)]
struct RefreshResponse {
    id_token: String,
    refresh_token: String,
}

#[derive(Deserialize)]
struct ErrorEnvelope {
    error: ErrorBody,
}

#[derive(Deserialize)]
struct ErrorBody {
    message: String,
}

impl FirebaseIdentityProvider {
    pub fn new(http: Client, api_key: SecretString, endpoints: FirebaseEndpoints) -> Self {
        let (state, _) = watch::channel(None);
        Self {
            http,
            api_key,
            endpoints,
            state,
            tokens: Mutex::new(None),
        }
    }

    #[instrument(skip(self, password))]
    pub async fn sign_in_with_password(
        &self,
        email: &str,
        password: &SecretString,
    ) -> AppResult<Identity> {
        let url = self.endpoint(&self.endpoints.identity_toolkit, SIGN_IN_PATH)?;
        let body = SignInRequest {
            email,
            password: password.expose_secret(),
            return_secure_token: true,
        };

        let resp = self
            .http
            .post(url)
            .json(&body)
            .send()
            .await
            .map_err(|e| AppError::Network(e.to_string()))?;

        if !resp.status().is_success() {
            return Err(provider_error(resp).await);
        }

        let parsed: SignInResponse = resp
            .json()
            .await
            .map_err(|e| AppError::Identity(e.to_string()))?;

        let identity = Identity {
            uid: parsed.local_id,
            email: parsed.email,
            display_name: parsed.display_name.filter(|n| !n.is_empty()),
        };

        *self.tokens.lock().await = Some(TokenSet {
            id_token: SecretString::from(parsed.id_token),
            refresh_token: SecretString::from(parsed.refresh_token),
        });
        self.state.send_replace(Some(identity.clone()));

        info!(uid = %identity.uid, "signed in with identity provider");
        Ok(identity)
    }

    async fn refresh(&self, refresh_token: &SecretString) -> AppResult<TokenSet> {
        let url = self.endpoint(&self.endpoints.secure_token, REFRESH_PATH)?;
        let body = RefreshRequest {
            grant_type: "refresh_token",
            refresh_token: refresh_token.expose_secret(),
        };

        let resp = self
            .http
            .post(url)
            .json(&body)
            .send()
            .await
            .map_err(|e| AppError::Network(e.to_string()))?;

        if !resp.status().is_success() {
            return Err(provider_error(resp).await);
        }

        let parsed: RefreshResponse = resp
            .json()
            .await
            .map_err(|e| AppError::Identity(e.to_string()))?;

        debug!("identity token refreshed");
        Ok(TokenSet {
            id_token: SecretString::from(parsed.id_token),
            refresh_token: SecretString::from(parsed.refresh_token),
        })
    }

    fn endpoint(&self, base: &Url, path: &str) -> AppResult<Url> {
        let mut url = base
            .join(path)
            .map_err(|e| AppError::InvalidInput(format!("invalid Firebase URL: {}", e)))?;
        url.query_pairs_mut()
            .append_pair("key", self.api_key.expose_secret());
        Ok(url)
    }
}

async fn provider_error(resp: reqwest::Response) -> AppError {
    let status = resp.status();
    let message = resp
        .json::<ErrorEnvelope>()
        .await
        .map(|e| e.error.message)
        .unwrap_or_else(|_| status.to_string());

    let credentials_rejected = status == StatusCode::BAD_REQUEST
        && matches!(
            message.split(':').next().map(str::trim),
            Some(
                "INVALID_LOGIN_CREDENTIALS"
                    | "INVALID_PASSWORD"
                    | "EMAIL_NOT_FOUND"
                    | "USER_DISABLED"
            )
        );

    if credentials_rejected {
        AppError::InvalidCredentials
    } else {
        AppError::Identity(message)
    }
}

#[async_trait]
impl IdentityProvider for FirebaseIdentityProvider {
    fn subscribe(&self) -> IdentitySubscription {
        IdentitySubscription::new(self.state.subscribe())
    }

    fn current(&self) -> Option<Identity> {
        self.state.borrow().clone()
    }

    async fn id_token(&self) -> AppResult<Option<SecretString>> {
        // Held across the refresh so concurrent callers share one refresh call
        let mut tokens = self.tokens.lock().await;
        let Some(current) = tokens.as_ref() else {
            return Ok(None);
        };

        let now = Utc::now().timestamp();
        if !token_expires_within(current.id_token.expose_secret(), now, REFRESH_WINDOW_SECS) {
            return Ok(Some(current.id_token.clone()));
        }

        let refreshed = self.refresh(&current.refresh_token).await?;
        let id_token = refreshed.id_token.clone();
        *tokens = Some(refreshed);
        Ok(Some(id_token))
    }

    async fn sign_out(&self) -> AppResult<()> {
        *self.tokens.lock().await = None;
        self.state.send_replace(None);
        info!("signed out of identity provider");
        Ok(())
    }
}
