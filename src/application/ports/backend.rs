use async_trait::async_trait;
use flow83_types::{SubscriptionStatus, TrialStatus, UserProfile};

use crate::app_error::AppResult;

/// First-party session endpoints.
#[async_trait]
pub trait SessionBackend: Send + Sync {
    /// Trade an identity token for a session cookie.
    async fn exchange_identity_token(&self, token: &str) -> AppResult<()>;

    async fn logout(&self) -> AppResult<()>;
}

/// Entitlement reads. Each returns `Ok(None)` when there is no session.
#[async_trait]
pub trait EntitlementSource: Send + Sync {
    async fn current_user(&self) -> AppResult<Option<UserProfile>>;
    async fn trial_status(&self) -> AppResult<Option<TrialStatus>>;
    async fn subscription_status(&self) -> AppResult<Option<SubscriptionStatus>>;
}
