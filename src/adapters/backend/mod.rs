//! Flow 83 backend reached through the SDK client.

use async_trait::async_trait;
use flow83_sdk::Flow83Client;
use flow83_types::{SubscriptionStatus, TrialStatus, UserProfile};

use crate::{
    app_error::AppResult,
    application::ports::{EntitlementSource, SessionBackend},
};

#[async_trait]
impl SessionBackend for Flow83Client {
    async fn exchange_identity_token(&self, token: &str) -> AppResult<()> {
        Ok(Flow83Client::exchange_identity_token(self, token).await?)
    }

    async fn logout(&self) -> AppResult<()> {
        Ok(Flow83Client::logout(self).await?)
    }
}

#[async_trait]
impl EntitlementSource for Flow83Client {
    async fn current_user(&self) -> AppResult<Option<UserProfile>> {
        Ok(Flow83Client::current_user(self).await?)
    }

    async fn trial_status(&self) -> AppResult<Option<TrialStatus>> {
        Ok(Flow83Client::trial_status(self).await?)
    }

    async fn subscription_status(&self) -> AppResult<Option<SubscriptionStatus>> {
        Ok(Flow83Client::subscription_status(self).await?)
    }
}
