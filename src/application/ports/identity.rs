use async_trait::async_trait;
use secrecy::SecretString;
use tokio::sync::watch;

use crate::{app_error::AppResult, domain::entities::identity::Identity};

/// Third-party identity provider.
#[async_trait]
pub trait IdentityProvider: Send + Sync {
    /// Register for sign-in state changes.
    ///
    /// The first `changed()` on the returned handle yields the current state.
    /// Dropping the handle releases the listener.
    fn subscribe(&self) -> IdentitySubscription;

    fn current(&self) -> Option<Identity>;

    /// Short-lived token for the signed-in user, or `None` when signed out.
    ///
    /// Network failures are returned as errors and never retried here.
    async fn id_token(&self) -> AppResult<Option<SecretString>>;

    async fn sign_out(&self) -> AppResult<()>;
}

/// Disposable listener handle returned by [`IdentityProvider::subscribe`].
#[derive(Debug)]
pub struct IdentitySubscription {
    rx: watch::Receiver<Option<Identity>>,
}

impl IdentitySubscription {
    pub fn new(mut rx: watch::Receiver<Option<Identity>>) -> Self {
        rx.mark_changed();
        Self { rx }
    }

    /// Wait for the next sign-in state.
    ///
    /// Returns `None` once the provider has been dropped.
    pub async fn changed(&mut self) -> Option<Option<Identity>> {
        self.rx.changed().await.ok()?;
        Some(self.rx.borrow_and_update().clone())
    }

    pub fn current(&self) -> Option<Identity> {
        self.rx.borrow().clone()
    }

    /// Release the listener. Same as dropping the handle.
    pub fn unsubscribe(self) {}
}
