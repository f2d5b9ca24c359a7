//! Identity provider held entirely in memory.
//!
//! Used by tests and by embedders that obtain identity tokens elsewhere.

use std::sync::Mutex;
use std::sync::atomic::{AtomicBool, Ordering};

use async_trait::async_trait;
use secrecy::SecretString;
use tokio::sync::watch;

use crate::{
    app_error::{AppError, AppResult},
    application::ports::{IdentityProvider, IdentitySubscription},
    domain::entities::identity::Identity,
};

pub struct InMemoryIdentityProvider {
    state: watch::Sender<Option<Identity>>,
    token: Mutex<Option<String>>,
    fail_tokens: AtomicBool,
}

impl Default for InMemoryIdentityProvider {
    fn default() -> Self {
        Self::new()
    }
}

impl InMemoryIdentityProvider {
    pub fn new() -> Self {
        let (state, _) = watch::channel(None);
        Self {
            state,
            token: Mutex::new(None),
            fail_tokens: AtomicBool::new(false),
        }
    }

    pub fn sign_in(&self, identity: Identity, token: &str) {
        *self.token.lock().unwrap_or_else(|e| e.into_inner()) = Some(token.to_string());
        self.state.send_replace(Some(identity));
    }

    /// Make `id_token` fail as if the provider were unreachable.
    pub fn fail_token_requests(&self, fail: bool) {
        self.fail_tokens.store(fail, Ordering::SeqCst);
    }

    /// Number of live subscriptions.
    pub fn listener_count(&self) -> usize {
        self.state.receiver_count()
    }
}

#[async_trait]
impl IdentityProvider for InMemoryIdentityProvider {
    fn subscribe(&self) -> IdentitySubscription {
        IdentitySubscription::new(self.state.subscribe())
    }

    fn current(&self) -> Option<Identity> {
        self.state.borrow().clone()
    }

    async fn id_token(&self) -> AppResult<Option<SecretString>> {
        if self.fail_tokens.load(Ordering::SeqCst) {
            return Err(AppError::Identity("token endpoint unreachable".into()));
        }
        let token = self.token.lock().unwrap_or_else(|e| e.into_inner()).clone();
        Ok(token.map(SecretString::from))
    }

    async fn sign_out(&self) -> AppResult<()> {
        *self.token.lock().unwrap_or_else(|e| e.into_inner()) = None;
        self.state.send_replace(None);
        Ok(())
    }
}
