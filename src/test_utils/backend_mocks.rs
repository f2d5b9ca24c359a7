//! In-memory backend for session and entitlement tests.

use async_trait::async_trait;
use flow83_types::{SubscriptionStatus, TrialStatus, UserProfile};
use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use tokio::sync::Notify;

use crate::{
    app_error::{AppError, AppResult},
    application::ports::{EntitlementSource, SessionBackend},
};

#[derive(Default)]
struct BackendState {
    session: Option<UserProfile>,
    trial: Option<TrialStatus>,
    subscription: Option<SubscriptionStatus>,
    accepted_tokens: HashMap<String, UserProfile>,
    exchanges: Vec<String>,
    read_failure: Option<u16>,
    exchange_failure: Option<u16>,
    exchange_gate: Option<Arc<Notify>>,
}

/// Fake backend holding at most one session.
///
/// Without a session every read returns `Ok(None)`, the same as a 401.
#[derive(Default)]
pub struct FakeBackend {
    state: Mutex<BackendState>,
    user_reads: AtomicUsize,
    trial_reads: AtomicUsize,
    subscription_reads: AtomicUsize,
}

impl FakeBackend {
    pub fn signed_out() -> Self {
        Self::default()
    }

    pub fn signed_in(profile: UserProfile) -> Self {
        let backend = Self::default();
        backend.state.lock().unwrap().session = Some(profile);
        backend
    }

    /// Exchanging `token` will open a session for `profile`.
    pub fn accept_token(&self, token: &str, profile: UserProfile) {
        self.state
            .lock()
            .unwrap()
            .accepted_tokens
            .insert(token.to_string(), profile);
    }

    pub fn set_trial(&self, trial: Option<TrialStatus>) {
        self.state.lock().unwrap().trial = trial;
    }

    pub fn set_subscription(&self, subscription: Option<SubscriptionStatus>) {
        self.state.lock().unwrap().subscription = subscription;
    }

    pub fn fail_reads_with(&self, status: u16) {
        self.state.lock().unwrap().read_failure = Some(status);
    }

    pub fn fail_exchanges_with(&self, status: u16) {
        self.state.lock().unwrap().exchange_failure = Some(status);
    }

    /// Park every exchange after it is recorded until the returned gate is notified.
    pub fn hold_exchanges(&self) -> Arc<Notify> {
        let gate = Arc::new(Notify::new());
        self.state.lock().unwrap().exchange_gate = Some(gate.clone());
        gate
    }

    pub fn has_session(&self) -> bool {
        self.state.lock().unwrap().session.is_some()
    }

    /// Every token passed to the exchange endpoint, accepted or not.
    pub fn exchanges(&self) -> Vec<String> {
        self.state.lock().unwrap().exchanges.clone()
    }

    pub fn user_reads(&self) -> usize {
        self.user_reads.load(Ordering::SeqCst)
    }

    pub fn trial_reads(&self) -> usize {
        self.trial_reads.load(Ordering::SeqCst)
    }

    pub fn subscription_reads(&self) -> usize {
        self.subscription_reads.load(Ordering::SeqCst)
    }

    fn read<T>(
        &self,
        counter: &AtomicUsize,
        pick: impl FnOnce(&BackendState) -> Option<T>,
    ) -> AppResult<Option<T>> {
        counter.fetch_add(1, Ordering::SeqCst);
        let state = self.state.lock().unwrap();
        if let Some(status) = state.read_failure {
            return Err(http_error(status));
        }
        if state.session.is_none() {
            return Ok(None);
        }
        Ok(pick(&state))
    }
}

fn http_error(status: u16) -> AppError {
    AppError::Backend {
        status,
        status_text: format!("HTTP {}", status),
    }
}

#[async_trait]
impl SessionBackend for FakeBackend {
    async fn exchange_identity_token(&self, token: &str) -> AppResult<()> {
        let gate = {
            let mut state = self.state.lock().unwrap();
            state.exchanges.push(token.to_string());
            state.exchange_gate.clone()
        };
        if let Some(gate) = gate {
            gate.notified().await;
        }

        let mut state = self.state.lock().unwrap();
        if let Some(status) = state.exchange_failure {
            return Err(http_error(status));
        }
        match state.accepted_tokens.get(token).cloned() {
            Some(profile) => {
                state.session = Some(profile);
                Ok(())
            }
            None => Err(http_error(401)),
        }
    }

    async fn logout(&self) -> AppResult<()> {
        self.state.lock().unwrap().session = None;
        Ok(())
    }
}

#[async_trait]
impl EntitlementSource for FakeBackend {
    async fn current_user(&self) -> AppResult<Option<UserProfile>> {
        self.read(&self.user_reads, |s| s.session.clone())
    }

    async fn trial_status(&self) -> AppResult<Option<TrialStatus>> {
        self.read(&self.trial_reads, |s| s.trial.clone())
    }

    async fn subscription_status(&self) -> AppResult<Option<SubscriptionStatus>> {
        self.read(&self.subscription_reads, |s| s.subscription.clone())
    }
}
