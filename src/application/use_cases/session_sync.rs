use std::sync::Arc;

use secrecy::{ExposeSecret, SecretString};
use tracing::{info, instrument, warn};

use crate::{
    app_error::AppResult,
    application::{
        ports::{IdentityProvider, SessionBackend},
        use_cases::entitlements::EntitlementQueries,
    },
};

/// Keeps the first-party session in step with the identity provider.
#[derive(Clone)]
pub struct SessionSynchronizer {
    backend: Arc<dyn SessionBackend>,
    queries: Arc<EntitlementQueries>,
}

impl SessionSynchronizer {
    pub fn new(backend: Arc<dyn SessionBackend>, queries: Arc<EntitlementQueries>) -> Self {
        Self { backend, queries }
    }

    /// Exchange `token` for a session cookie.
    ///
    /// Never fails: any error is logged and reported as `false`, and the
    /// previous session is left as it was. Safe to call on every identity event.
    ///
    /// On success every cached query is dropped. Reads answered while the
    /// exchange was in flight saw no session and must not outlive it.
    #[instrument(skip_all)]
    pub async fn sync(&self, token: &SecretString) -> bool {
        match self
            .backend
            .exchange_identity_token(token.expose_secret())
            .await
        {
            Ok(()) => {
                self.queries.invalidate_all();
                info!("first-party session synced");
                true
            }
            Err(err) => {
                warn!(error = %err, "session sync failed");
                false
            }
        }
    }
}

/// Sign-in and sign-out flows that span the provider and the backend.
#[derive(Clone)]
pub struct AuthUseCases {
    identity: Arc<dyn IdentityProvider>,
    backend: Arc<dyn SessionBackend>,
    synchronizer: Arc<SessionSynchronizer>,
    queries: Arc<EntitlementQueries>,
}

impl AuthUseCases {
    pub fn new(
        identity: Arc<dyn IdentityProvider>,
        backend: Arc<dyn SessionBackend>,
        synchronizer: Arc<SessionSynchronizer>,
        queries: Arc<EntitlementQueries>,
    ) -> Self {
        Self {
            identity,
            backend,
            synchronizer,
            queries,
        }
    }

    /// Mint a fresh token and sync it now, outside the identity listener.
    ///
    /// Returns `Ok(false)` when signed out or when the backend refused.
    #[instrument(skip(self))]
    pub async fn resync(&self) -> AppResult<bool> {
        match self.identity.id_token().await? {
            Some(token) => Ok(self.synchronizer.sync(&token).await),
            None => Ok(false),
        }
    }

    /// Sign out at the provider and the backend, then drop cached entitlements.
    ///
    /// Local state is cleared even when a remote call fails; the first
    /// failure is returned afterwards.
    #[instrument(skip(self))]
    pub async fn sign_out(&self) -> AppResult<()> {
        let provider = self.identity.sign_out().await;
        if let Err(err) = &provider {
            warn!(error = %err, "identity provider sign-out failed");
        }

        let backend = self.backend.logout().await;
        if let Err(err) = &backend {
            warn!(error = %err, "backend logout failed");
        }

        self.queries.invalidate_all();
        info!("signed out");

        provider.and(backend)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::adapters::identity::InMemoryIdentityProvider;
    use crate::application::query_cache::QueryState;
    use crate::application::use_cases::entitlements::CacheTimings;
    use crate::domain::entities::identity::Identity;
    use crate::test_utils::{FakeBackend, complete_profile, trial_with};
    use flow83_types::TrialPhase;

    fn setup(backend: &Arc<FakeBackend>) -> (Arc<EntitlementQueries>, SessionSynchronizer) {
        let queries = Arc::new(EntitlementQueries::new(
            backend.clone(),
            CacheTimings::default(),
        ));
        let sync = SessionSynchronizer::new(backend.clone(), queries.clone());
        (queries, sync)
    }

    fn token(raw: &str) -> SecretString {
        SecretString::from(raw.to_string())
    }

    #[tokio::test]
    async fn test_sync_success_drops_reads_made_without_session() {
        let backend = Arc::new(FakeBackend::signed_out());
        let (queries, sync) = setup(&backend);
        assert!(queries.current_user().await.unwrap().is_none());
        assert!(queries.trial_status().await.unwrap().is_none());

        backend.accept_token("tok", complete_profile());
        backend.set_trial(Some(trial_with(TrialPhase::TrialExpired, 0)));
        assert!(sync.sync(&token("tok")).await);

        assert_eq!(queries.user_state(), QueryState::Idle);
        assert_eq!(queries.trial_state(), QueryState::Idle);
        assert_eq!(queries.subscription_state(), QueryState::Idle);
        assert!(queries.current_user().await.unwrap().is_some());
        assert_eq!(
            queries.trial_status().await.unwrap().and_then(|t| t.status),
            Some(TrialPhase::TrialExpired)
        );
        assert_eq!(backend.exchanges(), vec!["tok".to_string()]);
    }

    #[tokio::test]
    async fn test_sync_failure_returns_false_and_keeps_session() {
        let backend = Arc::new(FakeBackend::signed_in(complete_profile()));
        backend.fail_exchanges_with(502);
        let (queries, sync) = setup(&backend);
        let before = queries.current_user().await.unwrap();

        assert!(!sync.sync(&token("tok")).await);

        assert!(backend.has_session());
        assert_eq!(queries.user_state(), QueryState::Loaded(before));
    }

    #[tokio::test]
    async fn test_sync_is_idempotent() {
        let backend = Arc::new(FakeBackend::signed_out());
        backend.accept_token("tok", complete_profile());
        let (queries, sync) = setup(&backend);

        assert!(sync.sync(&token("tok")).await);
        let first = queries.current_user().await.unwrap();
        assert!(sync.sync(&token("tok")).await);
        let second = queries.current_user().await.unwrap();

        assert_eq!(first, second);
        assert!(backend.has_session());
    }

    #[tokio::test]
    async fn test_sign_out_clears_everything() {
        let backend = Arc::new(FakeBackend::signed_in(complete_profile()));
        let (queries, sync) = setup(&backend);
        let identity = Arc::new(InMemoryIdentityProvider::new());
        identity.sign_in(
            Identity {
                uid: "uid_1".into(),
                email: None,
                display_name: None,
            },
            "tok",
        );
        let auth = AuthUseCases::new(identity.clone(), backend.clone(), Arc::new(sync), queries.clone());
        queries.snapshot().await.unwrap();

        auth.sign_out().await.unwrap();

        assert!(identity.current().is_none());
        assert!(!backend.has_session());
        assert_eq!(queries.user_state(), QueryState::Idle);
        assert_eq!(queries.trial_state(), QueryState::Idle);
        assert_eq!(queries.subscription_state(), QueryState::Idle);
    }

    #[tokio::test]
    async fn test_resync_when_signed_out() {
        let backend = Arc::new(FakeBackend::signed_out());
        let (queries, sync) = setup(&backend);
        let identity = Arc::new(InMemoryIdentityProvider::new());
        let auth = AuthUseCases::new(identity, backend.clone(), Arc::new(sync), queries);

        assert!(!auth.resync().await.unwrap());
        assert!(backend.exchanges().is_empty());
    }
}
