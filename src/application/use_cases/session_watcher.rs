use std::sync::Arc;

use serde::Serialize;
use tokio::{sync::watch, task::JoinHandle};
use tracing::{debug, info, warn};

use crate::{
    application::{
        ports::IdentityProvider,
        use_cases::{entitlements::EntitlementQueries, session_sync::SessionSynchronizer},
    },
    domain::entities::identity::Identity,
};

/// Latest outcome of following the identity provider.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum SyncStatus {
    /// No identity event handled yet
    Pending,
    SignedOut,
    Synced { uid: String },
    /// Token mint or backend exchange failed; UI offers a manual retry
    Failed { uid: String },
}

/// Owns the background task that follows identity changes.
///
/// Dropping the handle aborts the task, which releases the identity
/// listener; results that arrive afterwards are never applied.
pub struct SessionWatcherHandle {
    task: Option<JoinHandle<()>>,
    status: watch::Receiver<SyncStatus>,
}

impl SessionWatcherHandle {
    pub fn status(&self) -> SyncStatus {
        self.status.borrow().clone()
    }

    /// Wait until the status satisfies `done`.
    ///
    /// Returns `None` if the watcher stopped first.
    pub async fn wait_for(&mut self, done: impl FnMut(&SyncStatus) -> bool) -> Option<SyncStatus> {
        self.status.wait_for(done).await.ok().map(|s| s.clone())
    }

    /// Stop the watcher and wait until its listener is released.
    pub async fn shutdown(mut self) {
        if let Some(task) = self.task.take() {
            task.abort();
            let _ = task.await;
        }
        debug!("session watcher stopped");
    }
}

impl Drop for SessionWatcherHandle {
    fn drop(&mut self) {
        if let Some(task) = self.task.take() {
            task.abort();
        }
    }
}

/// Follow `identity` and keep the backend session and entitlement cache in step.
///
/// Every identity change drops cached entitlements, since they belonged to
/// the previous session. Sign-ins then mint a token and sync it.
pub fn spawn_session_watcher(
    identity: Arc<dyn IdentityProvider>,
    synchronizer: Arc<SessionSynchronizer>,
    queries: Arc<EntitlementQueries>,
) -> SessionWatcherHandle {
    let (status_tx, status_rx) = watch::channel(SyncStatus::Pending);
    let mut subscription = identity.subscribe();

    let task = tokio::spawn(async move {
        while let Some(change) = subscription.changed().await {
            queries.invalidate_all();
            let status = match change {
                Some(user) => sync_identity(identity.as_ref(), &synchronizer, user).await,
                None => {
                    info!("identity signed out");
                    SyncStatus::SignedOut
                }
            };
            status_tx.send_replace(status);
        }
        debug!("identity provider closed");
    });

    SessionWatcherHandle {
        task: Some(task),
        status: status_rx,
    }
}

async fn sync_identity(
    identity: &dyn IdentityProvider,
    synchronizer: &SessionSynchronizer,
    user: Identity,
) -> SyncStatus {
    let token = match identity.id_token().await {
        Ok(Some(token)) => token,
        Ok(None) => return SyncStatus::SignedOut,
        Err(err) => {
            warn!(error = %err, uid = %user.uid, "could not mint identity token");
            return SyncStatus::Failed { uid: user.uid };
        }
    };

    if synchronizer.sync(&token).await {
        SyncStatus::Synced { uid: user.uid }
    } else {
        SyncStatus::Failed { uid: user.uid }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::adapters::identity::InMemoryIdentityProvider;
    use crate::application::use_cases::entitlements::CacheTimings;
    use crate::application::gating::evaluate_gate;
    use crate::domain::entities::navigation::Route;
    use crate::test_utils::{FakeBackend, complete_profile, trial_with};
    use flow83_types::TrialPhase;

    struct Harness {
        identity: Arc<InMemoryIdentityProvider>,
        backend: Arc<FakeBackend>,
        queries: Arc<EntitlementQueries>,
        handle: SessionWatcherHandle,
    }

    fn harness() -> Harness {
        let identity = Arc::new(InMemoryIdentityProvider::new());
        let backend = Arc::new(FakeBackend::signed_out());
        let queries = Arc::new(EntitlementQueries::new(
            backend.clone(),
            CacheTimings::default(),
        ));
        let sync = Arc::new(SessionSynchronizer::new(backend.clone(), queries.clone()));
        let handle = spawn_session_watcher(identity.clone(), sync, queries.clone());
        Harness {
            identity,
            backend,
            queries,
            handle,
        }
    }

    fn mentor() -> Identity {
        Identity {
            uid: "uid_7".into(),
            email: Some("mentor@example.com".into()),
            display_name: Some("Maya".into()),
        }
    }

    #[tokio::test]
    async fn test_initial_signed_out_state_is_reported() {
        let mut h = harness();

        let status = h.handle.wait_for(|s| *s != SyncStatus::Pending).await;

        assert_eq!(status, Some(SyncStatus::SignedOut));
        assert!(h.backend.exchanges().is_empty());
    }

    #[tokio::test]
    async fn test_sign_in_syncs_session() {
        let mut h = harness();
        h.handle.wait_for(|s| *s == SyncStatus::SignedOut).await;
        h.backend.accept_token("tok-1", complete_profile());

        h.identity.sign_in(mentor(), "tok-1");
        let status = h
            .handle
            .wait_for(|s| matches!(s, SyncStatus::Synced { .. }))
            .await;

        assert_eq!(status, Some(SyncStatus::Synced { uid: "uid_7".into() }));
        assert!(h.backend.has_session());
        assert!(h.queries.current_user().await.unwrap().is_some());
    }

    #[tokio::test]
    async fn test_rejected_token_reports_failure() {
        let mut h = harness();
        h.handle.wait_for(|s| *s == SyncStatus::SignedOut).await;

        h.identity.sign_in(mentor(), "unknown-token");
        let status = h
            .handle
            .wait_for(|s| matches!(s, SyncStatus::Failed { .. }))
            .await;

        assert_eq!(status, Some(SyncStatus::Failed { uid: "uid_7".into() }));
        assert!(!h.backend.has_session());
    }

    #[tokio::test]
    async fn test_token_mint_failure_reports_failure() {
        let mut h = harness();
        h.handle.wait_for(|s| *s == SyncStatus::SignedOut).await;
        h.identity.fail_token_requests(true);

        h.identity.sign_in(mentor(), "tok-1");
        let status = h
            .handle
            .wait_for(|s| matches!(s, SyncStatus::Failed { .. }))
            .await;

        assert!(status.is_some());
        assert!(h.backend.exchanges().is_empty());
    }

    #[tokio::test]
    async fn test_reads_during_exchange_are_dropped_after_sync() {
        let mut h = harness();
        h.handle.wait_for(|s| *s == SyncStatus::SignedOut).await;
        h.backend.accept_token("tok-1", complete_profile());
        h.backend.set_trial(Some(trial_with(TrialPhase::TrialExpired, 0)));
        let release = h.backend.hold_exchanges();

        h.identity.sign_in(mentor(), "tok-1");
        while h.backend.exchanges().is_empty() {
            tokio::task::yield_now().await;
        }
        // No session yet, so the trial read comes back empty
        assert!(h.queries.trial_status().await.unwrap().is_none());

        release.notify_one();
        h.handle
            .wait_for(|s| matches!(s, SyncStatus::Synced { .. }))
            .await;

        let snapshot = h.queries.snapshot().await.unwrap();
        let decision = evaluate_gate(&snapshot, Route::Dashboard);
        assert_eq!(decision.navigation.map(|n| n.to), Some(Route::Pricing));
    }

    #[tokio::test]
    async fn test_sign_out_invalidates_entitlements() {
        let mut h = harness();
        h.backend.accept_token("tok-1", complete_profile());
        h.identity.sign_in(mentor(), "tok-1");
        h.handle
            .wait_for(|s| matches!(s, SyncStatus::Synced { .. }))
            .await;
        h.queries.snapshot().await.unwrap();

        h.identity.sign_out().await.unwrap();
        h.handle.wait_for(|s| *s == SyncStatus::SignedOut).await;

        assert!(h.queries.user_state().loaded().is_none());
        assert!(h.queries.trial_state().loaded().is_none());
    }

    #[tokio::test]
    async fn test_shutdown_releases_listener() {
        let h = harness();
        assert_eq!(h.identity.listener_count(), 1);

        h.handle.shutdown().await;

        assert_eq!(h.identity.listener_count(), 0);
        h.identity.sign_in(mentor(), "tok-1");
        tokio::task::yield_now().await;
        assert!(h.backend.exchanges().is_empty());
    }
}
