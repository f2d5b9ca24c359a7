use std::{sync::Arc, time::Duration};

use flow83_types::{SubscriptionStatus, TrialStatus, UserProfile};
use tracing::instrument;

use crate::{
    app_error::AppResult,
    application::{
        gating::EntitlementSnapshot,
        ports::EntitlementSource,
        query_cache::{QueryKey, QuerySlot, QueryState},
    },
};

/// How long each cached query is considered fresh.
#[derive(Debug, Clone, Copy)]
pub struct CacheTimings {
    pub user: Duration,
    pub entitlements: Duration,
}

impl Default for CacheTimings {
    fn default() -> Self {
        Self {
            user: Duration::from_secs(30),
            entitlements: Duration::from_secs(5 * 60),
        }
    }
}

/// Cached reads of the current user, trial status and subscription status.
pub struct EntitlementQueries {
    source: Arc<dyn EntitlementSource>,
    user: QuerySlot<Option<UserProfile>>,
    trial: QuerySlot<Option<TrialStatus>>,
    subscription: QuerySlot<Option<SubscriptionStatus>>,
}

impl EntitlementQueries {
    pub fn new(source: Arc<dyn EntitlementSource>, timings: CacheTimings) -> Self {
        Self {
            source,
            user: QuerySlot::new(QueryKey::CurrentUser, timings.user),
            trial: QuerySlot::new(QueryKey::TrialStatus, timings.entitlements),
            subscription: QuerySlot::new(QueryKey::SubscriptionStatus, timings.entitlements),
        }
    }

    #[instrument(skip(self))]
    pub async fn current_user(&self) -> AppResult<Option<UserProfile>> {
        self.user.get_or_fetch(|| self.source.current_user()).await
    }

    #[instrument(skip(self))]
    pub async fn trial_status(&self) -> AppResult<Option<TrialStatus>> {
        self.trial.get_or_fetch(|| self.source.trial_status()).await
    }

    #[instrument(skip(self))]
    pub async fn subscription_status(&self) -> AppResult<Option<SubscriptionStatus>> {
        self.subscription
            .get_or_fetch(|| self.source.subscription_status())
            .await
    }

    pub async fn refresh_current_user(&self) -> AppResult<Option<UserProfile>> {
        self.user.refetch(self.source.current_user()).await
    }

    pub async fn refresh_trial_status(&self) -> AppResult<Option<TrialStatus>> {
        self.trial.refetch(self.source.trial_status()).await
    }

    pub async fn refresh_subscription_status(&self) -> AppResult<Option<SubscriptionStatus>> {
        self.subscription
            .refetch(self.source.subscription_status())
            .await
    }

    /// All three reads, served from cache where fresh.
    pub async fn snapshot(&self) -> AppResult<EntitlementSnapshot> {
        let (user, trial, subscription) = tokio::try_join!(
            self.current_user(),
            self.trial_status(),
            self.subscription_status()
        )?;
        Ok(EntitlementSnapshot {
            user,
            trial,
            subscription,
        })
    }

    /// User-triggered re-check: bypasses freshness for all three reads.
    #[instrument(skip(self))]
    pub async fn recheck(&self) -> AppResult<EntitlementSnapshot> {
        let (user, trial, subscription) = tokio::try_join!(
            self.refresh_current_user(),
            self.refresh_trial_status(),
            self.refresh_subscription_status()
        )?;
        Ok(EntitlementSnapshot {
            user,
            trial,
            subscription,
        })
    }

    pub fn user_state(&self) -> QueryState<Option<UserProfile>> {
        self.user.state()
    }

    pub fn trial_state(&self) -> QueryState<Option<TrialStatus>> {
        self.trial.state()
    }

    pub fn subscription_state(&self) -> QueryState<Option<SubscriptionStatus>> {
        self.subscription.state()
    }

    pub fn invalidate(&self, key: QueryKey) {
        match key {
            QueryKey::CurrentUser => self.user.invalidate(),
            QueryKey::TrialStatus => self.trial.invalidate(),
            QueryKey::SubscriptionStatus => self.subscription.invalidate(),
        }
    }

    pub fn invalidate_all(&self) {
        self.user.invalidate();
        self.trial.invalidate();
        self.subscription.invalidate();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::app_error::AppError;
    use crate::application::gating::{effective_subscription, has_paid_access};
    use crate::test_utils::{FakeBackend, complete_profile, trial_with};
    use flow83_types::{Plan, TrialPhase};

    fn queries(backend: &Arc<FakeBackend>) -> EntitlementQueries {
        EntitlementQueries::new(backend.clone(), CacheTimings::default())
    }

    #[tokio::test(start_paused = true)]
    async fn test_user_staleness_is_thirty_seconds() {
        let backend = Arc::new(FakeBackend::signed_in(complete_profile()));
        let q = queries(&backend);

        q.current_user().await.unwrap();
        tokio::time::advance(Duration::from_secs(29)).await;
        q.current_user().await.unwrap();
        assert_eq!(backend.user_reads(), 1);

        tokio::time::advance(Duration::from_secs(2)).await;
        q.current_user().await.unwrap();
        assert_eq!(backend.user_reads(), 2);
    }

    #[tokio::test(start_paused = true)]
    async fn test_trial_staleness_is_five_minutes() {
        let backend = Arc::new(FakeBackend::signed_in(complete_profile()));
        backend.set_trial(Some(trial_with(TrialPhase::OnTrial, 6)));
        let q = queries(&backend);

        q.trial_status().await.unwrap();
        tokio::time::advance(Duration::from_secs(4 * 60)).await;
        q.trial_status().await.unwrap();
        assert_eq!(backend.trial_reads(), 1);

        tokio::time::advance(Duration::from_secs(61)).await;
        q.trial_status().await.unwrap();
        assert_eq!(backend.trial_reads(), 2);
    }

    #[tokio::test]
    async fn test_no_session_is_absent_not_error() {
        let backend = Arc::new(FakeBackend::signed_out());
        let q = queries(&backend);

        let snapshot = q.snapshot().await.unwrap();

        assert!(snapshot.user.is_none());
        assert!(snapshot.trial.is_none());
        assert!(snapshot.subscription.is_none());
        assert_eq!(q.user_state(), QueryState::Loaded(None));
    }

    #[tokio::test]
    async fn test_server_error_propagates() {
        let backend = Arc::new(FakeBackend::signed_in(complete_profile()));
        backend.fail_reads_with(500);
        let q = queries(&backend);

        let result = q.subscription_status().await;

        assert!(matches!(result, Err(AppError::Backend { status: 500, .. })));
        assert_eq!(q.subscription_state(), QueryState::Idle);
    }

    #[tokio::test]
    async fn test_invalidate_only_touches_one_query() {
        let backend = Arc::new(FakeBackend::signed_in(complete_profile()));
        let q = queries(&backend);
        q.snapshot().await.unwrap();

        q.invalidate(QueryKey::CurrentUser);
        q.snapshot().await.unwrap();

        assert_eq!(backend.user_reads(), 2);
        assert_eq!(backend.trial_reads(), 1);
        assert_eq!(backend.subscription_reads(), 1);
    }

    #[tokio::test]
    async fn test_recheck_bypasses_cache() {
        let backend = Arc::new(FakeBackend::signed_in(complete_profile()));
        let q = queries(&backend);
        q.snapshot().await.unwrap();

        backend.set_trial(Some(trial_with(TrialPhase::TrialExpired, 0)));
        let snapshot = q.recheck().await.unwrap();

        assert_eq!(
            snapshot.trial.and_then(|t| t.status),
            Some(TrialPhase::TrialExpired)
        );
        assert_eq!(backend.trial_reads(), 2);
    }

    #[tokio::test]
    async fn test_paid_subscription_record_unlocks_expired_trial() {
        let backend = Arc::new(FakeBackend::signed_in(complete_profile()));
        backend.set_trial(Some(trial_with(TrialPhase::TrialExpired, 0)));
        backend.set_subscription(Some(SubscriptionStatus {
            plan: Plan::Pro,
            plan_name: "Pro".into(),
            plan_name_he: "פרו".into(),
            commission_rate: 0.1,
            monthly_fee: 49.0,
            is_active: true,
            plan_changed_at: None,
        }));
        let q = queries(&backend);

        let subscription = q.subscription_status().await.unwrap();
        let effective = effective_subscription(subscription.as_ref());
        assert_eq!(effective.plan, Plan::Pro);
        assert_eq!(effective.commission_rate, 0.1);

        let snapshot = q.snapshot().await.unwrap();
        assert!(has_paid_access(&snapshot));
        assert_eq!(backend.subscription_reads(), 1);
    }
}
