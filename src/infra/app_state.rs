use std::sync::Arc;

use flow83_sdk::Flow83Client;

use crate::{
    adapters::identity::FirebaseIdentityProvider,
    app_error::AppResult,
    application::{
        ports::KeyValueStore,
        use_cases::{
            entitlements::EntitlementQueries,
            install_prompt::InstallPromptDismissals,
            onboarding_tour::OnboardingTour,
            session_sync::{AuthUseCases, SessionSynchronizer},
            session_watcher::{SessionWatcherHandle, spawn_session_watcher},
        },
    },
    domain::entities::steps::MENTOR_TOUR_STEPS,
    infra::config::AppConfig,
};

/// Everything a front end needs, built once at startup.
#[derive(Clone)]
pub struct AppState {
    pub config: Arc<AppConfig>,
    pub identity: Arc<FirebaseIdentityProvider>,
    pub backend: Arc<Flow83Client>,
    pub store: Arc<dyn KeyValueStore>,
    pub queries: Arc<EntitlementQueries>,
    pub synchronizer: Arc<SessionSynchronizer>,
    pub auth_use_cases: Arc<AuthUseCases>,
}

impl AppState {
    /// Start following the identity provider.
    ///
    /// Keep the handle alive for as long as the session should stay in sync.
    pub fn spawn_session_watcher(&self) -> SessionWatcherHandle {
        spawn_session_watcher(
            self.identity.clone(),
            self.synchronizer.clone(),
            self.queries.clone(),
        )
    }

    pub fn onboarding_tour(&self) -> AppResult<OnboardingTour> {
        OnboardingTour::load(self.store.clone(), MENTOR_TOUR_STEPS.to_vec())
    }

    pub fn install_prompts(&self) -> InstallPromptDismissals {
        InstallPromptDismissals::new(self.store.clone())
    }
}
