use crate::{
    adapters::{
        identity::{FirebaseEndpoints, FirebaseIdentityProvider},
        storage::FileKeyValueStore,
    },
    application::use_cases::{
        entitlements::EntitlementQueries,
        session_sync::{AuthUseCases, SessionSynchronizer},
    },
    infra::{
        app_state::AppState,
        config::AppConfig,
        http_client::try_build_client,
    },
};
use flow83_sdk::{Flow83Client, Flow83Config};
use std::fs::File;
use std::sync::Arc;
use tracing::info;
use tracing_subscriber::{EnvFilter, fmt, layer::SubscriberExt, util::SubscriberInitExt};

pub fn init_app_state(config: AppConfig) -> anyhow::Result<AppState> {
    let backend = Arc::new(Flow83Client::new(Flow83Config {
        base_url: config.api_url.clone(),
        request_timeout: Some(config.http_timeout),
    })?);

    let identity = Arc::new(FirebaseIdentityProvider::new(
        try_build_client(config.http_timeout)?,
        config.firebase_api_key.clone(),
        FirebaseEndpoints::default(),
    ));

    let store = Arc::new(FileKeyValueStore::open(&config.storage_path)?);

    let queries = Arc::new(EntitlementQueries::new(
        backend.clone(),
        config.cache_timings,
    ));
    let synchronizer = Arc::new(SessionSynchronizer::new(backend.clone(), queries.clone()));
    let auth_use_cases = AuthUseCases::new(
        identity.clone(),
        backend.clone(),
        synchronizer.clone(),
        queries.clone(),
    );

    info!(api_url = %config.api_url, storage = %config.storage_path.display(), "app state ready");

    Ok(AppState {
        config: Arc::new(config),
        identity,
        backend,
        store,
        queries,
        synchronizer,
        auth_use_cases: Arc::new(auth_use_cases),
    })
}

pub fn init_tracing(log_file: &str) {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| "flow83=debug".into());

    // Console (pretty logs)
    let console_layer = fmt::layer().with_target(false).with_level(true).pretty();

    // File (structured JSON logs); console only when the file cannot be created
    let json_layer = File::create(log_file).ok().map(|file| {
        fmt::layer()
            .json()
            .with_writer(file)
            .with_current_span(true)
            .with_span_list(true)
    });

    tracing_subscriber::registry()
        .with(filter)
        .with(console_layer)
        .with(json_layer)
        .try_init()
        .ok();
}
