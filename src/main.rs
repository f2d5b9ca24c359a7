use std::env;

use dotenvy::dotenv;
use secrecy::SecretString;
use serde_json::json;
use tracing::{info, warn};

use flow83::{
    application::{
        gating::{effective_subscription, evaluate_gate},
        ports::IdentityProvider,
        use_cases::session_watcher::SyncStatus,
    },
    domain::entities::navigation::Route,
    infra::{
        config::AppConfig,
        setup::{init_app_state, init_tracing},
    },
};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenv().ok();

    let config = AppConfig::from_env();
    init_tracing(&config.log_file);

    let app_state = init_app_state(config)?;
    let mut watcher = app_state.spawn_session_watcher();

    if let (Ok(email), Ok(password)) = (env::var("FLOW83_EMAIL"), env::var("FLOW83_PASSWORD")) {
        app_state
            .identity
            .sign_in_with_password(&email, &SecretString::from(password))
            .await?;
    }

    // The initial signed-out event can land before the sign-in event
    let signed_in = app_state.identity.clone();
    let status = watcher
        .wait_for(|s| match s {
            SyncStatus::Pending => false,
            SyncStatus::SignedOut => signed_in.current().is_none(),
            _ => true,
        })
        .await
        .unwrap_or(SyncStatus::Pending);

    if matches!(status, SyncStatus::Failed { .. }) {
        warn!("session sync failed, entitlements reflect the previous session");
    }

    let snapshot = app_state.queries.snapshot().await?;
    let decision = evaluate_gate(&snapshot, Route::Dashboard);
    let tour = app_state.onboarding_tour()?;

    let report = json!({
        "session": status,
        "redirect": decision.navigation.map(|n| n.to.path()),
        "dashboard": decision,
        "subscription": effective_subscription(snapshot.subscription.as_ref()),
        "trial": snapshot.trial,
        "onboarding": tour.state(),
    });
    println!("{}", serde_json::to_string_pretty(&report)?);

    watcher.shutdown().await;
    info!("done");

    Ok(())
}
