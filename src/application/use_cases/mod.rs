pub mod entitlements;
pub mod install_prompt;
pub mod onboarding_tour;
pub mod preference_capture;
pub mod session_sync;
pub mod session_watcher;
