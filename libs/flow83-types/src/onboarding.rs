use serde::{Deserialize, Serialize};

/// Persisted state of the product tour.
///
/// Stored as JSON under a fixed key so a returning user does not repeat a
/// tour they already finished or skipped.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OnboardingState {
    /// Tour overlay is currently showing
    pub is_active: bool,

    /// Zero-based index of the step on screen
    pub current_step: usize,

    /// Tour was finished or skipped
    pub is_completed: bool,

    /// Tour has been started at least once
    pub has_seen_onboarding: bool,
}
