use chrono::{Duration, Utc};
use flow83_types::{TrialPhase, TrialStatus, UserProfile};

/// A mentor with every required profile field filled in.
pub fn complete_profile() -> UserProfile {
    UserProfile {
        id: "user_1".into(),
        email: Some("maya@example.com".into()),
        first_name: Some("Maya".into()),
        last_name: Some("Levi".into()),
        specialty: Some("Career transitions".into()),
        methodology: Some("Narrative coaching".into()),
        unique_approach: None,
        profile_image_url: None,
    }
}

pub fn trial_with(phase: TrialPhase, days_remaining: i64) -> TrialStatus {
    TrialStatus {
        is_active: phase == TrialPhase::OnTrial,
        days_remaining,
        status: Some(phase),
        trial_ends_at: Some(Utc::now() + Duration::days(days_remaining)),
    }
}
