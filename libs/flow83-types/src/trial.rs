use chrono::{DateTime, Utc};
use serde::{Deserialize, Deserializer, Serialize};

/// Trial lifecycle phase reported by `GET /api/trial-status`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TrialPhase {
    OnTrial,
    TrialExpired,
    /// Trial converted into a paid subscription
    Active,
}

impl TrialPhase {
    pub fn as_str(&self) -> &'static str {
        match self {
            TrialPhase::OnTrial => "on_trial",
            TrialPhase::TrialExpired => "trial_expired",
            TrialPhase::Active => "active",
        }
    }

    fn parse(s: &str) -> Option<Self> {
        match s {
            "on_trial" => Some(TrialPhase::OnTrial),
            "trial_expired" => Some(TrialPhase::TrialExpired),
            "active" => Some(TrialPhase::Active),
            _ => None,
        }
    }
}

impl std::fmt::Display for TrialPhase {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Trial status record.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TrialStatus {
    #[serde(default)]
    pub is_active: bool,

    #[serde(default)]
    pub days_remaining: i64,

    /// `None` when the backend reports null or a phase this client does not know.
    #[serde(default, deserialize_with = "lenient_phase")]
    pub status: Option<TrialPhase>,

    #[serde(default)]
    pub trial_ends_at: Option<DateTime<Utc>>,
}

impl TrialStatus {
    pub fn flags(&self) -> TrialFlags {
        TrialFlags::from_phase(self.status)
    }
}

/// Booleans derived from a [`TrialPhase`].
///
/// At most one flag is ever set. Unknown or missing phases set none.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TrialFlags {
    pub is_on_trial: bool,
    pub is_trial_expired: bool,
    pub has_active_subscription: bool,
}

impl TrialFlags {
    pub fn from_phase(phase: Option<TrialPhase>) -> Self {
        match phase {
            Some(TrialPhase::OnTrial) => Self {
                is_on_trial: true,
                ..Self::default()
            },
            Some(TrialPhase::TrialExpired) => Self {
                is_trial_expired: true,
                ..Self::default()
            },
            Some(TrialPhase::Active) => Self {
                has_active_subscription: true,
                ..Self::default()
            },
            None => Self::default(),
        }
    }
}

fn lenient_phase<'de, D>(deserializer: D) -> Result<Option<TrialPhase>, D::Error>
where
    D: Deserializer<'de>,
{
    let raw: Option<String> = Option::deserialize(deserializer)?;
    Ok(raw.as_deref().and_then(TrialPhase::parse))
}
