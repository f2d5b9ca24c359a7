use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Commission taken on participant payments when no plan record exists.
pub const DEFAULT_COMMISSION_RATE: f64 = 0.17;

/// Subscription plans offered to mentors.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum Plan {
    #[default]
    Free,
    Pro,
    Scale,
}

impl Plan {
    pub fn as_str(&self) -> &'static str {
        match self {
            Plan::Free => "free",
            Plan::Pro => "pro",
            Plan::Scale => "scale",
        }
    }

    /// English display name.
    pub fn display_name(&self) -> &'static str {
        match self {
            Plan::Free => "Free",
            Plan::Pro => "Pro",
            Plan::Scale => "Scale",
        }
    }

    /// Hebrew display name.
    pub fn display_name_he(&self) -> &'static str {
        match self {
            Plan::Free => "חינמי",
            Plan::Pro => "פרו",
            Plan::Scale => "סקייל",
        }
    }

    /// Returns true for plans that carry a monthly fee.
    pub fn is_paid(&self) -> bool {
        matches!(self, Plan::Pro | Plan::Scale)
    }
}

impl std::fmt::Display for Plan {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Subscription status as returned by `GET /api/subscription-status`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SubscriptionStatus {
    pub plan: Plan,

    pub plan_name: String,

    pub plan_name_he: String,

    /// Fraction of each participant payment retained by the platform (e.g., 0.17)
    pub commission_rate: f64,

    pub monthly_fee: f64,

    pub is_active: bool,

    #[serde(default)]
    pub plan_changed_at: Option<DateTime<Utc>>,
}

impl SubscriptionStatus {
    /// The free plan shown when the backend has no subscription record.
    pub fn free_default() -> Self {
        Self {
            plan: Plan::Free,
            plan_name: Plan::Free.display_name().to_string(),
            plan_name_he: Plan::Free.display_name_he().to_string(),
            commission_rate: DEFAULT_COMMISSION_RATE,
            monthly_fee: 0.0,
            is_active: true,
            plan_changed_at: None,
        }
    }

    /// Returns true if the mentor is on an active paid plan.
    pub fn has_paid_access(&self) -> bool {
        self.is_active && self.plan.is_paid()
    }
}

impl Default for SubscriptionStatus {
    fn default() -> Self {
        Self::free_default()
    }
}
