use serde::Serialize;

/// App pages the gating policy can send a user to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Route {
    Login,
    Dashboard,
    Profile,
    Pricing,
    JourneyEditor,
}

impl Route {
    pub fn path(&self) -> &'static str {
        match self {
            Route::Login => "/login",
            Route::Dashboard => "/dashboard",
            Route::Profile => "/profile",
            Route::Pricing => "/pricing",
            Route::JourneyEditor => "/journeys/new",
        }
    }

    /// Pages reachable with an incomplete profile or an expired trial.
    ///
    /// These are where the user goes to fix the gate, so gating them would loop.
    pub fn is_remedy(&self) -> bool {
        matches!(self, Route::Login | Route::Profile | Route::Pricing)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum GateReason {
    NotSignedIn,
    AlreadySignedIn,
    IncompleteProfile,
    SubscriptionRequired,
}

/// Navigation the UI layer should perform. The policy only decides.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct NavigationCommand {
    pub to: Route,
    pub reason: GateReason,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Banner {
    TrialEndingSoon { days_remaining: i64 },
    TrialExpired,
}
