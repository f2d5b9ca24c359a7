//! Entitlement and profile gates.
//!
//! Everything here is pure. UI code asks these functions what to show and
//! where to go; it must not re-derive completeness or plan state itself.

use flow83_types::{ProfileField, SubscriptionStatus, TrialFlags, TrialStatus, UserProfile};
use serde::Serialize;

use crate::domain::entities::navigation::{Banner, GateReason, NavigationCommand, Route};

/// Days of trial left at which the "ending soon" banner appears.
pub const TRIAL_ENDING_SOON_DAYS: i64 = 3;

/// Entitlement reads taken together.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct EntitlementSnapshot {
    pub user: Option<UserProfile>,
    pub trial: Option<TrialStatus>,
    pub subscription: Option<SubscriptionStatus>,
}

/// Outcome of evaluating the gates for one page.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct GateDecision {
    pub navigation: Option<NavigationCommand>,
    pub banner: Option<Banner>,
    pub missing_fields: Vec<ProfileField>,
}

impl GateDecision {
    pub fn allows_render(&self) -> bool {
        self.navigation.is_none()
    }
}

pub fn is_profile_complete(user: Option<&UserProfile>) -> bool {
    user.is_some() && missing_profile_fields(user).is_empty()
}

/// Required fields that are still empty, in display order.
pub fn missing_profile_fields(user: Option<&UserProfile>) -> Vec<ProfileField> {
    match user {
        None => ProfileField::REQUIRED.to_vec(),
        Some(profile) => ProfileField::REQUIRED
            .into_iter()
            .filter(|field| field.value_in(profile).is_none())
            .collect(),
    }
}

pub fn trial_flags(trial: Option<&TrialStatus>) -> TrialFlags {
    TrialFlags::from_phase(trial.and_then(|t| t.status))
}

/// Subscription to display, defaulting to the free plan when there is no record.
pub fn effective_subscription(subscription: Option<&SubscriptionStatus>) -> SubscriptionStatus {
    subscription
        .cloned()
        .unwrap_or_else(SubscriptionStatus::free_default)
}

/// Returns true if the mentor may use paid features right now.
pub fn has_paid_access(snapshot: &EntitlementSnapshot) -> bool {
    let flags = trial_flags(snapshot.trial.as_ref());
    flags.is_on_trial
        || flags.has_active_subscription
        || effective_subscription(snapshot.subscription.as_ref()).has_paid_access()
}

/// Trial banner to show, if any.
pub fn trial_banner(snapshot: &EntitlementSnapshot) -> Option<Banner> {
    let trial = snapshot.trial.as_ref()?;
    let flags = trial.flags();

    if flags.is_trial_expired && !has_paid_access(snapshot) {
        return Some(Banner::TrialExpired);
    }
    if flags.is_on_trial && trial.days_remaining <= TRIAL_ENDING_SOON_DAYS {
        return Some(Banner::TrialEndingSoon {
            days_remaining: trial.days_remaining.max(0),
        });
    }
    None
}

/// Decide what happens when the user opens `route`.
///
/// Gates apply in order: sign-in, profile completeness, then subscription.
/// Pages that fix a gate are never redirected by that gate.
pub fn evaluate_gate(snapshot: &EntitlementSnapshot, route: Route) -> GateDecision {
    let missing_fields = missing_profile_fields(snapshot.user.as_ref());
    let banner = trial_banner(snapshot);

    let navigation = match (&snapshot.user, route) {
        (None, Route::Login) => None,
        (None, _) => Some(redirect(Route::Login, GateReason::NotSignedIn)),
        (Some(_), Route::Login) => Some(redirect(Route::Dashboard, GateReason::AlreadySignedIn)),
        (Some(_), route) if route.is_remedy() => None,
        (Some(_), _) if !missing_fields.is_empty() => {
            Some(redirect(Route::Profile, GateReason::IncompleteProfile))
        }
        (Some(_), _) if trial_flags(snapshot.trial.as_ref()).is_trial_expired
            && !has_paid_access(snapshot) =>
        {
            Some(redirect(Route::Pricing, GateReason::SubscriptionRequired))
        }
        _ => None,
    };

    GateDecision {
        navigation,
        banner,
        missing_fields,
    }
}

fn redirect(to: Route, reason: GateReason) -> NavigationCommand {
    NavigationCommand { to, reason }
}
