//! Shared data model for the Flow 83 client.
//!
//! This crate provides:
//! - The user profile record and the profile fields that gate access
//! - Trial and subscription status records with their derived flags
//! - The persisted onboarding tour state
//! - Identity token claim peeking and API error codes

mod claims;
mod errors;
mod onboarding;
mod profile;
mod subscription;
mod token;
mod trial;

pub use claims::IdentityClaims;
pub use errors::{ErrorCode, TokenError};
pub use onboarding::OnboardingState;
pub use profile::{ProfileField, UserProfile};
pub use subscription::{DEFAULT_COMMISSION_RATE, Plan, SubscriptionStatus};
pub use token::{peek_identity_claims, token_expires_within};
pub use trial::{TrialFlags, TrialPhase, TrialStatus};
