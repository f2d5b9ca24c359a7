//! Rust client for the Flow 83 backend.
//!
//! This SDK talks to the session and entitlement endpoints a Flow 83 client
//! needs to keep its first-party session in step with the identity provider.
//!
//! # Features
//!
//! - **Session exchange** - Trade an identity provider token for a session cookie
//! - **Entitlement reads** - Current user, trial status and subscription status,
//!   with 401 mapped to "no record"
//! - **Logout** - End the first-party session
//!
//! # Example
//!
//! ```rust,ignore
//! use flow83_sdk::{Flow83Client, Flow83Config};
//!
//! let client = Flow83Client::new(Flow83Config {
//!     base_url: "https://app.flow83.com".parse()?,
//!     request_timeout: None,
//! })?;
//!
//! client.exchange_identity_token(&id_token).await?;
//! if let Some(user) = client.current_user().await? {
//!     println!("Signed in as {}", user.id);
//! }
//! ```

#[cfg(feature = "client")]
mod client;
mod error;

#[cfg(feature = "client")]
pub use client::{DEFAULT_CONNECT_TIMEOUT, DEFAULT_REQUEST_TIMEOUT, Flow83Client, Flow83Config};
pub use error::Flow83Error;

// Re-export shared types for convenience
pub use flow83_types::{
    ErrorCode, Plan, ProfileField, SubscriptionStatus, TrialPhase, TrialStatus, UserProfile,
};
