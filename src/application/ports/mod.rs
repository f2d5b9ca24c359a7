//! Seams between the use cases and the outside world.

pub mod backend;
pub mod identity;
pub mod storage;

pub use backend::{EntitlementSource, SessionBackend};
pub use identity::{IdentityProvider, IdentitySubscription};
pub use storage::KeyValueStore;
