mod firebase;
mod in_memory;

pub use firebase::{FirebaseEndpoints, FirebaseIdentityProvider};
pub use in_memory::InMemoryIdentityProvider;
