use crate::app_error::AppResult;

/// Durable string storage that survives restarts.
///
/// Calls are synchronous so state machines can persist inside a transition.
pub trait KeyValueStore: Send + Sync {
    fn get(&self, key: &str) -> AppResult<Option<String>>;
    fn set(&self, key: &str, value: &str) -> AppResult<()>;
    fn remove(&self, key: &str) -> AppResult<()>;
}
