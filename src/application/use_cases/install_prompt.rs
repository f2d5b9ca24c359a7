use std::sync::Arc;

use tracing::warn;

use crate::{
    app_error::{AppError, AppResult},
    application::ports::KeyValueStore,
};

const DISMISSED_KEY_PREFIX: &str = "pwa_prompt_dismissed_";

/// Remembers, per journey, that a participant closed the "add to home screen" prompt.
#[derive(Clone)]
pub struct InstallPromptDismissals {
    store: Arc<dyn KeyValueStore>,
}

impl InstallPromptDismissals {
    pub fn new(store: Arc<dyn KeyValueStore>) -> Self {
        Self { store }
    }

    /// Unreadable storage counts as "not dismissed".
    pub fn is_dismissed(&self, journey_id: &str) -> bool {
        match self.store.get(&storage_key(journey_id)) {
            Ok(value) => value.as_deref() == Some("true"),
            Err(err) => {
                warn!(error = %err, journey_id, "could not read install prompt flag");
                false
            }
        }
    }

    pub fn dismiss(&self, journey_id: &str) -> AppResult<()> {
        if journey_id.trim().is_empty() {
            return Err(AppError::InvalidInput("journey id is required".into()));
        }
        self.store.set(&storage_key(journey_id), "true")
    }
}

fn storage_key(journey_id: &str) -> String {
    format!("{}{}", DISMISSED_KEY_PREFIX, journey_id)
}
