use std::path::PathBuf;
use std::time::Duration;

use env_helpers::{get_env, get_env_default};
use secrecy::SecretString;
use url::Url;

use crate::{
    adapters::storage::DEFAULT_STORAGE_FILE,
    application::use_cases::entitlements::CacheTimings,
};

pub struct AppConfig {
    /// Origin of the Flow 83 backend (e.g., "https://app.flow83.com").
    pub api_url: Url,
    /// Firebase Web API key. Public by nature, still kept out of logs.
    pub firebase_api_key: SecretString,
    pub storage_path: PathBuf,
    pub cache_timings: CacheTimings,
    pub http_timeout: Duration,
    pub log_file: String,
}

impl AppConfig {
    pub fn from_env() -> Self {
        let api_url: Url = get_env("FLOW83_API_URL");
        let firebase_api_key = SecretString::new(get_env::<String>("FIREBASE_API_KEY").into());
        let storage_path: String =
            get_env_default("FLOW83_STORAGE_PATH", DEFAULT_STORAGE_FILE.to_string());

        let user_stale_secs: u64 = get_env_default("USER_STALE_SECS", 30);
        let entitlement_stale_secs: u64 = get_env_default("ENTITLEMENT_STALE_SECS", 300);
        let http_timeout_secs: u64 = get_env_default("HTTP_TIMEOUT_SECS", 30);
        let log_file: String = get_env_default("LOG_FILE", "flow83.log".to_string());

        Self {
            api_url,
            firebase_api_key,
            storage_path: PathBuf::from(storage_path),
            cache_timings: CacheTimings {
                user: Duration::from_secs(user_stale_secs),
                entitlements: Duration::from_secs(entitlement_stale_secs),
            },
            http_timeout: Duration::from_secs(http_timeout_secs),
            log_file,
        }
    }
}
