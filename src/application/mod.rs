pub mod app_error;
pub mod gating;
pub mod ports;
pub mod query_cache;
pub mod use_cases;
pub mod wizard;
