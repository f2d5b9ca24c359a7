use serde::{Deserialize, Serialize};

/// Signed-in user as reported by the identity provider.
///
/// Held in memory only. Tokens are fetched separately on demand.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Identity {
    pub uid: String,
    pub email: Option<String>,
    pub display_name: Option<String>,
}
