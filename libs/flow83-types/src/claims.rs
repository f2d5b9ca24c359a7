use serde::{Deserialize, Serialize};

/// Claims carried by an identity provider ID token.
///
/// Only the claims this client reads are modeled; everything else in the
/// token is ignored.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct IdentityClaims {
    /// Provider user ID (subject)
    pub sub: String,

    #[serde(default)]
    pub email: Option<String>,

    /// Display name, when the provider knows one
    #[serde(default)]
    pub name: Option<String>,

    /// Token expiration (Unix timestamp)
    pub exp: i64,

    /// Token issued at (Unix timestamp)
    #[serde(default)]
    pub iat: i64,
}
