use jsonwebtoken::{Algorithm, DecodingKey, Validation, decode};

use crate::{IdentityClaims, TokenError};

/// Reads the claims of an identity token without verifying its signature.
///
/// # Security Note
/// The backend verifies every token it receives. The client only uses the
/// peeked claims to decide when to refresh, never to grant access.
pub fn peek_identity_claims(token: &str) -> Result<IdentityClaims, TokenError> {
    if token.split('.').count() != 3 {
        return Err(TokenError::InvalidFormat("expected three segments".into()));
    }

    let mut validation = Validation::new(Algorithm::HS256);
    validation.insecure_disable_signature_validation();
    validation.validate_exp = false;
    validation.validate_aud = false;
    validation.required_spec_claims.clear();

    let token_data = decode::<IdentityClaims>(
        token,
        &DecodingKey::from_secret(b"ignored"),
        &validation,
    )?;

    Ok(token_data.claims)
}

/// Returns true if `token` expires within `window_secs` of `now` (Unix seconds).
///
/// Tokens whose claims cannot be read are treated as already expired.
pub fn token_expires_within(token: &str, now: i64, window_secs: i64) -> bool {
    match peek_identity_claims(token) {
        Ok(claims) => claims.exp - window_secs <= now,
        Err(_) => true,
    }
}
