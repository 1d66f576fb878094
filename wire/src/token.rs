//! Bearer-token issuance and verification shared by `central` and `store`.
//!
//! Central issues tokens and verifies inbound ones; a store only ever
//! consumes this module to read its own token's `exp` locally before
//! deciding whether to refresh (see `store::token_cache`).

use chrono::Utc;
use jsonwebtoken::{decode, encode, Algorithm, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};

pub const AUDIENCE: &str = "central-service";

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Claims {
    pub iss: String,
    pub sub: String,
    pub role: String,
    pub exp: usize,
    pub aud: String,
}

#[derive(Debug, Deserialize)]
struct UnverifiedIssuer {
    iss: Option<String>,
}

#[derive(Debug, thiserror::Error)]
pub enum TokenError {
    #[error("missing issuer claim")]
    MissingIssuer,
    #[error("token expired")]
    Expired,
    #[error("invalid token: {0}")]
    Invalid(#[from] jsonwebtoken::errors::Error),
}

/// Parse the configured algorithm name (e.g. "HS256") into a jsonwebtoken
/// `Algorithm`. Falls back to HS256 if the name is unrecognized.
pub fn parse_algorithm(name: &str) -> Algorithm {
    match name.to_ascii_uppercase().as_str() {
        "HS384" => Algorithm::HS384,
        "HS512" => Algorithm::HS512,
        _ => Algorithm::HS256,
    }
}

/// Mint a signed bearer token for `service_name` with `role`, expiring
/// `ttl_minutes` from now.
pub fn issue_token(
    service_name: &str,
    role: &str,
    secret: &[u8],
    algorithm: Algorithm,
    ttl_minutes: i64,
) -> Result<String, TokenError> {
    let exp = Utc::now() + chrono::Duration::minutes(ttl_minutes);
    let claims = Claims {
        iss: service_name.to_string(),
        sub: service_name.to_string(),
        role: role.to_string(),
        exp: exp.timestamp() as usize,
        aud: AUDIENCE.to_string(),
    };
    let header = Header::new(algorithm);
    encode(&header, &claims, &EncodingKey::from_secret(secret)).map_err(TokenError::Invalid)
}

/// Decode the token without checking its signature, returning only the
/// `iss` claim. Used to resolve which service's secret to verify against.
pub fn peek_issuer(token: &str) -> Result<String, TokenError> {
    let mut validation = Validation::default();
    validation.insecure_disable_signature_validation();
    validation.validate_exp = false;
    validation.validate_aud = false;
    let key = DecodingKey::from_secret(&[]);
    let data = decode::<UnverifiedIssuer>(token, &key, &validation)?;
    data.claims.iss.ok_or(TokenError::MissingIssuer)
}

/// Decode the full claim set without checking the signature. A store uses
/// this on its own token (it never holds central's signing secret) purely
/// to read `exp` locally before deciding whether to refresh.
pub fn peek_claims_unverified(token: &str) -> Result<Claims, TokenError> {
    let mut validation = Validation::default();
    validation.insecure_disable_signature_validation();
    validation.validate_exp = false;
    validation.validate_aud = false;
    let key = DecodingKey::from_secret(&[]);
    let data = decode::<Claims>(token, &key, &validation)?;
    Ok(data.claims)
}

/// Fully verify a token's signature, audience and algorithm, then
/// explicitly re-check expiry (belt-and-braces on top of the library's
/// own `exp` validation).
pub fn verify_token(token: &str, secret: &[u8], algorithm: Algorithm) -> Result<Claims, TokenError> {
    let mut validation = Validation::new(algorithm);
    validation.set_audience(&[AUDIENCE]);
    let key = DecodingKey::from_secret(secret);
    let data = decode::<Claims>(token, &key, &validation)?;

    let now = Utc::now().timestamp() as usize;
    if data.claims.exp <= now {
        return Err(TokenError::Expired);
    }
    Ok(data.claims)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn issue_then_verify_round_trips() {
        let secret = b"test-secret";
        let token = issue_token("store-1", "store", secret, Algorithm::HS256, 15).unwrap();
        let claims = verify_token(&token, secret, Algorithm::HS256).unwrap();
        assert_eq!(claims.iss, "store-1");
        assert_eq!(claims.sub, "store-1");
        assert_eq!(claims.role, "store");
        assert_eq!(claims.aud, AUDIENCE);
    }

    #[test]
    fn peek_issuer_reads_iss_without_verifying_signature() {
        let token = issue_token("store-1", "store", b"secret-a", Algorithm::HS256, 15).unwrap();
        // peek succeeds even with the wrong secret in scope, since it never checks the signature.
        assert_eq!(peek_issuer(&token).unwrap(), "store-1");
    }

    #[test]
    fn verify_rejects_wrong_secret() {
        let token = issue_token("store-1", "store", b"secret-a", Algorithm::HS256, 15).unwrap();
        let result = verify_token(&token, b"secret-b", Algorithm::HS256);
        assert!(result.is_err());
    }

    #[test]
    fn verify_rejects_expired_token() {
        let token = issue_token("store-1", "store", b"secret", Algorithm::HS256, -1).unwrap();
        let result = verify_token(&token, b"secret", Algorithm::HS256);
        assert!(matches!(result, Err(TokenError::Expired) | Err(TokenError::Invalid(_))));
    }
}
