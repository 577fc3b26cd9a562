//! Signed session tokens (HS256 via `jsonwebtoken`).

use chrono::{Duration, Utc};
use jsonwebtoken::{decode, encode, Algorithm, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};

use crate::error::{AuthError, Result};
use crate::models::Token;

/// A [`Token`] with its issue and expiry timestamps.
#[derive(Debug, Clone, Serialize, Deserialize)]
struct Envelope {
    #[serde(flatten)]
    token: Token,
    iat: i64,
    exp: i64,
}

/// Sign `token`, valid for `max_age` from now.
pub fn encode_token(token: &Token, secret: &str, max_age: Duration) -> Result<String> {
    let now = Utc::now();
    let expires = now
        .checked_add_signed(max_age)
        .ok_or_else(|| AuthError::Config(format!("token lifetime {max_age} is out of range")))?;
    let envelope = Envelope {
        token: token.clone(),
        iat: now.timestamp(),
        exp: expires.timestamp(),
    };
    let raw = encode(
        &Header::new(Algorithm::HS256),
        &envelope,
        &EncodingKey::from_secret(secret.as_bytes()),
    )?;
    Ok(raw)
}

/// Verify signature and expiry of `raw` and return its claims.
pub fn decode_token(raw: &str, secret: &str) -> Result<Token> {
    let data = decode::<Envelope>(
        raw,
        &DecodingKey::from_secret(secret.as_bytes()),
        &Validation::new(Algorithm::HS256),
    )?;
    Ok(data.claims.token)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::UserRole;

    fn token() -> Token {
        Token {
            id: Some("u1".to_string()),
            email: Some("a@x.com".to_string()),
            role: Some(UserRole::Admin),
            sub: Some("u1".to_string()),
            ..Token::default()
        }
    }

    #[test]
    fn test_signed_token_verifies() {
        let raw = encode_token(&token(), "secret", Duration::hours(1)).unwrap();
        assert_eq!(decode_token(&raw, "secret").unwrap(), token());
    }

    #[test]
    fn test_wrong_secret_is_rejected() {
        let raw = encode_token(&token(), "secret", Duration::hours(1)).unwrap();
        assert!(matches!(decode_token(&raw, "other"), Err(AuthError::Jwt(_))));
    }

    #[test]
    fn test_expired_token_is_rejected() {
        let raw = encode_token(&token(), "secret", Duration::hours(-2)).unwrap();
        assert!(matches!(decode_token(&raw, "secret"), Err(AuthError::Jwt(_))));
    }

    #[test]
    fn test_out_of_range_lifetime_is_rejected() {
        let err = encode_token(&token(), "secret", Duration::days(1_000_000_000)).unwrap_err();
        assert!(matches!(err, AuthError::Config(_)));
    }

    #[test]
    fn test_claims_use_camel_case() {
        let token = Token {
            email_verified: Some(Utc::now()),
            ..token()
        };
        let json = serde_json::to_value(&token).unwrap();
        assert!(json.get("emailVerified").is_some());
        assert_eq!(json["role"], "ADMIN");
        assert!(json.get("picture").is_none());
    }
}
