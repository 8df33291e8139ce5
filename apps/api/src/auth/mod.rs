/// Authentication — the credential store and the bearer-token service.
///
/// Tokens are stateless HS256 JWTs carrying a username claim and a 30-minute
/// expiry. There is no revocation list and no key rotation: once issued, a
/// token is valid until its expiry, and compromise of the signing secret
/// invalidates all guarantees.
use std::collections::HashMap;

use chrono::{Duration, Utc};
use jsonwebtoken::{decode, encode, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};
use thiserror::Error;

pub mod extract;

/// How long an issued token remains valid.
const TOKEN_TTL_MINUTES: i64 = 30;

#[derive(Debug, Error)]
pub enum AuthError {
    #[error("Invalid credentials")]
    InvalidCredentials,

    #[error("Could not validate credentials")]
    InvalidSignatureOrExpired,

    #[error("Token is missing a username claim")]
    MissingSubject,

    #[error("Missing bearer token")]
    MissingBearer,

    #[error("Token signing failed: {0}")]
    Signing(String),
}

/// JWT claim set. `sub` is optional on the wire so that a structurally valid
/// token without a username still decodes and can be rejected with the
/// precise error.
#[derive(Debug, Serialize, Deserialize)]
pub struct Claims {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub sub: Option<String>,
    pub exp: usize,
}

/// Issues and verifies signed bearer tokens against a shared symmetric secret.
#[derive(Clone)]
pub struct TokenService {
    encoding: EncodingKey,
    decoding: DecodingKey,
    validation: Validation,
}

impl TokenService {
    pub fn new(secret: &str) -> Self {
        Self {
            encoding: EncodingKey::from_secret(secret.as_bytes()),
            decoding: DecodingKey::from_secret(secret.as_bytes()),
            validation: Validation::default(), // HS256, exp checked
        }
    }

    /// Signs a token embedding `username` with an expiry 30 minutes out.
    pub fn issue(&self, username: &str) -> Result<String, AuthError> {
        let exp = Utc::now() + Duration::minutes(TOKEN_TTL_MINUTES);
        let claims = Claims {
            sub: Some(username.to_string()),
            exp: exp.timestamp() as usize,
        };
        encode(&Header::default(), &claims, &self.encoding)
            .map_err(|e| AuthError::Signing(e.to_string()))
    }

    /// Verifies signature and expiry, returning the username claim.
    pub fn verify(&self, token: &str) -> Result<String, AuthError> {
        let data = decode::<Claims>(token, &self.decoding, &self.validation)
            .map_err(|_| AuthError::InvalidSignatureOrExpired)?;
        data.claims
            .sub
            .filter(|s| !s.is_empty())
            .ok_or(AuthError::MissingSubject)
    }
}

#[derive(Debug, Clone)]
pub struct UserRecord {
    pub username: String,
    pub password_hash: String,
}

/// Fixed in-memory credential table, constructed once at startup and never
/// mutated. Passwords are stored as bcrypt hashes only.
pub struct UserStore {
    users: HashMap<String, String>,
}

impl UserStore {
    pub fn new(records: Vec<UserRecord>) -> Self {
        Self {
            users: records
                .into_iter()
                .map(|r| (r.username, r.password_hash))
                .collect(),
        }
    }

    /// Checks a username/password pair. Unknown usernames and wrong passwords
    /// return the identical error so the response leaks nothing about which
    /// check failed.
    pub fn verify_password(&self, username: &str, password: &str) -> Result<(), AuthError> {
        let hash = self
            .users
            .get(username)
            .ok_or(AuthError::InvalidCredentials)?;
        match bcrypt::verify(password, hash) {
            Ok(true) => Ok(()),
            _ => Err(AuthError::InvalidCredentials),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn service() -> TokenService {
        TokenService::new("test-secret")
    }

    #[test]
    fn test_issue_then_verify_roundtrips_username() {
        let svc = service();
        let token = svc.issue("testuser").unwrap();
        assert_eq!(svc.verify(&token).unwrap(), "testuser");
    }

    #[test]
    fn test_verify_rejects_tampered_token() {
        let svc = service();
        let mut token = svc.issue("testuser").unwrap();
        token.push('x');
        assert!(matches!(
            svc.verify(&token),
            Err(AuthError::InvalidSignatureOrExpired)
        ));
    }

    #[test]
    fn test_verify_rejects_token_signed_with_other_secret() {
        let other = TokenService::new("different-secret");
        let token = other.issue("testuser").unwrap();
        assert!(matches!(
            service().verify(&token),
            Err(AuthError::InvalidSignatureOrExpired)
        ));
    }

    #[test]
    fn test_verify_rejects_expired_token() {
        let svc = service();
        // Expired an hour ago, well past the default validation leeway.
        let claims = Claims {
            sub: Some("testuser".to_string()),
            exp: (Utc::now() - Duration::hours(1)).timestamp() as usize,
        };
        let token = encode(
            &Header::default(),
            &claims,
            &EncodingKey::from_secret(b"test-secret"),
        )
        .unwrap();
        assert!(matches!(
            svc.verify(&token),
            Err(AuthError::InvalidSignatureOrExpired)
        ));
    }

    #[test]
    fn test_verify_rejects_token_without_subject() {
        let svc = service();
        let claims = Claims {
            sub: None,
            exp: (Utc::now() + Duration::minutes(5)).timestamp() as usize,
        };
        let token = encode(
            &Header::default(),
            &claims,
            &EncodingKey::from_secret(b"test-secret"),
        )
        .unwrap();
        assert!(matches!(svc.verify(&token), Err(AuthError::MissingSubject)));
    }

    #[test]
    fn test_verify_rejects_malformed_token() {
        assert!(matches!(
            service().verify("not-a-jwt"),
            Err(AuthError::InvalidSignatureOrExpired)
        ));
    }

    fn store() -> UserStore {
        let hash = bcrypt::hash("password123", 4).unwrap();
        UserStore::new(vec![UserRecord {
            username: "testuser".to_string(),
            password_hash: hash,
        }])
    }

    #[test]
    fn test_store_accepts_valid_credentials() {
        assert!(store().verify_password("testuser", "password123").is_ok());
    }

    #[test]
    fn test_store_rejects_wrong_password_and_unknown_user_identically() {
        let store = store();
        let wrong_password = store.verify_password("testuser", "nope").unwrap_err();
        let unknown_user = store.verify_password("nobody", "password123").unwrap_err();
        assert!(matches!(wrong_password, AuthError::InvalidCredentials));
        assert!(matches!(unknown_user, AuthError::InvalidCredentials));
    }
}
