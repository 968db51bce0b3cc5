use chrono::{Duration, Utc};
use jsonwebtoken::{decode, encode, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};
use thiserror::Error;
use uuid::Uuid;

use crate::config;

/// What a token is good for. Access tokens authenticate API requests;
/// verify and reset tokens are single-purpose links sent by mail.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TokenUse {
    Access,
    Verify,
    PasswordReset,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct Claims {
    pub sub: Uuid,
    pub username: String,
    pub email: String,
    pub token_use: TokenUse,
    pub exp: i64,
    pub iat: i64,
}

impl Claims {
    pub fn access(user_id: Uuid, username: String, email: String) -> Self {
        let hours = config::config().security.jwt_expiry_hours;
        Self::with_expiry(user_id, username, email, TokenUse::Access, hours)
    }

    pub fn verify(user_id: Uuid, username: String, email: String) -> Self {
        let hours = config::config().security.verify_expiry_hours;
        Self::with_expiry(user_id, username, email, TokenUse::Verify, hours)
    }

    pub fn password_reset(user_id: Uuid, username: String, email: String) -> Self {
        let hours = config::config().security.verify_expiry_hours;
        Self::with_expiry(user_id, username, email, TokenUse::PasswordReset, hours)
    }

    fn with_expiry(
        user_id: Uuid,
        username: String,
        email: String,
        token_use: TokenUse,
        expiry_hours: u64,
    ) -> Self {
        let now = Utc::now();
        Self {
            sub: user_id,
            username,
            email,
            token_use,
            exp: (now + Duration::hours(expiry_hours as i64)).timestamp(),
            iat: now.timestamp(),
        }
    }
}

#[derive(Debug, Error)]
pub enum TokenError {
    #[error("JWT secret not configured")]
    MissingSecret,

    #[error("Invalid token: {0}")]
    Invalid(String),

    #[error("Token not valid for this operation")]
    WrongUse,
}

pub fn generate_token(claims: &Claims) -> Result<String, TokenError> {
    let secret = &config::config().security.jwt_secret;
    if secret.is_empty() {
        return Err(TokenError::MissingSecret);
    }

    encode(&Header::default(), claims, &EncodingKey::from_secret(secret.as_bytes()))
        .map_err(|e| TokenError::Invalid(e.to_string()))
}

/// Validate a token and check it was issued for the expected use.
pub fn validate_token(token: &str, expected_use: TokenUse) -> Result<Claims, TokenError> {
    let secret = &config::config().security.jwt_secret;
    if secret.is_empty() {
        return Err(TokenError::MissingSecret);
    }

    let data = decode::<Claims>(
        token,
        &DecodingKey::from_secret(secret.as_bytes()),
        &Validation::default(),
    )
    .map_err(|e| TokenError::Invalid(e.to_string()))?;

    if data.claims.token_use != expected_use {
        return Err(TokenError::WrongUse);
    }
    Ok(data.claims)
}

/// Salted password hash, hex-encoded.
pub fn hash_password(password: &str, salt: &str) -> String {
    let digest = Sha256::digest(format!("{salt}:{password}").as_bytes());
    digest.iter().map(|b| format!("{b:02x}")).collect()
}

pub fn new_salt() -> String {
    Uuid::new_v4().simple().to_string()
}

pub fn verify_password(password: &str, salt: &str, expected_hash: &str) -> bool {
    hash_password(password, salt) == expected_hash
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn password_hash_round_trips() {
        let salt = new_salt();
        let hash = hash_password("correct horse", &salt);
        assert!(verify_password("correct horse", &salt, &hash));
        assert!(!verify_password("wrong horse", &salt, &hash));
    }

    #[test]
    fn salts_differentiate_identical_passwords() {
        let (s1, s2) = (new_salt(), new_salt());
        assert_ne!(hash_password("same", &s1), hash_password("same", &s2));
    }

    #[test]
    fn token_round_trips_and_checks_use() {
        let claims = Claims::access(Uuid::new_v4(), "amina".into(), "amina@example.com".into());
        let token = generate_token(&claims).unwrap();

        let decoded = validate_token(&token, TokenUse::Access).unwrap();
        assert_eq!(decoded.sub, claims.sub);
        assert_eq!(decoded.username, "amina");

        let err = validate_token(&token, TokenUse::Verify).unwrap_err();
        assert!(matches!(err, TokenError::WrongUse));
    }
}
