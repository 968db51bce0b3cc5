use axum::{
    async_trait,
    extract::FromRequestParts,
    http::{request::Parts, HeaderMap},
};
use uuid::Uuid;

use crate::auth::{validate_token, Claims, TokenUse};
use crate::error::ApiError;

/// Authenticated user context extracted from an access token.
///
/// Used directly as a handler argument; extraction rejects the request with
/// 401 when the bearer token is missing or invalid.
#[derive(Clone, Debug)]
pub struct AuthUser {
    pub user_id: Uuid,
    pub username: String,
    pub email: String,
}

impl From<Claims> for AuthUser {
    fn from(claims: Claims) -> Self {
        Self {
            user_id: claims.sub,
            username: claims.username,
            email: claims.email,
        }
    }
}

#[async_trait]
impl<S> FromRequestParts<S> for AuthUser
where
    S: Send + Sync,
{
    type Rejection = ApiError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        let token = extract_bearer_token(&parts.headers).map_err(ApiError::unauthorized)?;
        let claims = validate_token(&token, TokenUse::Access)?;
        Ok(AuthUser::from(claims))
    }
}

/// Optional variant used by endpoints readable without credentials: a valid
/// bearer token yields an identity, anything else yields None.
pub fn identity_from_headers(headers: &HeaderMap) -> Option<AuthUser> {
    let token = extract_bearer_token(headers).ok()?;
    let claims = validate_token(&token, TokenUse::Access).ok()?;
    Some(AuthUser::from(claims))
}

/// Extract the bearer token from the Authorization header
fn extract_bearer_token(headers: &HeaderMap) -> Result<String, String> {
    let auth_header = headers
        .get("authorization")
        .ok_or_else(|| "Missing Authorization header".to_string())?;

    let auth_str = auth_header
        .to_str()
        .map_err(|_| "Invalid Authorization header format".to_string())?;

    if let Some(token) = auth_str.strip_prefix("Bearer ") {
        if token.trim().is_empty() {
            return Err("Empty bearer token".to_string());
        }
        Ok(token.to_string())
    } else {
        Err("Authorization header must use Bearer token format".to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::HeaderValue;

    #[test]
    fn extracts_bearer_token() {
        let mut headers = HeaderMap::new();
        headers.insert("authorization", HeaderValue::from_static("Bearer abc.def.ghi"));
        assert_eq!(extract_bearer_token(&headers).unwrap(), "abc.def.ghi");
    }

    #[test]
    fn rejects_missing_and_malformed_headers() {
        let headers = HeaderMap::new();
        assert!(extract_bearer_token(&headers).is_err());

        let mut headers = HeaderMap::new();
        headers.insert("authorization", HeaderValue::from_static("Token abc"));
        assert!(extract_bearer_token(&headers).is_err());

        let mut headers = HeaderMap::new();
        headers.insert("authorization", HeaderValue::from_static("Bearer "));
        assert!(extract_bearer_token(&headers).is_err());
    }
}
