use std::env;

use axum::http::{HeaderMap, StatusCode};
use chrono::Utc;
use jsonwebtoken::{decode, encode, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::http_error::AppError;

#[derive(Serialize, Deserialize)]
pub struct Claims {
    pub sub: String,
    pub exp: usize,
}

fn secret() -> Result<String, AppError> {
    env::var("JWT_SECRET").map_err(|_| {
        AppError::new(StatusCode::INTERNAL_SERVER_ERROR, "jwtSecretNotConfigured").with_code("config_error")
    })
}

/// Issues a signed token for the given user. Lifetime comes from
/// `JWT_TTL_HOURS` (default 24).
pub fn issue(user_id: Uuid) -> Result<String, AppError> {
    let secret = secret()?;
    let ttl_hours: i64 = env::var("JWT_TTL_HOURS")
        .ok()
        .and_then(|s| s.parse().ok())
        .unwrap_or(24);
    let exp = (Utc::now() + chrono::Duration::hours(ttl_hours)).timestamp() as usize;
    let claims = Claims { sub: user_id.to_string(), exp };
    encode(&Header::default(), &claims, &EncodingKey::from_secret(secret.as_bytes()))
        .map_err(AppError::internal)
}

/// Verifies signature and expiry, returning the user id from the subject.
pub fn verify(token: &str) -> Result<Uuid, AppError> {
    let secret = secret()?;
    let token_data = decode::<Claims>(token, &DecodingKey::from_secret(secret.as_bytes()), &Validation::default())
        .map_err(|_| AppError::new(StatusCode::UNAUTHORIZED, "invalid token").with_code("invalid_token"))?;
    Uuid::parse_str(&token_data.claims.sub)
        .map_err(|_| AppError::new(StatusCode::UNAUTHORIZED, "invalid token subject").with_code("invalid_token"))
}

/// Pulls the bare token out of an `Authorization: Bearer ...` header.
pub fn bearer_token(headers: &HeaderMap) -> Result<&str, AppError> {
    let auth_hdr = headers
        .get("authorization")
        .and_then(|v| v.to_str().ok())
        .ok_or_else(|| AppError::new(StatusCode::UNAUTHORIZED, "missing authorization").with_code("missing_token"))?;
    auth_hdr
        .strip_prefix("Bearer ")
        .ok_or_else(|| AppError::new(StatusCode::UNAUTHORIZED, "invalid authorization header").with_code("invalid_token"))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn init_jwt() {
        std::env::set_var("JWT_SECRET", "storykeeper-test-secret");
    }

    #[test]
    fn issue_then_verify_roundtrip() {
        init_jwt();
        let id = Uuid::new_v4();
        let token = issue(id).unwrap();
        assert_eq!(verify(&token).unwrap(), id);
    }

    #[test]
    fn tampered_token_is_rejected() {
        init_jwt();
        let mut token = issue(Uuid::new_v4()).unwrap();
        token.push('x');
        assert!(verify(&token).is_err());
    }

    #[test]
    fn bearer_header_parsing() {
        let mut headers = HeaderMap::new();
        assert!(bearer_token(&headers).is_err());

        headers.insert("authorization", "Token abc".parse().unwrap());
        assert!(bearer_token(&headers).is_err());

        headers.insert("authorization", "Bearer abc".parse().unwrap());
        assert_eq!(bearer_token(&headers).unwrap(), "abc");
    }
}
