use async_trait::async_trait;
use axum::body::Body;
use axum::extract::FromRequestParts;
use axum::http::request::Parts;
use axum::http::Request;
use axum::middleware::Next;
use axum::response::Response;

use crate::http_error::AppError;
use crate::plugins::auth::token;

/// Identity of the authenticated caller, as carried in the bearer token.
#[derive(Clone)]
pub struct AuthUser {
    pub user_id: uuid::Uuid,
}

pub async fn require_auth(mut req: Request<Body>, next: Next) -> Result<Response, AppError> {
    let user_id = token::verify(token::bearer_token(req.headers())?)?;
    // insert into extensions for handlers to use
    req.extensions_mut().insert(AuthUser { user_id });
    Ok(next.run(req).await)
}

#[async_trait]
impl<S> FromRequestParts<S> for AuthUser
where
    S: Send + Sync,
{
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        // prefer the identity require_auth already verified
        if let Some(user) = parts.extensions.get::<AuthUser>() {
            return Ok(user.clone());
        }
        let user_id = token::verify(token::bearer_token(&parts.headers)?)?;
        Ok(AuthUser { user_id })
    }
}
