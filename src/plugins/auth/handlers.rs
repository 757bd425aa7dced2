use axum::http::StatusCode;
use axum::{Extension, Json};
use bcrypt::verify;
use sqlx::PgPool;

use crate::http_error::AppError;
use crate::plugins::auth::middleware::AuthUser;
use crate::plugins::auth::models::{LoginRequest, LoginResponse};
use crate::plugins::auth::{repo, token};
use crate::plugins::users::models::UserDto;

pub async fn login(
    Extension(pool): Extension<PgPool>,
    Json(payload): Json<LoginRequest>,
) -> Result<Json<LoginResponse>, AppError> {
    if payload.username.is_empty() || payload.password.is_empty() {
        return Err(AppError::new(StatusCode::BAD_REQUEST, "usernameAndPasswordRequired").with_code("invalid_credentials"));
    }

    let (id, password_hash) = match repo::find_user_credentials(&pool, &payload.username).await? {
        Some(found) => found,
        None => return Err(AppError::new(StatusCode::UNAUTHORIZED, "invalidUsernameOrPassword").with_code("invalid_credentials")),
    };

    let valid = verify(&payload.password, &password_hash).map_err(AppError::internal)?;
    if !valid {
        return Err(AppError::new(StatusCode::UNAUTHORIZED, "invalidUsernameOrPassword").with_code("invalid_credentials"));
    }

    let token = token::issue(id)?;
    Ok(Json(LoginResponse { token }))
}

pub async fn whoami(Extension(pool): Extension<PgPool>, auth: AuthUser) -> Result<Json<UserDto>, AppError> {
    let user = repo::get_user_basic(&pool, auth.user_id).await?;
    Ok(Json(user))
}
