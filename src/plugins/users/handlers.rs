use axum::http::StatusCode;
use axum::{Extension, Json};
use sqlx::PgPool;

use crate::http_error::AppError;
use crate::plugins::users::models::{RegisterUser, UserDto};
use crate::plugins::users::repo;

pub async fn register(
    Extension(pool): Extension<PgPool>,
    Json(payload): Json<RegisterUser>,
) -> Result<Json<UserDto>, AppError> {
    if payload.username.trim().is_empty() {
        return Err(AppError::new(StatusCode::BAD_REQUEST, "username is required"));
    }
    if !payload.email.contains('@') {
        return Err(AppError::new(StatusCode::BAD_REQUEST, "invalid email"));
    }
    if payload.password.len() < 8 {
        return Err(AppError::new(StatusCode::BAD_REQUEST, "password too short"));
    }

    let user = repo::insert_user(&pool, payload.username.trim(), &payload.email, &payload.password).await?;
    Ok(Json(user))
}
