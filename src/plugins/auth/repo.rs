use sqlx::PgPool;
use sqlx::Row;
use uuid::Uuid;

use crate::http_error::AppError;
use crate::plugins::users::models::UserDto;

pub async fn find_user_credentials(pool: &PgPool, username: &str) -> Result<Option<(Uuid, String)>, AppError> {
    let opt = sqlx::query("SELECT id, password_hash FROM users WHERE username = $1")
        .bind(username)
        .fetch_optional(pool)
        .await
        .map_err(AppError::from)?;

    Ok(opt.map(|r| (r.get("id"), r.get("password_hash"))))
}

pub async fn get_user_basic(pool: &PgPool, id: Uuid) -> Result<UserDto, AppError> {
    let r = sqlx::query("SELECT id, username, email FROM users WHERE id = $1")
        .bind(id)
        .fetch_one(pool)
        .await
        .map_err(AppError::from)?;

    Ok(UserDto {
        id: r.get("id"),
        username: r.get("username"),
        email: r.get("email"),
    })
}
