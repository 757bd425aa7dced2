use bcrypt::{hash, DEFAULT_COST};
use sqlx::PgPool;
use sqlx::Row;

use crate::http_error::AppError;
use crate::plugins::users::models::UserDto;

pub async fn insert_user(pool: &PgPool, username: &str, email: &str, password: &str) -> Result<UserDto, AppError> {
    let password_hash = hash(password, DEFAULT_COST).map_err(AppError::internal)?;
    let row = sqlx::query("INSERT INTO users (username, email, password_hash) VALUES ($1, $2, $3) RETURNING id, username, email")
        .bind(username)
        .bind(email)
        .bind(&password_hash)
        .fetch_one(pool)
        .await
        .map_err(AppError::from)?;

    Ok(UserDto {
        id: row.get("id"),
        username: row.get("username"),
        email: row.get("email"),
    })
}
