use axum::response::{IntoResponse, Response};
use axum::Json;
use axum::http::StatusCode;
use serde::Serialize;
use sqlx::Error as SqlxError;

#[derive(Serialize)]
struct ErrorBody {
    error: String,
    code: Option<String>,
}

#[derive(Debug)]
pub struct AppError {
    pub status: StatusCode,
    pub message: String,
    pub code: Option<String>,
}

impl AppError {
    pub fn new(status: StatusCode, message: impl Into<String>) -> Self {
        Self { status, message: message.into(), code: None }
    }

    pub fn with_code(mut self, code: impl Into<String>) -> Self {
        self.code = Some(code.into());
        self
    }

    /// Detail is logged server-side; clients only see a generic body.
    pub fn internal(detail: impl std::fmt::Display) -> Self {
        tracing::error!(%detail, "internal error");
        AppError::new(StatusCode::INTERNAL_SERVER_ERROR, "internalError").with_code("internal_error")
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let body = ErrorBody { error: self.message, code: self.code };
        (self.status, Json(body)).into_response()
    }
}

impl From<SqlxError> for AppError {
    fn from(e: SqlxError) -> Self {
        use sqlx::Error::*;
        match e {
            RowNotFound => AppError::new(StatusCode::NOT_FOUND, "notFound").with_code("not_found"),
            Database(db) => {
                if db.code().as_deref() == Some("23505") {
                    let code_str = match db.constraint() {
                        Some(cons) if cons.contains("username") => "duplicate_username",
                        Some(cons) if cons.contains("email") => "duplicate_email",
                        _ => "duplicate_key",
                    };
                    return AppError::new(StatusCode::CONFLICT, "duplicateKey").with_code(code_str);
                }
                AppError::internal(db.message())
            }
            other => AppError::internal(other),
        }
    }
}
