use axum::extract::{Multipart, Path};
use axum::http::StatusCode;
use axum::{Extension, Json};
use serde_json::json;
use uuid::Uuid;

use crate::http_error::AppError;
use crate::plugins::auth::middleware::AuthUser;
use crate::plugins::story::models::{PhotoUpload, Story, StoryCreate, StoryPatch};
use crate::plugins::story::service::StoryService;

pub async fn list_stories(
    Extension(service): Extension<StoryService>,
    auth: AuthUser,
) -> Result<Json<Vec<Story>>, AppError> {
    let stories = service.list_own(auth.user_id).await?;
    Ok(Json(stories))
}

pub async fn get_story(
    Extension(service): Extension<StoryService>,
    auth: AuthUser,
    Path(id): Path<Uuid>,
) -> Result<Json<Story>, AppError> {
    let story = service.get(auth.user_id, id).await?;
    Ok(Json(story))
}

pub async fn create_story(
    Extension(service): Extension<StoryService>,
    auth: AuthUser,
    Json(payload): Json<StoryCreate>,
) -> Result<Json<Story>, AppError> {
    let story = service.create(auth.user_id, payload).await?;
    Ok(Json(story))
}

pub async fn update_story(
    Extension(service): Extension<StoryService>,
    auth: AuthUser,
    Path(id): Path<Uuid>,
    Json(payload): Json<StoryPatch>,
) -> Result<Json<Story>, AppError> {
    let story = service.update(auth.user_id, id, payload).await?;
    Ok(Json(story))
}

pub async fn delete_story(
    Extension(service): Extension<StoryService>,
    auth: AuthUser,
    Path(id): Path<Uuid>,
) -> Result<Json<serde_json::Value>, AppError> {
    service.delete(auth.user_id, id).await?;
    Ok(Json(json!({ "message": "story removed" })))
}

pub async fn upload_story_photo(
    Extension(service): Extension<StoryService>,
    auth: AuthUser,
    Path(id): Path<Uuid>,
    mut multipart: Multipart,
) -> Result<Json<serde_json::Value>, AppError> {
    // first field carrying a filename wins; other fields are ignored
    let mut upload: Option<PhotoUpload> = None;
    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| AppError::new(StatusCode::BAD_REQUEST, format!("multipart error: {}", e)))?
    {
        if let Some(filename) = field.file_name() {
            let filename = filename.to_string();
            let content_type = field.content_type().map(|c| c.to_string());
            let bytes = field
                .bytes()
                .await
                .map_err(|e| AppError::new(StatusCode::BAD_REQUEST, format!("multipart read error: {}", e)))?;
            upload = Some(PhotoUpload { filename, content_type, bytes });
            break;
        }
    }

    let stored = service.attach_photo(auth.user_id, id, upload).await?;
    Ok(Json(json!({ "filename": stored })))
}
