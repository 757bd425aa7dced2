use std::path::Path;

use axum::http::StatusCode;
use thiserror::Error;
use uuid::Uuid;

use crate::config::UploadConfig;
use crate::http_error::AppError;
use crate::plugins::story::models::{NewStory, PhotoUpload, Story, StoryCreate, StoryPatch};
use crate::plugins::story::store::DynStoryStore;

/// Outcome taxonomy for story operations; the handlers map these onto
/// status codes through `AppError`.
#[derive(Debug, Error)]
pub enum StoryError {
    #[error("{0}")]
    Validation(String),
    #[error("story not found")]
    NotFound,
    #[error("not authorized")]
    NotOwner,
    #[error(transparent)]
    Store(#[from] anyhow::Error),
}

impl From<StoryError> for AppError {
    fn from(e: StoryError) -> Self {
        match e {
            StoryError::Validation(msg) => AppError::new(StatusCode::BAD_REQUEST, msg).with_code("validation_error"),
            StoryError::NotFound => AppError::new(StatusCode::NOT_FOUND, "story not found").with_code("not_found"),
            StoryError::NotOwner => AppError::new(StatusCode::UNAUTHORIZED, "not authorized").with_code("not_owner"),
            StoryError::Store(err) => AppError::internal(err),
        }
    }
}

/// Mediates every story read and write: input validity, ownership, photo
/// storage. The store stays the single system of record.
#[derive(Clone)]
pub struct StoryService {
    store: DynStoryStore,
    uploads: UploadConfig,
    strict_ownership_on_read: bool,
}

impl StoryService {
    pub fn new(store: DynStoryStore, uploads: UploadConfig, strict_ownership_on_read: bool) -> Self {
        Self { store, uploads, strict_ownership_on_read }
    }

    pub fn max_upload_bytes(&self) -> u64 {
        self.uploads.max_bytes
    }

    pub async fn list_own(&self, caller: Uuid) -> Result<Vec<Story>, StoryError> {
        Ok(self.store.list_by_owner(caller).await?)
    }

    pub async fn get(&self, caller: Uuid, id: Uuid) -> Result<Story, StoryError> {
        let story = self.store.find_by_id(id).await?.ok_or(StoryError::NotFound)?;
        if self.strict_ownership_on_read && story.owner != caller {
            return Err(StoryError::NotOwner);
        }
        Ok(story)
    }

    pub async fn create(&self, caller: Uuid, fields: StoryCreate) -> Result<Story, StoryError> {
        let name = fields.name.as_deref().map(str::trim).unwrap_or_default();
        if name.is_empty() {
            return Err(StoryError::Validation("name is required".to_string()));
        }
        let new = NewStory {
            owner: caller,
            name: name.to_string(),
            email: fields.email,
            phone: fields.phone,
            kind: fields.kind,
        };
        Ok(self.store.insert(new).await?)
    }

    pub async fn update(&self, caller: Uuid, id: Uuid, patch: StoryPatch) -> Result<Story, StoryError> {
        match self.store.update_owned(id, caller, patch.normalized()).await? {
            Some(story) => Ok(story),
            None => Err(self.classify_miss(id).await),
        }
    }

    pub async fn delete(&self, caller: Uuid, id: Uuid) -> Result<(), StoryError> {
        if self.store.delete_owned(id, caller).await? {
            return Ok(());
        }
        Err(self.classify_miss(id).await)
    }

    /// Uploaded photos land in the configured directory as
    /// `photo_{story id}{ext}`; a repeat upload overwrites the previous file.
    pub async fn attach_photo(&self, caller: Uuid, id: Uuid, upload: Option<PhotoUpload>) -> Result<String, StoryError> {
        let story = self.store.find_by_id(id).await?.ok_or(StoryError::NotFound)?;
        if self.strict_ownership_on_read && story.owner != caller {
            return Err(StoryError::NotOwner);
        }

        let upload = upload.ok_or_else(|| StoryError::Validation("no file uploaded".to_string()))?;
        let is_image = upload
            .content_type
            .as_deref()
            .map(|c| c.starts_with("image/"))
            .unwrap_or(false);
        if !is_image {
            return Err(StoryError::Validation("uploaded file must be an image".to_string()));
        }
        if upload.bytes.len() as u64 > self.uploads.max_bytes {
            return Err(StoryError::Validation(format!(
                "file exceeds the {} byte upload limit",
                self.uploads.max_bytes
            )));
        }

        let ext = Path::new(&upload.filename)
            .extension()
            .and_then(|e| e.to_str())
            .map(|e| format!(".{}", e))
            .unwrap_or_default();
        let stored = format!("photo_{}{}", story.id, ext);

        tokio::fs::create_dir_all(&self.uploads.dir)
            .await
            .map_err(anyhow::Error::from)?;
        tokio::fs::write(self.uploads.dir.join(&stored), &upload.bytes)
            .await
            .map_err(anyhow::Error::from)?;

        if !self.store.set_photo(id, &stored).await? {
            return Err(StoryError::NotFound);
        }
        Ok(stored)
    }

    /// A conditional mutation matched no row: either the story is gone or it
    /// belongs to someone else.
    async fn classify_miss(&self, id: Uuid) -> StoryError {
        match self.store.find_by_id(id).await {
            Ok(Some(_)) => StoryError::NotOwner,
            Ok(None) => StoryError::NotFound,
            Err(e) => StoryError::Store(e),
        }
    }
}
