use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

/// An owned story record, as stored and as served.
#[derive(Serialize, Deserialize, Debug, Clone, FromRow)]
pub struct Story {
    pub id: Uuid,
    pub owner: Uuid,
    pub name: String,
    pub email: Option<String>,
    pub phone: Option<String>,
    #[serde(rename = "type")]
    pub kind: Option<String>,
    pub photo: Option<String>,
    #[serde(rename = "createdAt")]
    pub created_at: DateTime<Utc>,
}

/// Creation payload. `name` stays optional here so a missing field surfaces
/// as a validation error rather than a deserialization rejection.
#[derive(Serialize, Deserialize, Debug, Default)]
pub struct StoryCreate {
    pub name: Option<String>,
    pub email: Option<String>,
    pub phone: Option<String>,
    #[serde(rename = "type")]
    pub kind: Option<String>,
}

/// Partial update. Absent fields leave the stored value untouched.
#[derive(Serialize, Deserialize, Debug, Default, Clone)]
pub struct StoryPatch {
    pub name: Option<String>,
    pub email: Option<String>,
    pub phone: Option<String>,
    #[serde(rename = "type")]
    pub kind: Option<String>,
}

impl StoryPatch {
    /// Blank strings count as "not provided" during the merge.
    pub fn normalized(self) -> Self {
        fn keep(v: Option<String>) -> Option<String> {
            v.filter(|s| !s.trim().is_empty())
        }
        StoryPatch {
            name: keep(self.name),
            email: keep(self.email),
            phone: keep(self.phone),
            kind: keep(self.kind),
        }
    }
}

/// Validated fields for a brand-new story; the service binds `owner` from
/// the authenticated caller.
#[derive(Debug, Clone)]
pub struct NewStory {
    pub owner: Uuid,
    pub name: String,
    pub email: Option<String>,
    pub phone: Option<String>,
    pub kind: Option<String>,
}

/// A single uploaded file, as pulled out of a multipart body.
#[derive(Debug)]
pub struct PhotoUpload {
    pub filename: String,
    pub content_type: Option<String>,
    pub bytes: axum::body::Bytes,
}
