use std::sync::Arc;

use async_trait::async_trait;
use uuid::Uuid;

use crate::plugins::story::models::{NewStory, Story, StoryPatch};

/// Persistence contract for story records. `None` and `false` returns mean
/// no row matched the given id (and owner, for the `_owned` operations).
#[async_trait]
pub trait StoryStore: Send + Sync + 'static {
    async fn insert(&self, new: NewStory) -> anyhow::Result<Story>;

    async fn find_by_id(&self, id: Uuid) -> anyhow::Result<Option<Story>>;

    /// All stories owned by `owner`, most recently created first.
    async fn list_by_owner(&self, owner: Uuid) -> anyhow::Result<Vec<Story>>;

    /// Merges the patch into the story in a single write, conditional on id
    /// AND owner matching.
    async fn update_owned(&self, id: Uuid, owner: Uuid, patch: StoryPatch) -> anyhow::Result<Option<Story>>;

    async fn delete_owned(&self, id: Uuid, owner: Uuid) -> anyhow::Result<bool>;

    async fn set_photo(&self, id: Uuid, filename: &str) -> anyhow::Result<bool>;
}

pub type DynStoryStore = Arc<dyn StoryStore>;

mod pg {
    use super::*;
    use sqlx::PgPool;

    pub struct PgStoryStore {
        pool: PgPool,
    }

    impl PgStoryStore {
        pub fn new(pool: PgPool) -> Self {
            Self { pool }
        }

        pub fn into_arc(self) -> DynStoryStore {
            Arc::new(self)
        }
    }

    #[async_trait]
    impl StoryStore for PgStoryStore {
        async fn insert(&self, new: NewStory) -> anyhow::Result<Story> {
            let story = sqlx::query_as::<_, Story>(
                "INSERT INTO stories (owner, name, email, phone, kind) VALUES ($1, $2, $3, $4, $5) RETURNING id, owner, name, email, phone, kind, photo, created_at",
            )
            .bind(new.owner)
            .bind(&new.name)
            .bind(&new.email)
            .bind(&new.phone)
            .bind(&new.kind)
            .fetch_one(&self.pool)
            .await?;
            Ok(story)
        }

        async fn find_by_id(&self, id: Uuid) -> anyhow::Result<Option<Story>> {
            let story = sqlx::query_as::<_, Story>(
                "SELECT id, owner, name, email, phone, kind, photo, created_at FROM stories WHERE id = $1",
            )
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;
            Ok(story)
        }

        async fn list_by_owner(&self, owner: Uuid) -> anyhow::Result<Vec<Story>> {
            let stories = sqlx::query_as::<_, Story>(
                "SELECT id, owner, name, email, phone, kind, photo, created_at FROM stories WHERE owner = $1 ORDER BY created_at DESC",
            )
            .bind(owner)
            .fetch_all(&self.pool)
            .await?;
            Ok(stories)
        }

        async fn update_owned(&self, id: Uuid, owner: Uuid, patch: StoryPatch) -> anyhow::Result<Option<Story>> {
            let story = sqlx::query_as::<_, Story>(
                "UPDATE stories SET name = COALESCE($1, name), email = COALESCE($2, email), phone = COALESCE($3, phone), kind = COALESCE($4, kind) WHERE id = $5 AND owner = $6 RETURNING id, owner, name, email, phone, kind, photo, created_at",
            )
            .bind(patch.name)
            .bind(patch.email)
            .bind(patch.phone)
            .bind(patch.kind)
            .bind(id)
            .bind(owner)
            .fetch_optional(&self.pool)
            .await?;
            Ok(story)
        }

        async fn delete_owned(&self, id: Uuid, owner: Uuid) -> anyhow::Result<bool> {
            let result = sqlx::query("DELETE FROM stories WHERE id = $1 AND owner = $2")
                .bind(id)
                .bind(owner)
                .execute(&self.pool)
                .await?;
            Ok(result.rows_affected() > 0)
        }

        async fn set_photo(&self, id: Uuid, filename: &str) -> anyhow::Result<bool> {
            let result = sqlx::query("UPDATE stories SET photo = $1 WHERE id = $2")
                .bind(filename)
                .bind(id)
                .execute(&self.pool)
                .await?;
            Ok(result.rows_affected() > 0)
        }
    }
}

pub use pg::PgStoryStore;

mod inmem {
    use std::collections::HashMap;

    use parking_lot::Mutex;

    use super::*;

    /// HashMap-backed store for isolated tests and local tinkering.
    pub struct InMemoryStoryStore {
        inner: Mutex<HashMap<Uuid, Story>>,
    }

    impl InMemoryStoryStore {
        pub fn new() -> Self {
            Self { inner: Mutex::new(HashMap::new()) }
        }

        pub fn into_arc(self) -> DynStoryStore {
            Arc::new(self)
        }
    }

    #[async_trait]
    impl StoryStore for InMemoryStoryStore {
        async fn insert(&self, new: NewStory) -> anyhow::Result<Story> {
            let story = Story {
                id: Uuid::new_v4(),
                owner: new.owner,
                name: new.name,
                email: new.email,
                phone: new.phone,
                kind: new.kind,
                photo: None,
                created_at: chrono::Utc::now(),
            };
            self.inner.lock().insert(story.id, story.clone());
            Ok(story)
        }

        async fn find_by_id(&self, id: Uuid) -> anyhow::Result<Option<Story>> {
            Ok(self.inner.lock().get(&id).cloned())
        }

        async fn list_by_owner(&self, owner: Uuid) -> anyhow::Result<Vec<Story>> {
            let mut stories: Vec<Story> = self
                .inner
                .lock()
                .values()
                .filter(|s| s.owner == owner)
                .cloned()
                .collect();
            stories.sort_by(|a, b| b.created_at.cmp(&a.created_at));
            Ok(stories)
        }

        async fn update_owned(&self, id: Uuid, owner: Uuid, patch: StoryPatch) -> anyhow::Result<Option<Story>> {
            let mut guard = self.inner.lock();
            let story = match guard.get_mut(&id) {
                Some(s) if s.owner == owner => s,
                _ => return Ok(None),
            };
            if let Some(name) = patch.name {
                story.name = name;
            }
            if let Some(email) = patch.email {
                story.email = Some(email);
            }
            if let Some(phone) = patch.phone {
                story.phone = Some(phone);
            }
            if let Some(kind) = patch.kind {
                story.kind = Some(kind);
            }
            Ok(Some(story.clone()))
        }

        async fn delete_owned(&self, id: Uuid, owner: Uuid) -> anyhow::Result<bool> {
            let mut guard = self.inner.lock();
            match guard.get(&id) {
                Some(s) if s.owner == owner => {
                    guard.remove(&id);
                    Ok(true)
                }
                _ => Ok(false),
            }
        }

        async fn set_photo(&self, id: Uuid, filename: &str) -> anyhow::Result<bool> {
            match self.inner.lock().get_mut(&id) {
                Some(s) => {
                    s.photo = Some(filename.to_string());
                    Ok(true)
                }
                None => Ok(false),
            }
        }
    }
}

pub use inmem::InMemoryStoryStore;
