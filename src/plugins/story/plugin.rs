use axum::extract::DefaultBodyLimit;
use axum::{middleware, Extension, Router};

use crate::kernel::{Plugin, RouteDef};
use crate::plugins::auth::middleware::require_auth;
use crate::plugins::story::handlers;
use crate::plugins::story::service::StoryService;

pub struct StoryPlugin {
    service: StoryService,
}

impl StoryPlugin {
    pub fn new(service: StoryService) -> Self {
        Self { service }
    }
}

#[async_trait::async_trait]
impl Plugin for StoryPlugin {
    fn routes(&self) -> Vec<RouteDef> {
        vec![
            RouteDef::get("/", handlers::list_stories),
            RouteDef::post("/", handlers::create_story),
            RouteDef::get("/:id", handlers::get_story),
            RouteDef::put("/:id", handlers::update_story),
            RouteDef::delete("/:id", handlers::delete_story),
            RouteDef::put("/:id/photo", handlers::upload_story_photo),
        ]
    }

    fn layer(&self, router: Router) -> Router {
        // headroom over the payload ceiling for multipart framing
        let body_limit = (self.service.max_upload_bytes() as usize).saturating_add(1024 * 1024);
        router
            .layer(middleware::from_fn(require_auth))
            .layer(Extension(self.service.clone()))
            .layer(DefaultBodyLimit::max(body_limit))
    }

    fn name(&self) -> &'static str {
        "api/story"
    }

    async fn on_start(&self) {
        tracing::info!("story plugin started");
    }
}
