use async_trait::async_trait;
use axum::{Extension, Router};
use sqlx::PgPool;

use crate::kernel::{Plugin, RouteDef};
use crate::plugins::auth::handlers;

pub struct AuthPlugin {
    pool: PgPool,
}

impl AuthPlugin {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl Plugin for AuthPlugin {
    fn routes(&self) -> Vec<RouteDef> {
        // whoami guards itself through the AuthUser extractor
        vec![
            RouteDef::post("/login", handlers::login),
            RouteDef::get("/whoami", handlers::whoami),
        ]
    }

    fn layer(&self, router: Router) -> Router {
        router.layer(Extension(self.pool.clone()))
    }

    fn name(&self) -> &'static str {
        "api/auth"
    }
}
