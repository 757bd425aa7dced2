use axum::{Extension, Router};
use sqlx::PgPool;

use crate::kernel::{Plugin, RouteDef};
use crate::plugins::users::handlers;

pub struct UsersPlugin {
    pub pool: PgPool,
}

impl UsersPlugin {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait::async_trait]
impl Plugin for UsersPlugin {
    fn routes(&self) -> Vec<RouteDef> {
        vec![RouteDef::post("/", handlers::register)]
    }

    fn layer(&self, router: Router) -> Router {
        router.layer(Extension(self.pool.clone()))
    }

    fn name(&self) -> &'static str {
        "api/users"
    }
}
