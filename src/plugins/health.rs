use crate::kernel::{Plugin, RouteDef};
use axum::Json;
use serde::Serialize;

#[derive(Serialize)]
struct Health {
    status: &'static str,
    version: &'static str,
}

pub struct HealthPlugin;

#[axum::debug_handler]
async fn health_handler() -> Json<Health> {
    Json(Health {
        status: "ok",
        version: env!("CARGO_PKG_VERSION"),
    })
}

#[async_trait::async_trait]
impl Plugin for HealthPlugin {
    fn routes(&self) -> Vec<RouteDef> {
        vec![RouteDef::get("/", health_handler)]
    }

    fn name(&self) -> &'static str {
        "health"
    }

    async fn on_start(&self) {
        tracing::info!("health plugin started");
    }
}
