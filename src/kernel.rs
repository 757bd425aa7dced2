use std::collections::HashMap;

use anyhow::bail;
use async_trait::async_trait;
use axum::extract::Request;
use axum::handler::Handler;
use axum::http::Method;
use axum::middleware::{self, Next};
use axum::routing::{self, MethodRouter};
use axum::Router;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;
use tracing::info;

use crate::plugins::metrics::{track_requests, MetricsPlugin};

/// One row of a plugin's routing table. Paths are relative to the plugin's
/// mount point; `/` stands for the mount point itself.
pub struct RouteDef {
    pub method: Method,
    pub path: &'static str,
    handler: MethodRouter,
}

impl RouteDef {
    pub fn get<H, T>(path: &'static str, handler: H) -> Self
    where
        H: Handler<T, ()>,
        T: 'static,
    {
        Self {
            method: Method::GET,
            path,
            handler: routing::get(handler),
        }
    }

    pub fn post<H, T>(path: &'static str, handler: H) -> Self
    where
        H: Handler<T, ()>,
        T: 'static,
    {
        Self {
            method: Method::POST,
            path,
            handler: routing::post(handler),
        }
    }

    pub fn put<H, T>(path: &'static str, handler: H) -> Self
    where
        H: Handler<T, ()>,
        T: 'static,
    {
        Self {
            method: Method::PUT,
            path,
            handler: routing::put(handler),
        }
    }

    pub fn delete<H, T>(path: &'static str, handler: H) -> Self
    where
        H: Handler<T, ()>,
        T: 'static,
    {
        Self {
            method: Method::DELETE,
            path,
            handler: routing::delete(handler),
        }
    }
}

#[async_trait]
pub trait Plugin: Send + Sync {
    /// Routing table for this plugin. The kernel mounts every row under
    /// `/{name}` and refuses to start when two rows resolve to the same
    /// method and path.
    fn routes(&self) -> Vec<RouteDef>;

    /// Finishing pass over the assembled plugin router, for middleware and
    /// shared extensions.
    fn layer(&self, router: Router) -> Router {
        router
    }

    fn name(&self) -> &'static str;

    /// Optional lifecycle hook called before the plugin is mounted.
    async fn on_start(&self) {}

    /// Optional lifecycle hook called during graceful shutdown.
    async fn on_shutdown(&self) {}
}

/// Builds the application router by mounting each plugin's routes under
/// `/{plugin.name()}`. When a metrics plugin is supplied its request
/// middleware wraps every mounted router.
pub async fn build_app(
    plugins: &Vec<Box<dyn Plugin>>,
    metrics: Option<MetricsPlugin>,
) -> anyhow::Result<Router> {
    let mut claimed: HashMap<(Method, String), &'static str> = HashMap::new();
    let mut app = Router::new();

    for plugin in plugins.iter() {
        info!("starting plugin {}", plugin.name());
        plugin.on_start().await;

        let mut sub = Router::new();
        for def in plugin.routes() {
            let mounted = if def.path == "/" {
                format!("/{}", plugin.name())
            } else {
                format!("/{}{}", plugin.name(), def.path)
            };
            if let Some(earlier) = claimed.insert((def.method.clone(), mounted.clone()), plugin.name()) {
                bail!(
                    "duplicate route {} {} (claimed by {} and {})",
                    def.method,
                    mounted,
                    earlier,
                    plugin.name()
                );
            }
            sub = sub.route(def.path, def.handler);
        }

        let mut sub = plugin.layer(sub);

        if let Some(m) = &metrics {
            let counter = m.request_counter.clone();
            let duration = m.request_duration.clone();
            sub = sub.layer(middleware::from_fn(move |req: Request, next: Next| {
                track_requests(counter.clone(), duration.clone(), req, next)
            }));
        }

        // mount plugin under its name to namespace routes
        app = app.nest(&format!("/{}", plugin.name()), sub);
    }

    Ok(app
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive()))
}
