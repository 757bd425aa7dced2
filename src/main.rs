use std::net::SocketAddr;

use dotenvy::dotenv;
use tokio::net::TcpListener;
use tower_http::services::ServeDir;

use storykeeper_api_kernel::config::AppConfig;
use storykeeper_api_kernel::db;
use storykeeper_api_kernel::kernel::{build_app, Plugin};
use storykeeper_api_kernel::plugins::auth::AuthPlugin;
use storykeeper_api_kernel::plugins::health::HealthPlugin;
use storykeeper_api_kernel::plugins::metrics::MetricsPlugin;
use storykeeper_api_kernel::plugins::story::service::StoryService;
use storykeeper_api_kernel::plugins::story::store::PgStoryStore;
use storykeeper_api_kernel::plugins::story::StoryPlugin;
use storykeeper_api_kernel::plugins::users::UsersPlugin;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt::init();

    // load environment and initialize DB
    dotenv().ok();
    let config = AppConfig::from_env();
    let pool = db::init_db(&config.database_url, config.db_max_connections).await?;

    let store = PgStoryStore::new(pool.clone()).into_arc();
    let story_service = StoryService::new(store, config.uploads.clone(), config.strict_ownership_on_read);

    // instantiate plugins
    let metrics_plugin = MetricsPlugin::new();
    let plugins_vec: Vec<Box<dyn Plugin>> = vec![
        Box::new(HealthPlugin),
        Box::new(UsersPlugin::new(pool.clone())),
        Box::new(AuthPlugin::new(pool.clone())),
        Box::new(StoryPlugin::new(story_service)),
    ];

    let plugin_names: Vec<&'static str> = plugins_vec.iter().map(|p| p.name()).collect();
    tracing::info!("mounting plugins: {:?}", plugin_names);

    // build app and pass metrics plugin so each plugin router is instrumented with route labels
    let mut app = build_app(&plugins_vec, Some(metrics_plugin.clone())).await?;

    // expose metrics at /metrics (not instrumented to avoid double-counting)
    app = app.nest("/metrics", metrics_plugin.router());
    // uploaded story photos are served read-only
    app = app.nest_service("/uploads", ServeDir::new(&config.uploads.dir));

    let addr: SocketAddr = format!("0.0.0.0:{}", config.port).parse()?;
    let listener = TcpListener::bind(addr).await?;
    tracing::info!("listening on {}", addr);

    axum::serve(listener, app)
        .with_graceful_shutdown(async move {
            let _ = tokio::signal::ctrl_c().await;
            // call plugin shutdown hooks
            for p in plugins_vec.iter() {
                p.on_shutdown().await;
            }
        })
        .await?;

    Ok(())
}
