use sqlx::{Pool, Postgres};

pub type DbPool = Pool<Postgres>;

pub async fn init_db(database_url: &str, max_connections: u32) -> anyhow::Result<DbPool> {
    let pool = sqlx::postgres::PgPoolOptions::new()
        .max_connections(max_connections)
        .connect(database_url)
        .await?;

    tracing::info!("running schema bootstrap");
    sqlx::migrate!().run(&pool).await?;

    Ok(pool)
}
