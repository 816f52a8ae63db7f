use std::sync::Arc;

use member_search::{
    app_state::AppState,
    get_postgres_pool,
    services::data_stores::PostgresMemberStore,
    utils::{
        constants::{APP_ADDRESS, DATABASE_URL},
        tracing::init_tracing,
    },
    Application,
};
use sqlx::PgPool;
use tokio::sync::RwLock;

#[tokio::main]
async fn main() {
    color_eyre::install().expect("Failed to install color_eyre");
    init_tracing().expect("Failed to initialize tracing");

    let pg_pool = configure_postgresql().await;
    let member_store = Arc::new(RwLock::new(PostgresMemberStore::new(pg_pool)));
    let app_state = AppState::new(member_store);

    let app = Application::build(app_state, &APP_ADDRESS)
        .await
        .expect("Failed to build app");

    app.run().await.expect("Failed to run app");
}

async fn configure_postgresql() -> PgPool {
    let pg_pool = get_postgres_pool(&DATABASE_URL)
        .await
        .expect("Failed to create Postgres connection pool!");

    sqlx::migrate!()
        .run(&pg_pool)
        .await
        .expect("Failed to run migrations");

    pg_pool
}
