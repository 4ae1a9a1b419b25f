use orca::{
    build_router,
    config::{session::session_layer, AppConfig},
    db,
    services::bootstrap::ensure_default_admin,
    AppState,
};
use tower_sessions_sqlx_store::SqliteStore;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Load environment variables
    dotenvy::dotenv().ok();

    // Initialize tracing
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "orca=debug,tower_http=debug,axum::rejection=trace".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    // Rejects unsafe production settings
    let config = AppConfig::from_env()?;

    // Database connection and schema
    let pool = db::create_pool(&config.database_url).await?;
    db::migrate(&pool).await?;

    let app_state = AppState::new(pool.clone());

    ensure_default_admin(&app_state.user_service, config.admin_seed.as_ref()).await?;

    // Session store
    let session_store = SqliteStore::new(pool.clone()).with_table_name("sessions")?;
    session_store.migrate().await?;

    let app = build_router(app_state).layer(session_layer(session_store, &config));

    let addr = config.socket_addr();
    tracing::info!("Server running on http://{}", addr);

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
