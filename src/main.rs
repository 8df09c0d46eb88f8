use authgate::{
    app::build_router,
    config::{validate_production_config, ServerConfig, SessionConfig},
    db, AppState,
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
                .unwrap_or_else(|_| "authgate=debug,tower_http=debug,axum::rejection=trace".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    validate_production_config()?;
    let config = ServerConfig::from_env()?;

    // Database connection
    let pool = db::create_pool(&config.database_url).await?;
    db::run_migrations(&pool).await?;

    let app_state = AppState::from_pool(pool.clone());

    // Session store
    let session_store = SqliteStore::new(pool).with_table_name("sessions")?;
    session_store.migrate().await?;
    let session_layer = SessionConfig::from_env().create_layer(session_store);

    let app = build_router(app_state, session_layer);

    let addr = config.socket_addr()?;
    tracing::info!("Server running on http://{}", addr);

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
