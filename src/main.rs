use cash_drawer::{
    api::{self, AppState},
    config::{database, settings},
    core::employee,
    errors::Result,
};
use dotenvy::dotenv;
use std::sync::Arc;
use tower_http::cors::{Any, CorsLayer};
use tracing::{error, info};
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> Result<()> {
    // 1. Initialize tracing (as early as possible)
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    // 2. Load .env file, env vars can also be set externally
    dotenv().ok();

    // 3. Load settings (config.toml or defaults)
    let settings = settings::load_default_settings()
        .inspect_err(|e| error!("Failed to load settings: {}", e))?;
    info!(
        denominations = settings.denominations.len(),
        "Settings loaded"
    );

    // 4. Connect and create tables
    let db = database::create_connection()
        .await
        .inspect_err(|e| error!("Failed to connect to database: {}", e))?;
    database::create_tables(&db)
        .await
        .inspect(|_| info!("Database initialized successfully."))
        .inspect_err(|e| error!("Failed to create tables: {}", e))?;

    // 5. Seed employees from config
    employee::seed_employees(&db, &settings.employees)
        .await
        .inspect_err(|e| error!("Failed to seed employees: {}", e))?;

    // 6. Serve the API
    let bind_address = settings.server.bind_address.clone();
    let state = AppState::new(db, Arc::new(settings));
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);
    let app = api::router(state).layer(cors);

    let listener = tokio::net::TcpListener::bind(&bind_address)
        .await
        .inspect_err(|e| error!("Failed to bind {}: {}", bind_address, e))?;
    info!("Cash drawer service listening on {}", bind_address);
    axum::serve(listener, app).await?;

    Ok(())
}
