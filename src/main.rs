// CRUD API Generator Server

use axum::http::HeaderValue;
use tokio::net::TcpListener;
use tower::ServiceBuilder;
use tower_http::cors::{Any, CorsLayer};
use tracing::info;
use tracing_subscriber::EnvFilter;

use crud_generator::{
    app_state::AppState,
    config::Config,
    generator_interface::create_app_router,
};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize tracing
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    // Load configuration
    let config = Config::from_env()?;

    // Initialize application state
    let app_state = AppState::new(&config)?;

    let cors = CorsLayer::new()
        .allow_origin(config.server.cors_allowed_origin.parse::<HeaderValue>()?)
        .allow_methods(Any)
        .allow_headers(Any);

    // Build main application router
    let app = create_app_router(app_state).layer(ServiceBuilder::new().layer(cors));

    // Start server
    let addr = config.server_address();
    info!("CRUD API Generator starting on http://{}", addr);
    info!("  POST /api/v1/generate              - Download generated project (zip)");
    info!("  POST /api/v1/generate-preview      - Preview models.py and main.py");
    info!("  POST /api/v1/parse-text-to-schema  - Infer a schema from free text");

    let listener = TcpListener::bind(&addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
