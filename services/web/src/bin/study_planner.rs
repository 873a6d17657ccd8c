//! services/web/src/bin/study_planner.rs

use std::sync::Arc;
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};
use web_lib::{
    adapters::GeminiGenerationAdapter,
    config::Config,
    error::ApiError,
    web::{build_router, state::AppState},
};

#[tokio::main]
async fn main() -> Result<(), ApiError> {
    // --- 1. Load Configuration ---
    // A missing API key stops the process before any socket or client is created.
    let config = match Config::from_env() {
        Ok(config) => Arc::new(config),
        Err(e) => {
            eprintln!("❌ {e}");
            std::process::exit(1);
        }
    };

    // --- 2. Set Up Logging ---
    tracing_subscriber::registry()
        .with(tracing_subscriber::EnvFilter::new(config.log_level.to_string()))
        .with(tracing_subscriber::fmt::layer())
        .init();
    info!("Configuration loaded. Starting server...");

    // --- 3. Initialize the Generation Adapter ---
    let generator = Arc::new(GeminiGenerationAdapter::from_config(&config));
    info!("Using model {} at {}", config.gemini_model, config.gemini_api_base);

    // --- 4. Build the Shared AppState and Router ---
    let app_state = Arc::new(AppState::new(config.clone(), generator));
    let app = build_router(app_state);

    // --- 5. Start the Server ---
    info!("Starting server on {}", config.bind_address);
    info!(
        "Swagger UI available at http://{}/swagger-ui",
        config.bind_address
    );
    let listener = tokio::net::TcpListener::bind(&config.bind_address).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
