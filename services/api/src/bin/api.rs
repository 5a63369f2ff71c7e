//! services/api/src/bin/api.rs

use api_lib::{
    adapters::{DbAdapter, FileStore, OpenAiChatAdapter},
    config::Config,
    error::ApiError,
    web::{build_router, state::AppState},
};
use async_openai::{config::OpenAIConfig, Client};
use sqlx::postgres::PgPoolOptions;
use std::sync::Arc;
use tokio_util::sync::CancellationToken;
use tracing::{error, info};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() -> Result<(), ApiError> {
    // --- 1. Load Configuration & Set Up Logging ---
    let config = Arc::new(Config::from_env()?);
    tracing_subscriber::registry()
        .with(tracing_subscriber::EnvFilter::new(config.log_level.to_string()))
        .with(tracing_subscriber::fmt::layer())
        .init();
    info!("Configuration loaded. Starting server...");

    // --- 2. Open the JSON-file store ---
    info!("Opening data directory {}", config.data_dir.display());
    let file_store = Arc::new(FileStore::open(&config.data_dir).await?);
    let mut app_state = AppState::from_file_store(config.clone(), file_store);

    // --- 3. Optionally move meal plans and chat to PostgreSQL ---
    if let Some(database_url) = &config.database_url {
        info!("Connecting to database...");
        let db_pool = PgPoolOptions::new()
            .max_connections(5)
            .connect(database_url)
            .await?;
        let db_adapter = Arc::new(DbAdapter::new(db_pool));
        info!("Running database migrations...");
        db_adapter.run_migrations().await?;
        info!("Database migrations complete. Meal plans and chat use PostgreSQL.");
        app_state.meal_plans = db_adapter.clone();
        app_state.chat = db_adapter;
    }

    // --- 4. Pick the chat responder ---
    match &config.openai_api_key {
        Some(api_key) => {
            let client = Client::with_config(OpenAIConfig::new().with_api_key(api_key));
            app_state.responder = Arc::new(OpenAiChatAdapter::new(client, config.chat_model.clone()));
            info!("Chat uses model {}", config.chat_model);
        }
        None => info!("OPENAI_API_KEY not set; chat replies are echoed."),
    }

    // --- 5. Create the Web Router ---
    let app = build_router(Arc::new(app_state))?;

    // --- 6. Start the Server ---
    let shutdown = CancellationToken::new();
    tokio::spawn({
        let shutdown = shutdown.clone();
        async move {
            if let Err(e) = tokio::signal::ctrl_c().await {
                error!("Failed to listen for Ctrl-C: {:?}", e);
            }
            info!("Shutdown signal received.");
            shutdown.cancel();
        }
    });

    info!("Starting server on {}", config.bind_address);
    info!(
        "Swagger UI available at http://{}/swagger-ui",
        config.bind_address
    );
    let listener = tokio::net::TcpListener::bind(&config.bind_address).await?;
    axum::serve(listener, app)
        .with_graceful_shutdown(async move { shutdown.cancelled().await })
        .await?;

    info!("Server stopped.");
    Ok(())
}
