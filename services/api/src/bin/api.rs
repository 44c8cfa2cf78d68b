//! services/api/src/bin/api.rs

use async_openai::{config::OpenAIConfig, Client};
use sqlx::postgres::PgPoolOptions;
use std::sync::Arc;
use tokio_util::sync::CancellationToken;
use tracing::{error, info};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;
use wingman_api::{
    adapters::{DbAdapter, LocalDeviceEnvironment, OpenAiVisionAdapter, SupabaseStorageAdapter},
    config::Config,
    error::ApiError,
    web::{self, rest::ApiDoc, AppState},
};
use wingman_core::{Actions, DeviceEnvironment};

#[tokio::main]
async fn main() -> Result<(), ApiError> {
    // --- 1. Load Configuration & Set Up Logging ---
    let config = Arc::new(Config::from_env()?);
    tracing_subscriber::registry()
        .with(tracing_subscriber::EnvFilter::new(config.log_level.to_string()))
        .with(tracing_subscriber::fmt::layer())
        .init();
    info!("Configuration loaded. Starting server...");

    // --- 2. Connect to Database & Run Migrations ---
    info!("Connecting to database...");
    let db_pool = PgPoolOptions::new()
        .max_connections(5)
        .connect(&config.database_url)
        .await?;
    let db_adapter = Arc::new(DbAdapter::new(db_pool));
    info!("Running database migrations...");
    db_adapter.run_migrations().await?;
    info!("Database migrations complete.");

    // --- 3. Initialize Service Adapters ---
    let openai_config = OpenAIConfig::new().with_api_key(
        config
            .openai_api_key
            .as_ref()
            .ok_or(ApiError::MissingOpenAiKey)?,
    );
    let openai_client = Client::with_config(openai_config);
    let vision_adapter = Arc::new(OpenAiVisionAdapter::new(
        openai_client,
        config.vision_model.clone(),
    ));

    let storage_adapter = Arc::new(SupabaseStorageAdapter::new(
        config.supabase_url.clone(),
        config.supabase_service_key.clone(),
        config.storage_bucket.clone(),
    ));

    let device = Arc::new(LocalDeviceEnvironment::from_config(&config));
    let device_info = device.device_info().await?;
    info!(
        device_id = %device_info.device_id,
        country = ?device_info.country,
        "Device identified"
    );

    // --- 4. Build the Shared AppState ---
    let actions = Actions::new(db_adapter, storage_adapter, vision_adapter, device)
        .with_login_policy(config.login_policy);
    info!(policy = ?actions.login_policy(), "Login policy");
    let app_state = AppState::new(actions);

    // Resolve the session before the first client request, like the app's splash screen.
    let startup = app_state.session.fetch_current_user().await;
    info!(authenticated = startup.is_ok(), "Startup session lookup settled");

    // --- 5. Create the Web Router ---
    let app = web::router(app_state)
        .merge(SwaggerUi::new("/swagger-ui").url("/api-docs/openapi.json", ApiDoc::openapi()));

    // --- 6. Start the Server ---
    let shutdown = CancellationToken::new();
    tokio::spawn({
        let shutdown = shutdown.clone();
        async move {
            if let Err(e) = tokio::signal::ctrl_c().await {
                error!("Failed to listen for Ctrl-C: {:?}", e);
            }
            info!("Shutdown requested.");
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
        .with_graceful_shutdown(shutdown.cancelled_owned())
        .await?;

    info!("Server stopped.");
    Ok(())
}
