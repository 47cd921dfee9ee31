//! services/api/src/bin/api.rs

use neurone_profile_core::ports::DocumentStore;
use profile_api::{
    adapters::{DbAdapter, HttpAuthority, MemoryAdapter},
    config::{Config, StorageBackend},
    error::ApiError,
    web::{self, state::AppState},
};
use sqlx::postgres::PgPoolOptions;
use std::sync::Arc;
use tracing::{info, warn};
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

    // --- 2. Select the Document Store ---
    let store: Arc<dyn DocumentStore> = match config.storage_backend {
        StorageBackend::Postgres => {
            let database_url = config
                .database_url
                .as_deref()
                .ok_or_else(|| ApiError::Internal("DATABASE_URL is required".to_string()))?;
            info!("Connecting to database...");
            let db_pool = PgPoolOptions::new()
                .max_connections(config.db_max_connections)
                .connect(database_url)
                .await?;
            let db_adapter = DbAdapter::new(db_pool);
            info!("Running database migrations...");
            db_adapter.run_migrations().await?;
            info!("Database migrations complete.");
            Arc::new(db_adapter)
        }
        StorageBackend::Memory => {
            warn!("Using the in-memory store; nothing will survive a restart.");
            Arc::new(MemoryAdapter::default())
        }
    };

    // --- 3. Initialize the Auth Authority Client ---
    let authority = Arc::new(HttpAuthority::new(
        config.auth_url.clone(),
        config.auth_timeout,
    )?);
    if config.auth_disabled {
        warn!("AUTH_DISABLED is set; every request is accepted without a token check.");
    } else {
        info!("Validating bearer tokens against {}", config.auth_url);
    }

    // --- 4. Build the Shared AppState ---
    let app_state = Arc::new(AppState {
        store,
        authority,
        config: config.clone(),
    });

    // --- 5. Create the Web Router ---
    let app = web::router(app_state);

    // --- 6. Start the Server ---
    info!("Starting server on {}", config.bind_address);
    info!(
        "OpenAPI document available at http://{}/api-docs/openapi.json",
        config.bind_address
    );
    let listener = tokio::net::TcpListener::bind(&config.bind_address).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
