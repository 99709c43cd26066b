//! services/api/src/bin/api.rs

use api_lib::{
    adapters::{load_corpus, InMemoryPositionStore, PgPositionStore},
    config::{Config, ConfigError},
    error::ApiError,
    web::{router, AppState},
};
use axum::http::{header::CONTENT_TYPE, HeaderName, HeaderValue, Method};
use sqlx::postgres::PgPoolOptions;
use std::sync::Arc;
use tilawah_core::ports::PositionStore;
use tilawah_core::reference::ReferenceIndex;
use tokio_util::sync::CancellationToken;
use tower_http::{cors::CorsLayer, trace::TraceLayer};
use tracing::{info, warn};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() -> Result<(), ApiError> {
    // --- 1. Load Configuration & Set Up Logging ---
    let config = Config::from_env()?;
    tracing_subscriber::registry()
        .with(tracing_subscriber::EnvFilter::new(config.log_level.to_string()))
        .with(tracing_subscriber::fmt::layer())
        .init();
    info!("Configuration loaded. Starting server...");

    // --- 2. Reference Data & Corpus ---
    let index = Arc::new(ReferenceIndex::standard()?);
    info!(
        chapters = index.chapters().len(),
        parts = index.parts().len(),
        verses = index.total_verses(),
        "Reference index validated."
    );

    let corpus = match &config.corpus_path {
        Some(path) => load_corpus(path, &index).await?,
        None => {
            warn!("CORPUS_PATH is not set; serving verse positions without text.");
            index.placeholder_corpus()
        }
    };
    let corpus = Arc::new(corpus);

    // --- 3. Position Store ---
    let store: Arc<dyn PositionStore> = match &config.database_url {
        Some(url) => {
            info!("Connecting to database...");
            let db_pool = PgPoolOptions::new().max_connections(5).connect(url).await?;
            let db_adapter = PgPositionStore::new(db_pool);
            info!("Running database migrations...");
            db_adapter.run_migrations().await?;
            info!("Database migrations complete.");
            Arc::new(db_adapter)
        }
        None => {
            warn!("DATABASE_URL is not set; reading state will not survive a restart.");
            Arc::new(InMemoryPositionStore::new())
        }
    };

    // --- 4. Build the Shared AppState & Router ---
    let app_state = Arc::new(AppState::new(store, index, corpus));

    let origin = config.cors_origin.parse::<HeaderValue>().map_err(|e| {
        ConfigError::InvalidValue("CORS_ORIGIN".to_string(), e.to_string())
    })?;
    let cors = CorsLayer::new()
        .allow_origin(origin)
        .allow_methods([Method::GET, Method::POST, Method::OPTIONS])
        .allow_headers([CONTENT_TYPE, HeaderName::from_static("x-user-id")]);

    let app = router(app_state.clone())
        .layer(cors)
        .layer(TraceLayer::new_for_http());

    // --- 5. Start the Server ---
    let shutdown = CancellationToken::new();
    let signal_token = shutdown.clone();
    tokio::spawn(async move {
        if let Err(e) = tokio::signal::ctrl_c().await {
            warn!("Failed to listen for the shutdown signal: {}", e);
        }
        signal_token.cancel();
    });

    // Idle sessions are flushed and dropped so their workers stop.
    let sweep_state = app_state.clone();
    let sweep_token = shutdown.clone();
    let idle_timeout = config.reader_idle_timeout;
    tokio::spawn(async move {
        let mut ticker = tokio::time::interval(idle_timeout);
        loop {
            tokio::select! {
                _ = sweep_token.cancelled() => break,
                _ = ticker.tick() => {
                    sweep_state.evict_idle(idle_timeout).await;
                }
            }
        }
    });

    info!("Starting server on {}", config.bind_address);
    let listener = tokio::net::TcpListener::bind(&config.bind_address).await?;
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown.cancelled_owned())
        .await?;

    // --- 6. Drain Pending Writes ---
    app_state.settle_all().await;
    info!("Server stopped.");
    Ok(())
}
