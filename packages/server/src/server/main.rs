// Main entry point for the ingestion API server

use std::sync::Arc;

use anyhow::{Context, Result};
use sqlx::postgres::PgPoolOptions;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use ingestion::crawler::HttpCrawler;
use ingestion::pipeline::PipelineDeps;
use server_core::embeddings::OpenAiEmbedder;
use server_core::queue::QstashQueue;
use server_core::stores::{
    PgChatbotDirectory, PgDocumentStore, PgEmbeddingStore, PgJobStore, PgQuotaGate,
};
use server_core::{build_router, AppState, Config};

#[tokio::main]
async fn main() -> Result<()> {
    // Initialize logging
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "info,server_core=debug,ingestion=debug,sqlx=warn".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    tracing::info!("Starting ingestion API");

    // Load configuration
    let config = Config::from_env().context("Failed to load configuration")?;
    tracing::info!("Configuration loaded");

    // Connect to database
    tracing::info!("Connecting to database...");
    let pool = PgPoolOptions::new()
        .max_connections(10)
        .connect(&config.database_url)
        .await
        .context("Failed to connect to database")?;
    tracing::info!("Database connected");

    // Run migrations
    tracing::info!("Running database migrations...");
    sqlx::migrate!("./migrations")
        .run(&pool)
        .await
        .context("Failed to run migrations")?;
    tracing::info!("Migrations complete");

    let crawler = HttpCrawler::new().context("Failed to build crawler")?;
    let queue = QstashQueue::new(
        config.qstash_url.clone(),
        config.qstash_token.clone(),
        config.task_destination_url.clone(),
        config.qstash_current_signing_key.clone(),
        config.qstash_next_signing_key.clone(),
    );

    let deps = PipelineDeps {
        crawler: Arc::new(crawler),
        directory: Arc::new(PgChatbotDirectory::new(pool.clone())),
        quota: Arc::new(PgQuotaGate::new(pool.clone())),
        jobs: Arc::new(PgJobStore::new(pool.clone())),
        documents: Arc::new(PgDocumentStore::new(pool.clone())),
        embeddings: Arc::new(PgEmbeddingStore::new(pool.clone())),
        embedder: Arc::new(OpenAiEmbedder::new(config.openai_api_key.clone())),
        queue: Arc::new(queue),
        chunk_size: config.document_chunk_size,
    };

    let app = build_router(AppState::new(deps));

    // Start server
    let addr = format!("0.0.0.0:{}", config.port);
    tracing::info!("Starting server on {}", addr);
    tracing::info!("Health check: http://localhost:{}/health", config.port);

    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .context("Failed to bind to address")?;

    axum::serve(listener, app).await.context("Server error")?;

    Ok(())
}
