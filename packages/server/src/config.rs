use anyhow::{Context, Result};
use dotenvy::dotenv;
use std::env;

/// Application configuration loaded from environment variables
#[derive(Debug, Clone)]
pub struct Config {
    pub database_url: String,
    pub port: u16,
    pub openai_api_key: String,

    /// Base URL of the QStash API
    pub qstash_url: String,

    /// Bearer token for publishing
    pub qstash_token: String,

    /// Publicly reachable URL of the task execution endpoint; QStash
    /// delivers tasks here
    pub task_destination_url: String,

    /// Active signing key for inbound delivery signatures
    pub qstash_current_signing_key: String,

    /// Next signing key, accepted during key rotation
    pub qstash_next_signing_key: String,

    /// Chunk size in characters for document splitting
    pub document_chunk_size: usize,
}

impl Config {
    /// Load configuration from environment variables
    pub fn from_env() -> Result<Self> {
        // Load .env file if present (development)
        let _ = dotenv();

        Ok(Self {
            database_url: env::var("DATABASE_URL").context("DATABASE_URL must be set")?,
            port: env::var("PORT")
                .unwrap_or_else(|_| "8080".to_string())
                .parse()
                .context("PORT must be a valid number")?,
            openai_api_key: env::var("OPENAI_API_KEY").context("OPENAI_API_KEY must be set")?,
            qstash_url: env::var("QSTASH_URL")
                .unwrap_or_else(|_| "https://qstash.upstash.io".to_string()),
            qstash_token: env::var("QSTASH_TOKEN").context("QSTASH_TOKEN must be set")?,
            task_destination_url: env::var("TASK_DESTINATION_URL")
                .context("TASK_DESTINATION_URL must be set")?,
            qstash_current_signing_key: env::var("QSTASH_CURRENT_SIGNING_KEY")
                .context("QSTASH_CURRENT_SIGNING_KEY must be set")?,
            qstash_next_signing_key: env::var("QSTASH_NEXT_SIGNING_KEY")
                .context("QSTASH_NEXT_SIGNING_KEY must be set")?,
            document_chunk_size: env::var("DOCUMENT_CHUNK_SIZE")
                .unwrap_or_else(|_| "1500".to_string())
                .parse()
                .context("DOCUMENT_CHUNK_SIZE must be a valid number")?,
        })
    }
}
