//! HTTP server wiring for the ingestion pipeline.
//!
//! Exposes job creation, job polling, and the queue's task delivery
//! endpoint over Axum, backed by Postgres stores, the QStash queue,
//! and the OpenAI embedder.

pub mod chatbots;
pub mod config;
pub mod embeddings;
pub mod queue;
pub mod server;
pub mod stores;

pub use config::Config;
pub use server::{build_router, AppState};
