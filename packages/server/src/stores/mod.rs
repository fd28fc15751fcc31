//! Postgres-backed store implementations.

pub mod postgres;

pub use postgres::{
    PgChatbotDirectory, PgDocumentStore, PgEmbeddingStore, PgJobStore, PgQuotaGate,
};
