//! Core trait abstractions - the seams between the pipeline and its
//! collaborators.

pub mod crawler;
pub mod directory;
pub mod embedder;
pub mod queue;
pub mod store;

pub use crawler::SiteCrawler;
pub use directory::{ChatbotDirectory, QuotaGate};
pub use embedder::Embedder;
pub use queue::TaskQueue;
pub use store::{DocumentStore, EmbeddingStore, JobStore};
