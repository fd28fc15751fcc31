//! Website Knowledge-Base Ingestion Library
//!
//! Turns a customer website into an embedded knowledge base: discover
//! pages from the sitemap, fetch and extract readable content, convert
//! it to markdown, deduplicate by content hash, split into chunks, and
//! index chunk embeddings - all orchestrated as durable-queue tasks so
//! a crawl survives process restarts and rate limits.
//!
//! # Usage
//!
//! ```rust,ignore
//! use ingestion::pipeline::{create_job, execute_task, PipelineDeps};
//! use ingestion::types::CrawlFilters;
//!
//! // Wire real backends (Postgres stores, QStash queue, OpenAI
//! // embedder) or the mocks from `testing` into PipelineDeps, then:
//! let chatbot = create_job(&deps, chatbot_id, &CrawlFilters::none()).await?;
//! ```
//!
//! # Modules
//!
//! - [`traits`] - Core trait abstractions (crawler, stores, queue, embedder)
//! - [`types`] - Jobs, documents, tasks, filters
//! - [`pipeline`] - Job creation and task execution
//! - [`crawler`] - HTTP crawler and sitemap parsing
//! - [`parser`] - Readable-content extraction to markdown
//! - [`splitter`] - Recursive character text splitting
//! - [`stores`] - Storage implementations (MemoryStore)
//! - [`testing`] - Mock implementations for testing

pub mod batch;
pub mod crawler;
pub mod dedup;
pub mod error;
pub mod parser;
pub mod pipeline;
pub mod splitter;
pub mod stores;
pub mod testing;
pub mod traits;
pub mod types;

// Re-export core types at crate root
pub use error::{
    CrawlError, EmbedError, JobCreationError, ParseError, QueueError, StoreError, TaskError,
};
pub use pipeline::{create_job, execute_task, PipelineDeps, TaskReport};
pub use types::{Chatbot, CrawlFilters, Document, Job, JobStatus, TaskPayload};
