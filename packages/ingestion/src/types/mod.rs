//! Data types shared across the ingestion pipeline.

pub mod chatbot;
pub mod document;
pub mod filters;
pub mod job;
pub mod task;

pub use chatbot::Chatbot;
pub use document::{ChunkMetadata, Document, EmbeddedChunk, NewDocument, ParsedPage};
pub use filters::CrawlFilters;
pub use job::{Job, JobStatus, NewJob};
pub use task::{EnqueueOptions, EnqueuedTask, TaskPayload};
