//! Document types - ingested pages and their embedded chunks.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// One ingested page. Created only after the dedup gate confirms no
/// prior document for the same chatbot shares its content hash; never
/// updated afterwards.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Document {
    /// Store-assigned identifier
    pub id: i64,

    /// Owning chatbot
    pub chatbot_id: Uuid,

    /// Owning organization
    pub organization_id: i64,

    /// Page title
    pub title: String,

    /// Page content as markdown
    pub content: String,

    /// When the document was ingested
    pub created_at: DateTime<Utc>,
}

/// Fields needed to insert a new document row.
#[derive(Debug, Clone)]
pub struct NewDocument {
    /// Owning chatbot
    pub chatbot_id: Uuid,

    /// Owning organization
    pub organization_id: i64,

    /// Page title
    pub title: String,

    /// Page content as markdown
    pub content: String,
}

/// Metadata attached to every embedded chunk. The `hash` field equals
/// the parent document's content hash and, together with `chatbot_id`,
/// is the dedup lookup key. Serialized camelCase to match the stored
/// JSONB keys.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ChunkMetadata {
    /// Parent document title
    pub title: String,

    /// Parent document content hash (SHA-256, hex)
    pub hash: String,

    /// Source page URL
    pub url: String,

    /// Owning organization
    pub organization_id: i64,

    /// Owning chatbot
    pub chatbot_id: Uuid,

    /// Parent document id
    pub document_id: i64,
}

/// A chunk of document text with its embedding vector, ready to be
/// appended to the vector store.
#[derive(Debug, Clone)]
pub struct EmbeddedChunk {
    /// Chunk text
    pub content: String,

    /// Embedding vector from the provider
    pub embedding: Vec<f32>,

    /// Chunk metadata
    pub metadata: ChunkMetadata,
}

/// The result of extracting readable content from a page.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParsedPage {
    /// Resolved page title
    pub title: String,

    /// Main content converted to markdown
    pub content: String,
}
