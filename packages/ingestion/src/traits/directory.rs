//! External collaborator traits: chatbot lookup and the quota gate.

use async_trait::async_trait;
use uuid::Uuid;

use crate::error::StoreResult;
use crate::types::Chatbot;

/// Read-only lookup of chatbot records owned by the dashboard.
#[async_trait]
pub trait ChatbotDirectory: Send + Sync {
    /// Fetch a chatbot by id.
    async fn get_chatbot(&self, id: Uuid) -> StoreResult<Chatbot>;
}

/// External capability gate limiting how many documents an organization
/// may index. Billing and plan logic live behind it; the pipeline only
/// consumes the boolean.
#[async_trait]
pub trait QuotaGate: Send + Sync {
    /// Whether the organization may index `requested` more documents.
    async fn can_index_documents(&self, organization_id: i64, requested: usize)
        -> StoreResult<bool>;
}
