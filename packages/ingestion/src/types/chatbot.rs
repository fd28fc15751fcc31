//! Chatbot lookup record - the external owner of a knowledge base.

use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// The slice of a chatbot record the pipeline needs. Chatbot management
/// itself is an external concern; this is a read-only projection.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Chatbot {
    /// Chatbot identifier
    pub id: Uuid,

    /// Display name of the site the chatbot answers for
    pub name: String,

    /// Website URL the chatbot is trained on
    pub url: String,

    /// Owning organization
    pub organization_id: i64,
}
