//! Task types - the durable-queue message for one slice of a job.

use serde::{Deserialize, Serialize};
use std::time::Duration;
use uuid::Uuid;

/// One bounded slice of a job's link set, delivered as a single
/// durable-queue message. Not separately persisted; the queue owns
/// delivery and redelivery.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TaskPayload {
    /// Owning chatbot
    pub chatbot_id: Uuid,

    /// Job whose counters this task advances
    pub job_id: i64,

    /// Links assigned to this task
    pub links: Vec<String>,
}

/// Delivery options for a task publish.
#[derive(Debug, Clone, Default)]
pub struct EnqueueOptions {
    /// Delay before the queue delivers the task
    pub delay: Duration,

    /// Optional queue-side deduplication key
    pub deduplication_id: Option<String>,
}

impl EnqueueOptions {
    /// Delay-only options.
    pub fn with_delay(delay: Duration) -> Self {
        Self {
            delay,
            deduplication_id: None,
        }
    }
}

/// Acknowledgement returned by the queue for a published task.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EnqueuedTask {
    /// Queue-assigned message identifier
    pub message_id: String,
}
