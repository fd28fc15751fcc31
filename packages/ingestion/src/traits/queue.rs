//! Durable task queue trait.
//!
//! A narrow seam with exactly two capabilities - enqueue-with-delay and
//! inbound signature verification - so alternate durable-queue backends
//! can be substituted without touching job orchestration or the task
//! execution handler.

use async_trait::async_trait;

use crate::error::QueueError;
use crate::types::{EnqueueOptions, EnqueuedTask, TaskPayload};

/// Abstract durable queue for task messages.
#[async_trait]
pub trait TaskQueue: Send + Sync {
    /// Publish a task for later delivery, honoring the delivery delay
    /// and optional deduplication id.
    async fn enqueue(
        &self,
        task: &TaskPayload,
        options: EnqueueOptions,
    ) -> Result<EnqueuedTask, QueueError>;

    /// Verify the authenticity of an inbound delivery: the signature
    /// must match the raw request body under the current or next
    /// signing key (both accepted to support key rotation).
    ///
    /// Callers must reject the request before any further processing
    /// when this fails.
    fn verify(&self, body: &[u8], signature: &str) -> Result<(), QueueError>;
}
