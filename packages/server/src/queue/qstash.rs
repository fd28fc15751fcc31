//! QStash-backed durable task queue.
//!
//! Publishes task payloads to the QStash HTTP API for delayed delivery
//! back to our own task endpoint, and verifies the signature QStash
//! attaches to each delivery. Two signing keys are accepted so key
//! rotation never drops in-flight tasks.

use async_trait::async_trait;
use base64::engine::general_purpose::STANDARD as BASE64;
use base64::Engine;
use hmac::{Hmac, Mac};
use serde::Deserialize;
use sha2::Sha256;

use ingestion::error::QueueError;
use ingestion::traits::TaskQueue;
use ingestion::types::{EnqueueOptions, EnqueuedTask, TaskPayload};

type HmacSha256 = Hmac<Sha256>;

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct PublishResponse {
    message_id: String,
}

/// QStash client implementing the [`TaskQueue`] seam.
pub struct QstashQueue {
    client: reqwest::Client,
    base_url: String,
    token: String,

    /// Endpoint QStash delivers tasks to
    destination: String,

    current_signing_key: String,
    next_signing_key: String,
}

impl QstashQueue {
    pub fn new(
        base_url: impl Into<String>,
        token: impl Into<String>,
        destination: impl Into<String>,
        current_signing_key: impl Into<String>,
        next_signing_key: impl Into<String>,
    ) -> Self {
        Self {
            client: reqwest::Client::new(),
            base_url: base_url.into(),
            token: token.into(),
            destination: destination.into(),
            current_signing_key: current_signing_key.into(),
            next_signing_key: next_signing_key.into(),
        }
    }

    fn publish_url(&self) -> String {
        format!(
            "{}/v2/publish/{}",
            self.base_url.trim_end_matches('/'),
            self.destination
        )
    }

    fn verify_with_key(key: &str, body: &[u8], signature: &[u8]) -> bool {
        let Ok(mut mac) = HmacSha256::new_from_slice(key.as_bytes()) else {
            return false;
        };
        mac.update(body);
        mac.verify_slice(signature).is_ok()
    }
}

#[async_trait]
impl TaskQueue for QstashQueue {
    async fn enqueue(
        &self,
        task: &TaskPayload,
        options: EnqueueOptions,
    ) -> Result<EnqueuedTask, QueueError> {
        let mut request = self
            .client
            .post(self.publish_url())
            .bearer_auth(&self.token)
            .header("Upstash-Delay", format!("{}ms", options.delay.as_millis()))
            .json(task);

        if let Some(dedup_id) = &options.deduplication_id {
            request = request.header("Upstash-Deduplication-Id", dedup_id);
        }

        let response = request
            .send()
            .await
            .map_err(|e| QueueError::Publish(e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(QueueError::Publish(format!("HTTP {status}: {body}")));
        }

        let published: PublishResponse = response
            .json()
            .await
            .map_err(|e| QueueError::Publish(e.to_string()))?;

        Ok(EnqueuedTask {
            message_id: published.message_id,
        })
    }

    fn verify(&self, body: &[u8], signature: &str) -> Result<(), QueueError> {
        let signature = BASE64
            .decode(signature)
            .map_err(|_| QueueError::InvalidSignature)?;

        // Accept either key so rotation never drops in-flight tasks.
        let ok = Self::verify_with_key(&self.current_signing_key, body, &signature)
            || Self::verify_with_key(&self.next_signing_key, body, &signature);

        if ok {
            Ok(())
        } else {
            Err(QueueError::InvalidSignature)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sign(key: &str, body: &[u8]) -> String {
        let mut mac = HmacSha256::new_from_slice(key.as_bytes()).unwrap();
        mac.update(body);
        BASE64.encode(mac.finalize().into_bytes())
    }

    fn queue() -> QstashQueue {
        QstashQueue::new(
            "https://qstash.example",
            "token",
            "https://app.example/api/tasks/execute",
            "current-key",
            "next-key",
        )
    }

    #[test]
    fn test_valid_signature_passes() {
        let body = br#"{"chatbotId":"x","jobId":1,"links":[]}"#;
        let signature = sign("current-key", body);
        assert!(queue().verify(body, &signature).is_ok());
    }

    #[test]
    fn test_rotated_key_still_passes() {
        let body = b"payload";
        let signature = sign("next-key", body);
        assert!(queue().verify(body, &signature).is_ok());
    }

    #[test]
    fn test_tampered_body_is_rejected() {
        let signature = sign("current-key", b"original");
        assert!(matches!(
            queue().verify(b"tampered", &signature),
            Err(QueueError::InvalidSignature)
        ));
    }

    #[test]
    fn test_garbage_signature_is_rejected() {
        assert!(queue().verify(b"body", "not base64 !!!").is_err());
        assert!(queue().verify(b"body", &BASE64.encode(b"short")).is_err());
    }

    #[test]
    fn test_publish_url_handles_trailing_slash() {
        let queue = QstashQueue::new("https://qstash.example/", "t", "https://dest", "c", "n");
        assert_eq!(queue.publish_url(), "https://qstash.example/v2/publish/https://dest");
    }
}
