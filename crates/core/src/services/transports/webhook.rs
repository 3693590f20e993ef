//! Webhook delivery to an organization's configured endpoint.

use base64::{Engine, engine::general_purpose::STANDARD};
use serde::Serialize;
use sha2::Sha256;

use crate::types::{RenderedMessage, TransportResult};

/// Envelope posted to the org's webhook URL.
#[derive(Debug, Serialize)]
pub struct WebhookEnvelope {
    pub event: String,
    pub org: String,
    pub subject: String,
    pub message: String,
    pub data: serde_json::Value,
    pub timestamp: String,
}

/// Posts rendered messages to an org-level webhook endpoint (Slack, Discord,
/// custom receivers).
#[derive(Clone)]
pub struct WebhookTransport {
    http_client: reqwest::Client,
}

impl WebhookTransport {
    #[must_use]
    #[allow(clippy::expect_used)] // Client build only fails with incompatible TLS settings
    pub fn new() -> Self {
        let http_client = reqwest::Client::builder()
            .timeout(std::time::Duration::from_secs(10))
            .build()
            .expect("Failed to create HTTP client");

        Self { http_client }
    }

    /// Create a transport with a short request timeout.
    #[must_use]
    #[allow(clippy::expect_used)] // Client build only fails with incompatible TLS settings
    pub fn with_timeout(timeout: std::time::Duration) -> Self {
        let http_client = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .expect("Failed to create HTTP client");

        Self { http_client }
    }

    /// Post the message envelope to the webhook URL.
    ///
    /// One endpoint, one attempt: the result is `{1, 0}` on a 2xx response
    /// and `{0, 1}` on anything else, including transport-level failures.
    pub async fn deliver(
        &self,
        webhook_url: &str,
        webhook_secret: Option<&str>,
        org_name: &str,
        message: &RenderedMessage,
    ) -> TransportResult {
        let envelope = WebhookEnvelope {
            event: message.kind.as_str().to_string(),
            org: org_name.to_string(),
            subject: message.subject.clone(),
            message: message.body_text.clone(),
            data: serde_json::Value::Object(message.body_json.clone()),
            timestamp: chrono::Utc::now().to_rfc3339(),
        };

        let Ok(payload) = serde_json::to_string(&envelope) else {
            tracing::warn!(url = %webhook_url, "Webhook payload serialization failed");
            return TransportResult { sent: 0, errors: 1 };
        };

        let mut request = self
            .http_client
            .post(webhook_url)
            .header("Content-Type", "application/json");

        if let Some(secret) = webhook_secret {
            request = request.header("X-MTS-Signature", sign_payload(&payload, secret));
        }

        match request.body(payload).send().await {
            Ok(response) if response.status().is_success() => {
                TransportResult { sent: 1, errors: 0 }
            }
            Ok(response) => {
                tracing::warn!(
                    url = %webhook_url,
                    status = %response.status(),
                    "Webhook endpoint rejected delivery"
                );
                TransportResult { sent: 0, errors: 1 }
            }
            Err(e) => {
                tracing::warn!(url = %webhook_url, error = %e, "Webhook delivery failed");
                TransportResult { sent: 0, errors: 1 }
            }
        }
    }
}

impl Default for WebhookTransport {
    fn default() -> Self {
        Self::new()
    }
}

/// HMAC-SHA256 over the exact serialized payload, base64-encoded.
///
/// Receivers verify against the raw request body, so the signed bytes must
/// be the bytes that go on the wire.
#[must_use]
#[allow(clippy::expect_used)] // HMAC accepts any key size, this cannot fail
pub fn sign_payload(payload: &str, secret: &str) -> String {
    use hmac::{Hmac, Mac};

    type HmacSha256 = Hmac<Sha256>;

    let mut mac =
        HmacSha256::new_from_slice(secret.as_bytes()).expect("HMAC can take key of any size");
    mac.update(payload.as_bytes());
    STANDARD.encode(mac.finalize().into_bytes())
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::services::renderer::render_message;
    use crate::types::NotificationKind;

    #[test]
    fn test_signature_is_deterministic_base64() {
        let a = sign_payload(r#"{"event":"welcome"}"#, "secret");
        let b = sign_payload(r#"{"event":"welcome"}"#, "secret");
        assert_eq!(a, b);
        assert!(STANDARD.decode(&a).is_ok());
        // SHA-256 digest is 32 bytes
        assert_eq!(STANDARD.decode(&a).unwrap().len(), 32);
    }

    #[test]
    fn test_signature_varies_with_secret_and_payload() {
        let base = sign_payload("payload", "secret");
        assert_ne!(base, sign_payload("payload", "other-secret"));
        assert_ne!(base, sign_payload("other-payload", "secret"));
    }

    #[tokio::test]
    async fn test_unreachable_endpoint_counts_one_error() {
        let transport = WebhookTransport::with_timeout(std::time::Duration::from_millis(500));
        let message =
            render_message(&NotificationKind::Welcome, "Pantry", &serde_json::Map::new());

        let result = transport
            .deliver("http://127.0.0.1:9/hook", Some("secret"), "Pantry", &message)
            .await;

        assert_eq!(result.sent, 0);
        assert_eq!(result.errors, 1);
    }
}
