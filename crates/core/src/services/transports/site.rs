//! In-app inbox delivery.

use std::sync::Arc;

use pantry_db::repositories::NewSiteMessage;
use serde_json::Value;

use crate::collaborators::InboxSink;
use crate::types::{Recipient, RenderedMessage, TransportResult};

/// Writes rendered messages into recipients' in-app inboxes.
#[derive(Clone)]
pub struct SiteTransport {
    sink: Arc<dyn InboxSink>,
}

impl SiteTransport {
    /// Create a transport over the given inbox sink.
    #[must_use]
    pub fn new(sink: Arc<dyn InboxSink>) -> Self {
        Self { sink }
    }

    /// Insert one unread inbox row per recipient with a profile.
    ///
    /// Recipients without a profile id (direct-email addressees) have no
    /// inbox and are skipped. The batch lands all-or-nothing, so a failure
    /// counts every row as an error.
    pub async fn deliver(
        &self,
        recipients: &[Recipient],
        message: &RenderedMessage,
    ) -> TransportResult {
        let rows: Vec<NewSiteMessage> = recipients
            .iter()
            .filter(|r| !r.user_id.is_empty())
            .map(|r| NewSiteMessage {
                org_id: r.org_id.clone(),
                user_id: r.user_id.clone(),
                message_type: message.kind.as_str().to_string(),
                title: message.subject.clone(),
                body: Some(message.body_text.clone()),
                data: Value::Object(message.body_json.clone()),
            })
            .collect();

        if rows.is_empty() {
            return TransportResult::empty();
        }

        let count = u32::try_from(rows.len()).unwrap_or(u32::MAX);
        match self.sink.insert_many(rows).await {
            Ok(_) => TransportResult {
                sent: count,
                errors: 0,
            },
            Err(e) => {
                tracing::warn!(error = %e, "Site message insert failed");
                TransportResult {
                    sent: 0,
                    errors: count,
                }
            }
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use pantry_common::{AppError, AppResult};
    use std::sync::Mutex;

    use crate::services::renderer::render_message;
    use crate::types::NotificationKind;

    struct FakeSink {
        rows: Mutex<Vec<NewSiteMessage>>,
        fail: bool,
    }

    impl FakeSink {
        fn new() -> Self {
            Self {
                rows: Mutex::new(Vec::new()),
                fail: false,
            }
        }
    }

    #[async_trait]
    impl InboxSink for FakeSink {
        async fn insert_many(&self, rows: Vec<NewSiteMessage>) -> AppResult<usize> {
            if self.fail {
                return Err(AppError::Database("insert failed".to_string()));
            }
            let count = rows.len();
            self.rows.lock().unwrap().extend(rows);
            Ok(count)
        }
    }

    fn recipient(user_id: &str) -> Recipient {
        Recipient {
            user_id: user_id.to_string(),
            email: Some(format!("{user_id}@pantry.test")),
            org_id: "org-1".to_string(),
        }
    }

    fn message() -> RenderedMessage {
        render_message(
            &NotificationKind::PickupClaimed,
            "Pantry",
            &serde_json::Map::new(),
        )
    }

    #[tokio::test]
    async fn test_inserts_one_row_per_profile_recipient() {
        let sink = Arc::new(FakeSink::new());
        let transport = SiteTransport::new(sink.clone());

        let result = transport
            .deliver(&[recipient("u1"), recipient("u2")], &message())
            .await;

        assert_eq!(result.sent, 2);
        assert_eq!(result.errors, 0);

        let rows = sink.rows.lock().unwrap();
        assert_eq!(rows.len(), 2);
        assert_eq!(rows[0].user_id, "u1");
        assert_eq!(rows[0].message_type, "pickup-claimed");
        assert_eq!(rows[0].title, "Pickup claimed — Pantry");
        assert_eq!(rows[0].data["type"], "pickup-claimed");
    }

    #[tokio::test]
    async fn test_profileless_recipients_are_skipped() {
        let sink = Arc::new(FakeSink::new());
        let transport = SiteTransport::new(sink.clone());

        let result = transport.deliver(&[recipient("")], &message()).await;

        assert_eq!(result, TransportResult::empty());
        assert!(sink.rows.lock().unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_batch_failure_counts_every_row() {
        let sink = Arc::new(FakeSink {
            rows: Mutex::new(Vec::new()),
            fail: true,
        });
        let transport = SiteTransport::new(sink);

        let result = transport
            .deliver(&[recipient("u1"), recipient("u2"), recipient("u3")], &message())
            .await;

        assert_eq!(result.sent, 0);
        assert_eq!(result.errors, 3);
    }
}
