//! In-app inbox service.
//!
//! Read side of the site transport: listing, unread counting, and read-flag
//! updates. The MTS never deletes inbox rows.

use pantry_common::AppResult;
use pantry_db::entities::site_message;
use pantry_db::repositories::SiteMessageRepository;
use serde::Serialize;

/// Default page size for inbox listings.
const DEFAULT_LIMIT: u64 = 50;

/// An inbox message as returned to the client.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SiteMessageResponse {
    pub id: String,
    pub org_id: String,
    #[serde(rename = "type")]
    pub message_type: String,
    pub title: String,
    pub body: Option<String>,
    pub data: serde_json::Value,
    pub read: bool,
    pub created_at: String,
}

impl From<site_message::Model> for SiteMessageResponse {
    fn from(m: site_message::Model) -> Self {
        Self {
            id: m.id,
            org_id: m.org_id,
            message_type: m.message_type,
            title: m.title,
            body: m.body,
            data: m.data,
            read: m.read,
            created_at: m.created_at.to_rfc3339(),
        }
    }
}

/// Service for reading and updating a user's in-app inbox.
#[derive(Clone)]
pub struct InboxService {
    messages: SiteMessageRepository,
}

impl InboxService {
    /// Create an inbox service over the site message repository.
    #[must_use]
    pub const fn new(messages: SiteMessageRepository) -> Self {
        Self { messages }
    }

    /// List the user's messages, newest first.
    pub async fn list(
        &self,
        user_id: &str,
        limit: Option<u64>,
    ) -> AppResult<Vec<SiteMessageResponse>> {
        let messages = self
            .messages
            .find_by_user(user_id, limit.unwrap_or(DEFAULT_LIMIT))
            .await?;
        Ok(messages.into_iter().map(Into::into).collect())
    }

    /// Count the user's unread messages.
    pub async fn unread_count(&self, user_id: &str) -> AppResult<u64> {
        self.messages.unread_count(user_id).await
    }

    /// Mark one of the user's messages as read.
    pub async fn mark_read(&self, user_id: &str, message_id: &str) -> AppResult<()> {
        self.messages.mark_as_read(user_id, message_id).await
    }

    /// Mark all of the user's messages as read. Returns the number updated.
    pub async fn mark_all_read(&self, user_id: &str) -> AppResult<u64> {
        self.messages.mark_all_as_read(user_id).await
    }
}
