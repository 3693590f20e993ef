//! Offline send queue with fallback delivery.
//!
//! Sends go straight to the dispatch endpoint while online. When the
//! connectivity probe reports offline, the request body is queued durably
//! instead and replayed by [`Outbox::flush`] on reconnect. A flushed entry
//! gets exactly one attempt: primary dispatch, then a minimal in-app-inbox
//! fallback, then a permanent drop. Entries are removed from the queue in
//! all three cases, so a broken configuration cannot grow the queue or
//! retry-storm the service.

use std::sync::Arc;

use pantry_common::{AppError, AppResult};
use pantry_core::collaborators::InboxSink;
use pantry_core::identity::Identity;
use pantry_db::repositories::NewSiteMessage;
use serde_json::{Map, Value};

use crate::client::{Connectivity, DispatchAck, DispatchClient};
use crate::store::OutboxStore;

/// Outcome of one [`Outbox::send`] call.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SendStatus {
    /// Accepted by the dispatch endpoint.
    Delivered(DispatchAck),
    /// Offline: queued durably for a later flush.
    Queued,
    /// No organization could be resolved for the request; nothing to send.
    Skipped,
    /// The pre-flight probe said online but the dispatch call failed.
    /// Queuing keys off the probe only, so the notification is lost.
    Lost,
}

/// Counts from one flush run. Every processed entry lands in exactly one
/// bucket.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct FlushReport {
    /// Entries delivered through the primary dispatch path.
    pub delivered: u32,
    /// Entries delivered through the site-only fallback.
    pub fallback_delivered: u32,
    /// Double faults: both paths failed, entry permanently dropped.
    pub dropped: u32,
}

impl FlushReport {
    /// Entries that reached a recipient in some form.
    #[must_use]
    pub const fn succeeded(&self) -> u32 {
        self.delivered + self.fallback_delivered
    }
}

/// Client-side durable outbox.
pub struct Outbox {
    store: Arc<dyn OutboxStore>,
    connectivity: Arc<dyn Connectivity>,
    client: Arc<dyn DispatchClient>,
    identity: Arc<dyn Identity>,
    inbox: Arc<dyn InboxSink>,
}

impl Outbox {
    /// Wire up an outbox from its collaborators.
    #[must_use]
    pub fn new(
        store: Arc<dyn OutboxStore>,
        connectivity: Arc<dyn Connectivity>,
        client: Arc<dyn DispatchClient>,
        identity: Arc<dyn Identity>,
        inbox: Arc<dyn InboxSink>,
    ) -> Self {
        Self {
            store,
            connectivity,
            client,
            identity,
            inbox,
        }
    }

    /// Send one notification request body, queuing it when offline.
    ///
    /// A missing `orgId` is filled in from the current user's organization;
    /// with no org resolvable the send is a no-op. The caller never sees a
    /// network failure as an error.
    pub async fn send(&self, mut body: Value) -> AppResult<SendStatus> {
        let has_org = matches!(body.get("orgId"), Some(Value::String(s)) if !s.is_empty());
        if !has_org {
            let Some(user) = self.identity.current_user().await? else {
                return Ok(SendStatus::Skipped);
            };
            if user.org_id.is_empty() {
                return Ok(SendStatus::Skipped);
            }
            let Some(object) = body.as_object_mut() else {
                return Ok(SendStatus::Skipped);
            };
            object.insert("orgId".to_string(), Value::String(user.org_id));
        }

        if !self.connectivity.is_online() {
            let key = self.store.put(&body).await?;
            tracing::debug!(key = %key, "Offline, queued notification");
            return Ok(SendStatus::Queued);
        }

        match self.client.dispatch(&body).await {
            Ok(ack) => Ok(SendStatus::Delivered(ack)),
            Err(e) => {
                tracing::warn!(error = %e, "Dispatch failed after online probe, notification lost");
                Ok(SendStatus::Lost)
            }
        }
    }

    /// Replay all queued entries, oldest first.
    ///
    /// Each entry is fully resolved (delivered, fallback-delivered, or
    /// dropped) and removed before the next is considered. Entries queued
    /// while a flush is running are picked up by the next run, not this one.
    pub async fn flush(&self) -> AppResult<FlushReport> {
        let entries = self.store.get_all().await?;
        let mut report = FlushReport::default();

        for entry in entries {
            match self.client.dispatch(&entry.body).await {
                Ok(_) => report.delivered += 1,
                Err(primary) => {
                    tracing::warn!(
                        key = %entry.key,
                        error = %primary,
                        "Primary dispatch failed during flush, trying fallback"
                    );
                    match self.fallback_deliver(&entry.body).await {
                        Ok(()) => report.fallback_delivered += 1,
                        Err(fallback) => {
                            report.dropped += 1;
                            tracing::error!(
                                key = %entry.key,
                                primary_error = %primary,
                                fallback_error = %fallback,
                                "Dropping notification after double fault"
                            );
                        }
                    }
                }
            }

            // Exactly one removal per entry, whatever the outcome
            self.store.delete(&entry.key).await?;
        }

        Ok(report)
    }

    /// Minimal fallback: one unread inbox row for the current user, skipping
    /// email and webhook entirely.
    async fn fallback_deliver(&self, body: &Value) -> AppResult<()> {
        let Some(user) = self.identity.current_user().await? else {
            tracing::warn!("No authenticated user for fallback delivery");
            return Err(AppError::Unauthorized);
        };

        let org_id = body
            .get("orgId")
            .and_then(Value::as_str)
            .filter(|s| !s.is_empty())
            .map(String::from)
            .or_else(|| (!user.org_id.is_empty()).then(|| user.org_id.clone()))
            .ok_or_else(|| {
                AppError::BadRequest("No organization for fallback delivery".to_string())
            })?;

        let kind = body.get("type").and_then(Value::as_str).unwrap_or("custom");
        let data = body
            .get("data")
            .and_then(Value::as_object)
            .cloned()
            .unwrap_or_default();

        let row = NewSiteMessage {
            org_id,
            user_id: user.user_id,
            message_type: kind.to_string(),
            title: fallback_title(kind, &data),
            body: None,
            data: Value::Object(data),
        };

        self.inbox.insert_many(vec![row]).await?;
        Ok(())
    }
}

/// Locally derived inbox title for a fallback delivery, without invoking the
/// full renderer.
#[must_use]
pub fn fallback_title(kind: &str, data: &Map<String, Value>) -> String {
    let field = |key: &str| {
        data.get(key)
            .and_then(Value::as_str)
            .filter(|s| !s.is_empty())
    };
    let task = || field("taskDescription").unwrap_or("Pickup task");

    match kind {
        "pickup-claimed" => format!("Pickup claimed: {}", task()),
        "pickup-delivered" => format!("Pickup delivered: {}", task()),
        "pickup-stocked" => format!("Items stocked: {}", task()),
        "admin-join" => field("memberName")
            .map_or_else(|| "New member joined".to_string(), |m| format!("New member: {m}")),
        "welcome" => "Welcome".to_string(),
        "daily-digest" => "Daily digest".to_string(),
        _ => field("subject").unwrap_or("Notification").to_string(),
    }
}
