//! Notification dispatch orchestration.

use std::collections::BTreeMap;
use std::sync::Arc;

use pantry_common::{AppError, AppResult};
use serde::Serialize;
use serde_json::Value;

use crate::collaborators::Directory;
use crate::services::resolver::RecipientResolver;
use crate::services::transports::{EmailTransport, SiteTransport, WebhookTransport};
use crate::types::{NotificationRequest, Transport, TransportResult};

/// Display name used when the org lookup comes back empty.
const FALLBACK_ORG_NAME: &str = "Your Pantry";

/// Aggregate result of one dispatch: totals plus the per-transport breakdown.
///
/// Only transports that were actually engaged appear in `transports`; a
/// skipped transport (not requested, or prerequisite unmet) leaves no key.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct DispatchOutcome {
    /// Destinations delivered to, summed across transports.
    pub sent: u32,
    /// Destinations that failed, summed across transports.
    pub errors: u32,
    /// Per-transport counts, keyed by transport name.
    pub transports: BTreeMap<String, TransportResult>,
}

/// Validate and decode a raw notification request body.
///
/// Runs before any side effect: a request failing validation never touches
/// the directory or any transport.
pub fn validate_request(body: &Value) -> AppResult<NotificationRequest> {
    let object = body
        .as_object()
        .ok_or_else(|| AppError::BadRequest("Request body must be a JSON object".to_string()))?;

    let has_type = matches!(object.get("type"), Some(Value::String(s)) if !s.is_empty());
    let has_org = matches!(object.get("orgId"), Some(Value::String(s)) if !s.is_empty());
    if !has_type || !has_org {
        return Err(AppError::BadRequest("Missing type or orgId".to_string()));
    }

    if let Some(transports) = object.get("transports")
        && !transports.is_array()
    {
        return Err(AppError::BadRequest(
            "transports must be an array".to_string(),
        ));
    }

    if let Some(roles) = object.get("recipientRole")
        && !roles.is_array()
    {
        return Err(AppError::BadRequest(
            "recipientRole must be an array".to_string(),
        ));
    }

    serde_json::from_value(body.clone()).map_err(|e| AppError::BadRequest(e.to_string()))
}

/// Orchestrates resolve → render → concurrent transport fan-out.
#[derive(Clone)]
pub struct MtsDispatcher {
    directory: Arc<dyn Directory>,
    resolver: RecipientResolver,
    email: Option<EmailTransport>,
    site: SiteTransport,
    webhook: WebhookTransport,
}

impl MtsDispatcher {
    /// Wire up a dispatcher. `email` is `None` when no gateway is configured,
    /// which skips the email transport rather than erroring.
    #[must_use]
    pub fn new(
        directory: Arc<dyn Directory>,
        email: Option<EmailTransport>,
        site: SiteTransport,
        webhook: WebhookTransport,
    ) -> Self {
        Self {
            resolver: RecipientResolver::new(directory.clone()),
            directory,
            email,
            site,
            webhook,
        }
    }

    /// Dispatch one notification across its selected transports.
    ///
    /// The dispatcher itself never fails: per-transport failures are absorbed
    /// into the counts, and zero recipients is a valid empty outcome.
    pub async fn dispatch(&self, request: &NotificationRequest) -> DispatchOutcome {
        let org = match self.directory.find_org(&request.org_id).await {
            Ok(org) => org,
            Err(e) => {
                tracing::warn!(
                    org_id = %request.org_id,
                    error = %e,
                    "Org lookup failed, using fallback display name"
                );
                None
            }
        };
        let org_name = org
            .as_ref()
            .map_or(FALLBACK_ORG_NAME, |o| o.name.as_str());

        let recipients = self.resolver.resolve(request).await;
        let message = crate::services::renderer::render_message(
            &request.kind,
            org_name,
            &request.data,
        );

        let webhook_target = org.as_ref().and_then(|o| {
            o.webhook_url
                .as_deref()
                .map(|url| (url, o.webhook_secret.as_deref()))
        });

        // Transport failures are independent; none blocks the others.
        let (email_result, site_result, webhook_result) = tokio::join!(
            async {
                match &self.email {
                    Some(transport) if request.wants_transport(Transport::Email) => {
                        Some(transport.deliver(&recipients, &message).await)
                    }
                    _ => None,
                }
            },
            async {
                if request.wants_transport(Transport::Site) {
                    Some(self.site.deliver(&recipients, &message).await)
                } else {
                    None
                }
            },
            async {
                match webhook_target {
                    Some((url, secret)) if request.wants_transport(Transport::Webhook) => {
                        Some(self.webhook.deliver(url, secret, org_name, &message).await)
                    }
                    _ => None,
                }
            },
        );

        let mut outcome = DispatchOutcome::default();
        for (transport, result) in [
            (Transport::Email, email_result),
            (Transport::Site, site_result),
            (Transport::Webhook, webhook_result),
        ] {
            if let Some(result) = result {
                outcome.sent += result.sent;
                outcome.errors += result.errors;
                outcome.transports.insert(transport.name().to_string(), result);
            }
        }

        tracing::info!(
            kind = %request.kind,
            org_id = %request.org_id,
            recipients = recipients.len(),
            sent = outcome.sent,
            errors = outcome.errors,
            "Notification dispatched"
        );

        outcome
    }
}
