//! Core message types for the MTS.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// Notification type tag.
///
/// Unknown tags are preserved as [`NotificationKind::Other`] rather than
/// rejected: the renderer falls back to caller-supplied content and the
/// resolver falls back to the admin role for them.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum NotificationKind {
    Welcome,
    AdminJoin,
    PickupClaimed,
    PickupDelivered,
    PickupStocked,
    DailyDigest,
    Other(String),
}

impl NotificationKind {
    /// The wire tag for this kind.
    #[must_use]
    pub fn as_str(&self) -> &str {
        match self {
            Self::Welcome => "welcome",
            Self::AdminJoin => "admin-join",
            Self::PickupClaimed => "pickup-claimed",
            Self::PickupDelivered => "pickup-delivered",
            Self::PickupStocked => "pickup-stocked",
            Self::DailyDigest => "daily-digest",
            Self::Other(tag) => tag,
        }
    }
}

impl From<String> for NotificationKind {
    fn from(s: String) -> Self {
        match s.as_str() {
            "welcome" => Self::Welcome,
            "admin-join" => Self::AdminJoin,
            "pickup-claimed" => Self::PickupClaimed,
            "pickup-delivered" => Self::PickupDelivered,
            "pickup-stocked" => Self::PickupStocked,
            "daily-digest" => Self::DailyDigest,
            _ => Self::Other(s),
        }
    }
}

impl From<NotificationKind> for String {
    fn from(kind: NotificationKind) -> Self {
        kind.as_str().to_string()
    }
}

impl std::fmt::Display for NotificationKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// A delivery channel.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Transport {
    Email,
    Site,
    Webhook,
}

impl Transport {
    /// The wire name of this transport.
    #[must_use]
    pub const fn name(self) -> &'static str {
        match self {
            Self::Email => "email",
            Self::Site => "site",
            Self::Webhook => "webhook",
        }
    }
}

/// One logical notification event to deliver.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NotificationRequest {
    /// Notification type tag.
    #[serde(rename = "type")]
    pub kind: NotificationKind,

    /// Tenant identifier. Required.
    pub org_id: String,

    /// Optional direct addressee (supports pre-account-creation sends).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub recipient_email: Option<String>,

    /// Role tags to fan out to. Falls back to the per-type default mapping
    /// when absent.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub recipient_role: Option<Vec<String>>,

    /// Transport subset to engage. Defaults to all three.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub transports: Option<Vec<Transport>>,

    /// Type-specific payload fields (task description, claimer name, ...).
    #[serde(default, skip_serializing_if = "Map::is_empty")]
    pub data: Map<String, Value>,
}

impl NotificationRequest {
    /// Whether the given transport should be engaged for this request.
    #[must_use]
    pub fn wants_transport(&self, transport: Transport) -> bool {
        self.transports
            .as_ref()
            .is_none_or(|list| list.contains(&transport))
    }
}

/// A resolved addressee.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Recipient {
    /// Profile id. Empty string when the recipient has no account profile
    /// yet (e.g. a pre-signup welcome email).
    pub user_id: String,
    /// Contact address, if any.
    pub email: Option<String>,
    /// Tenant the recipient belongs to.
    pub org_id: String,
}

/// Transport-agnostic rendered message content.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RenderedMessage {
    /// Notification type tag.
    pub kind: NotificationKind,
    /// Organization display name.
    pub org_name: String,
    /// Subject line. Non-empty for every type.
    pub subject: String,
    /// Short heading.
    pub heading: String,
    /// HTML body fragment.
    pub body_html: String,
    /// Plain-text body. Non-empty for every defined type.
    pub body_text: String,
    /// Structured mirror of the body: always carries `type` and `orgName`
    /// plus everything the caller supplied in `data`.
    pub body_json: Map<String, Value>,
}

/// Per-transport delivery counts. Returned even on total failure; zero sent
/// and zero errors is a valid "nothing to do" outcome.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TransportResult {
    /// Destinations delivered to.
    pub sent: u32,
    /// Destinations that failed.
    pub errors: u32,
}

impl TransportResult {
    /// A result with nothing attempted.
    #[must_use]
    pub const fn empty() -> Self {
        Self { sent: 0, errors: 0 }
    }
}

/// Tenant lookup result: display name plus webhook configuration.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct OrgInfo {
    /// Display name used in rendered messages.
    pub name: String,
    /// Org-level webhook destination, if configured.
    pub webhook_url: Option<String>,
    /// Webhook signing secret, if configured.
    pub webhook_secret: Option<String>,
}

/// A profile row as seen by the resolver.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProfileRecord {
    /// Profile id (doubles as the site-message user id).
    pub id: String,
    /// Contact address, if any.
    pub email: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_kind_round_trips_known_tags() {
        for tag in [
            "welcome",
            "admin-join",
            "pickup-claimed",
            "pickup-delivered",
            "pickup-stocked",
            "daily-digest",
        ] {
            let kind = NotificationKind::from(tag.to_string());
            assert_eq!(kind.as_str(), tag);
            assert!(!matches!(kind, NotificationKind::Other(_)));
        }
    }

    #[test]
    fn test_kind_preserves_unknown_tags() {
        let kind = NotificationKind::from("inventory-low".to_string());
        assert_eq!(kind, NotificationKind::Other("inventory-low".to_string()));
        assert_eq!(kind.as_str(), "inventory-low");
    }

    #[test]
    fn test_request_deserializes_wire_shape() {
        let request: NotificationRequest = serde_json::from_value(serde_json::json!({
            "type": "pickup-claimed",
            "orgId": "org-42",
            "transports": ["email", "site"],
            "data": { "claimedBy": "Alice" }
        }))
        .expect("valid request");

        assert_eq!(request.kind, NotificationKind::PickupClaimed);
        assert_eq!(request.org_id, "org-42");
        assert!(request.wants_transport(Transport::Email));
        assert!(request.wants_transport(Transport::Site));
        assert!(!request.wants_transport(Transport::Webhook));
        assert_eq!(request.data["claimedBy"], "Alice");
    }

    #[test]
    fn test_transports_default_to_all() {
        let request: NotificationRequest = serde_json::from_value(serde_json::json!({
            "type": "welcome",
            "orgId": "org-1",
        }))
        .expect("valid request");

        assert!(request.wants_transport(Transport::Email));
        assert!(request.wants_transport(Transport::Site));
        assert!(request.wants_transport(Transport::Webhook));
    }
}
