//! Recipient resolution.

use std::sync::Arc;

use crate::collaborators::Directory;
use crate::types::{NotificationKind, NotificationRequest, Recipient};

/// Resolves a notification request into a deduplicated ordered recipient set.
#[derive(Clone)]
pub struct RecipientResolver {
    directory: Arc<dyn Directory>,
}

/// Default role fan-out for a notification type.
///
/// Welcome never role-fans-out; it relies solely on `recipientEmail`.
#[must_use]
pub fn default_roles_for(kind: &NotificationKind) -> Vec<String> {
    match kind {
        NotificationKind::Welcome => vec![],
        NotificationKind::AdminJoin
        | NotificationKind::PickupClaimed
        | NotificationKind::PickupDelivered
        | NotificationKind::PickupStocked
        | NotificationKind::DailyDigest => vec!["admin".to_string(), "owner".to_string()],
        NotificationKind::Other(_) => vec!["admin".to_string()],
    }
}

impl RecipientResolver {
    /// Create a resolver over the given directory.
    #[must_use]
    pub fn new(directory: Arc<dyn Directory>) -> Self {
        Self { directory }
    }

    /// Resolve the addressee set for a request.
    ///
    /// A profile lookup failure is swallowed in favor of whatever is already
    /// resolved: notification sending is best-effort and must not block the
    /// action that triggered it.
    pub async fn resolve(&self, request: &NotificationRequest) -> Vec<Recipient> {
        let mut recipients: Vec<Recipient> = Vec::new();

        // Direct email recipient (e.g. welcome email before a profile exists)
        if let Some(email) = &request.recipient_email {
            recipients.push(Recipient {
                user_id: String::new(),
                email: Some(email.clone()),
                org_id: request.org_id.clone(),
            });
        }

        // Role-based fan-out (e.g. all admins)
        let roles = request
            .recipient_role
            .clone()
            .unwrap_or_else(|| default_roles_for(&request.kind));

        if !roles.is_empty() {
            match self
                .directory
                .profiles_by_role(&request.org_id, &roles)
                .await
            {
                Ok(profiles) => {
                    for profile in profiles {
                        // Dedup by exact (email, user_id) pair
                        let duplicate = recipients
                            .iter()
                            .any(|r| r.email == profile.email && r.user_id == profile.id);
                        if !duplicate {
                            recipients.push(Recipient {
                                user_id: profile.id,
                                email: profile.email,
                                org_id: request.org_id.clone(),
                            });
                        }
                    }
                }
                Err(e) => {
                    tracing::warn!(
                        org_id = %request.org_id,
                        error = %e,
                        "Profile lookup failed, proceeding with resolved recipients"
                    );
                }
            }
        }

        recipients
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use pantry_common::{AppError, AppResult};
    use std::sync::Mutex;

    use crate::types::{OrgInfo, ProfileRecord};

    struct FakeDirectory {
        profiles: Vec<ProfileRecord>,
        fail_lookup: bool,
        queried_roles: Mutex<Vec<Vec<String>>>,
    }

    impl FakeDirectory {
        fn with_profiles(profiles: Vec<ProfileRecord>) -> Self {
            Self {
                profiles,
                fail_lookup: false,
                queried_roles: Mutex::new(Vec::new()),
            }
        }
    }

    #[async_trait]
    impl Directory for FakeDirectory {
        async fn find_org(&self, _org_id: &str) -> AppResult<Option<OrgInfo>> {
            Ok(None)
        }

        async fn profiles_by_role(
            &self,
            _org_id: &str,
            roles: &[String],
        ) -> AppResult<Vec<ProfileRecord>> {
            self.queried_roles.lock().unwrap().push(roles.to_vec());
            if self.fail_lookup {
                return Err(AppError::Database("connection reset".to_string()));
            }
            Ok(self.profiles.clone())
        }
    }

    fn request(kind: &str) -> NotificationRequest {
        NotificationRequest {
            kind: NotificationKind::from(kind.to_string()),
            org_id: "org-42".to_string(),
            recipient_email: None,
            recipient_role: None,
            transports: None,
            data: serde_json::Map::new(),
        }
    }

    #[tokio::test]
    async fn test_welcome_resolves_to_direct_email_only() {
        let directory = Arc::new(FakeDirectory::with_profiles(vec![ProfileRecord {
            id: "u1".to_string(),
            email: Some("admin@pantry.test".to_string()),
        }]));
        let resolver = RecipientResolver::new(directory.clone());

        let mut req = request("welcome");
        req.recipient_email = Some("newbie@pantry.test".to_string());

        let recipients = resolver.resolve(&req).await;
        assert_eq!(recipients.len(), 1);
        assert_eq!(recipients[0].user_id, "");
        assert_eq!(recipients[0].email.as_deref(), Some("newbie@pantry.test"));
        // Welcome has an empty role set, so no lookup runs at all
        assert!(directory.queried_roles.lock().unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_pickup_events_fan_out_to_admin_and_owner() {
        let directory = Arc::new(FakeDirectory::with_profiles(vec![]));
        let resolver = RecipientResolver::new(directory.clone());

        resolver.resolve(&request("pickup-claimed")).await;

        let queried = directory.queried_roles.lock().unwrap();
        assert_eq!(queried.as_slice(), &[vec![
            "admin".to_string(),
            "owner".to_string()
        ]]);
    }

    #[tokio::test]
    async fn test_unknown_type_defaults_to_admin_only() {
        assert_eq!(
            default_roles_for(&NotificationKind::from("unknown-type".to_string())),
            vec!["admin".to_string()]
        );
    }

    #[tokio::test]
    async fn test_explicit_roles_override_defaults() {
        let directory = Arc::new(FakeDirectory::with_profiles(vec![]));
        let resolver = RecipientResolver::new(directory.clone());

        let mut req = request("pickup-claimed");
        req.recipient_role = Some(vec!["member".to_string()]);
        resolver.resolve(&req).await;

        let queried = directory.queried_roles.lock().unwrap();
        assert_eq!(queried.as_slice(), &[vec!["member".to_string()]]);
    }

    #[tokio::test]
    async fn test_dedup_by_email_and_user_id_pair() {
        let directory = Arc::new(FakeDirectory::with_profiles(vec![
            ProfileRecord {
                id: "u1".to_string(),
                email: Some("shared@pantry.test".to_string()),
            },
            ProfileRecord {
                id: "u1".to_string(),
                email: Some("shared@pantry.test".to_string()),
            },
            // Same email under a different profile id is kept (dedup key is
            // the exact pair)
            ProfileRecord {
                id: "u2".to_string(),
                email: Some("shared@pantry.test".to_string()),
            },
        ]));
        let resolver = RecipientResolver::new(directory);

        let recipients = resolver.resolve(&request("pickup-claimed")).await;
        assert_eq!(recipients.len(), 2);
    }

    #[tokio::test]
    async fn test_lookup_failure_is_swallowed() {
        let directory = Arc::new(FakeDirectory {
            profiles: vec![],
            fail_lookup: true,
            queried_roles: Mutex::new(Vec::new()),
        });
        let resolver = RecipientResolver::new(directory);

        let mut req = request("pickup-claimed");
        req.recipient_email = Some("direct@pantry.test".to_string());

        let recipients = resolver.resolve(&req).await;
        assert_eq!(recipients.len(), 1);
        assert_eq!(recipients[0].email.as_deref(), Some("direct@pantry.test"));
    }
}
