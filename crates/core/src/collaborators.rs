//! Collaborator seams for the dispatcher.
//!
//! The resolver and transports reach the tenant directory and the in-app
//! inbox through these traits so they can be exercised against in-memory
//! fakes. The production implementations wrap the sea-orm repositories.

use async_trait::async_trait;
use pantry_common::AppResult;
use pantry_db::repositories::{
    NewSiteMessage, OrganizationRepository, ProfileRepository, SiteMessageRepository,
};

use crate::types::{OrgInfo, ProfileRecord};

/// Tenant and profile lookup.
#[async_trait]
pub trait Directory: Send + Sync {
    /// Get an organization's display name and webhook config.
    async fn find_org(&self, org_id: &str) -> AppResult<Option<OrgInfo>>;

    /// List profiles in an organization whose role is in the given set.
    async fn profiles_by_role(
        &self,
        org_id: &str,
        roles: &[String],
    ) -> AppResult<Vec<ProfileRecord>>;
}

/// Destination for in-app inbox rows.
///
/// Rows passed in must be inert data: plain values with no live references
/// into caller state.
#[async_trait]
pub trait InboxSink: Send + Sync {
    /// Insert a batch of unread inbox rows. All-or-nothing at the storage
    /// layer; returns the number inserted.
    async fn insert_many(&self, rows: Vec<NewSiteMessage>) -> AppResult<usize>;
}

/// Database-backed [`Directory`].
#[derive(Clone)]
pub struct DbDirectory {
    orgs: OrganizationRepository,
    profiles: ProfileRepository,
}

impl DbDirectory {
    /// Create a directory over the organization and profile repositories.
    #[must_use]
    pub const fn new(orgs: OrganizationRepository, profiles: ProfileRepository) -> Self {
        Self { orgs, profiles }
    }
}

#[async_trait]
impl Directory for DbDirectory {
    async fn find_org(&self, org_id: &str) -> AppResult<Option<OrgInfo>> {
        let org = self.orgs.find_by_id(org_id).await?;
        Ok(org.map(|o| OrgInfo {
            name: o.name,
            webhook_url: o.webhook_url,
            webhook_secret: o.webhook_secret,
        }))
    }

    async fn profiles_by_role(
        &self,
        org_id: &str,
        roles: &[String],
    ) -> AppResult<Vec<ProfileRecord>> {
        let profiles = self.profiles.find_by_org_and_roles(org_id, roles).await?;
        Ok(profiles
            .into_iter()
            .map(|p| ProfileRecord {
                id: p.id,
                email: p.email,
            })
            .collect())
    }
}

#[async_trait]
impl InboxSink for SiteMessageRepository {
    async fn insert_many(&self, rows: Vec<NewSiteMessage>) -> AppResult<usize> {
        Self::insert_many(self, rows).await
    }
}
