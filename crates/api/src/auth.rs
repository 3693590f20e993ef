//! Identity provider for the HTTP surface.

use async_trait::async_trait;
use pantry_common::AppResult;
use pantry_core::identity::CurrentUser;
use pantry_db::repositories::ProfileRepository;

/// Resolves a bearer token to the user it belongs to.
#[async_trait]
pub trait AuthProvider: Send + Sync {
    /// The user the token identifies, or `None` for an unknown token.
    async fn authenticate(&self, token: &str) -> AppResult<Option<CurrentUser>>;
}

/// Token scheme where the bearer token is the profile id.
///
/// The session layer (external to this service) is expected to hand clients
/// an opaque token it can map to a profile; this deployment maps it directly.
#[derive(Clone)]
pub struct ProfileTokenAuth {
    profiles: ProfileRepository,
}

impl ProfileTokenAuth {
    /// Create an auth provider over the profile repository.
    #[must_use]
    pub const fn new(profiles: ProfileRepository) -> Self {
        Self { profiles }
    }
}

#[async_trait]
impl AuthProvider for ProfileTokenAuth {
    async fn authenticate(&self, token: &str) -> AppResult<Option<CurrentUser>> {
        let profile = self.profiles.find_by_id(token).await?;
        Ok(profile.map(|p| CurrentUser {
            user_id: p.id,
            email: p.email,
            org_id: p.org_id,
        }))
    }
}
