//! Authenticated-identity seam.
//!
//! The session provider is an external collaborator; components that need the
//! current user take it as an explicit dependency rather than reading ambient
//! state.

use async_trait::async_trait;
use pantry_common::AppResult;

/// The authenticated user, as resolved by the session provider.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CurrentUser {
    /// Profile id.
    pub user_id: String,
    /// Contact address, if any.
    pub email: Option<String>,
    /// Tenant the session belongs to.
    pub org_id: String,
}

/// Provider of the current authenticated identity.
#[async_trait]
pub trait Identity: Send + Sync {
    /// The current user, or `None` when unauthenticated.
    async fn current_user(&self) -> AppResult<Option<CurrentUser>>;
}
