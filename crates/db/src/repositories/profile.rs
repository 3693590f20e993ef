//! Profile repository.

use std::sync::Arc;

use crate::entities::{Profile, profile};
use pantry_common::{AppError, AppResult};
use sea_orm::{ColumnTrait, DatabaseConnection, EntityTrait, QueryFilter, QueryOrder};

/// Profile repository for database operations.
#[derive(Clone)]
pub struct ProfileRepository {
    db: Arc<DatabaseConnection>,
}

impl ProfileRepository {
    /// Create a new profile repository.
    #[must_use]
    pub const fn new(db: Arc<DatabaseConnection>) -> Self {
        Self { db }
    }

    /// Find a profile by ID.
    pub async fn find_by_id(&self, id: &str) -> AppResult<Option<profile::Model>> {
        Profile::find_by_id(id)
            .one(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }

    /// List profiles in an organization whose role is in the given set.
    pub async fn find_by_org_and_roles(
        &self,
        org_id: &str,
        roles: &[String],
    ) -> AppResult<Vec<profile::Model>> {
        Profile::find()
            .filter(profile::Column::OrgId.eq(org_id))
            .filter(profile::Column::Role.is_in(roles.iter().map(String::as_str)))
            .order_by_asc(profile::Column::Id)
            .all(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }
}
