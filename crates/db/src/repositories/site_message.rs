//! Site message repository.

use std::sync::Arc;

use crate::entities::{SiteMessage, site_message};
use pantry_common::{AppError, AppResult, IdGenerator};
use sea_orm::{
    ColumnTrait, DatabaseConnection, EntityTrait, PaginatorTrait, QueryFilter, QueryOrder,
    QuerySelect, Set,
};

/// A new inbox row, prior to insertion. Plain data only: values crossing the
/// storage boundary must be inert.
#[derive(Debug, Clone)]
pub struct NewSiteMessage {
    /// Owning organization.
    pub org_id: String,
    /// Recipient user (profile id).
    pub user_id: String,
    /// Notification type tag.
    pub message_type: String,
    /// Inbox title.
    pub title: String,
    /// Plain-text body.
    pub body: Option<String>,
    /// Structured payload.
    pub data: serde_json::Value,
}

/// Site message repository for database operations.
#[derive(Clone)]
pub struct SiteMessageRepository {
    db: Arc<DatabaseConnection>,
    id_gen: IdGenerator,
}

impl SiteMessageRepository {
    /// Create a new site message repository.
    #[must_use]
    pub fn new(db: Arc<DatabaseConnection>) -> Self {
        Self {
            db,
            id_gen: IdGenerator::new(),
        }
    }

    /// Insert a batch of unread inbox rows in one statement.
    ///
    /// The insert is all-or-nothing at the storage layer: either every row
    /// lands or none does.
    pub async fn insert_many(&self, rows: Vec<NewSiteMessage>) -> AppResult<usize> {
        if rows.is_empty() {
            return Ok(0);
        }

        let count = rows.len();
        let now = chrono::Utc::now();
        let models: Vec<site_message::ActiveModel> = rows
            .into_iter()
            .map(|row| site_message::ActiveModel {
                id: Set(self.id_gen.generate()),
                org_id: Set(row.org_id),
                user_id: Set(row.user_id),
                message_type: Set(row.message_type),
                title: Set(row.title),
                body: Set(row.body),
                data: Set(row.data),
                read: Set(false),
                created_at: Set(now.into()),
            })
            .collect();

        SiteMessage::insert_many(models)
            .exec(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))?;

        Ok(count)
    }

    /// Get inbox messages for a user, newest first.
    pub async fn find_by_user(
        &self,
        user_id: &str,
        limit: u64,
    ) -> AppResult<Vec<site_message::Model>> {
        SiteMessage::find()
            .filter(site_message::Column::UserId.eq(user_id))
            .order_by_desc(site_message::Column::CreatedAt)
            .limit(limit)
            .all(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }

    /// Count unread messages for a user.
    pub async fn unread_count(&self, user_id: &str) -> AppResult<u64> {
        SiteMessage::find()
            .filter(site_message::Column::UserId.eq(user_id))
            .filter(site_message::Column::Read.eq(false))
            .count(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }

    /// Mark one message as read. Only the recipient may flip the flag.
    pub async fn mark_as_read(&self, user_id: &str, id: &str) -> AppResult<()> {
        SiteMessage::update_many()
            .filter(site_message::Column::Id.eq(id))
            .filter(site_message::Column::UserId.eq(user_id))
            .col_expr(site_message::Column::Read, true.into())
            .exec(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))?;
        Ok(())
    }

    /// Mark all of a user's messages as read. Returns the number updated.
    pub async fn mark_all_as_read(&self, user_id: &str) -> AppResult<u64> {
        let result = SiteMessage::update_many()
            .filter(site_message::Column::UserId.eq(user_id))
            .filter(site_message::Column::Read.eq(false))
            .col_expr(site_message::Column::Read, true.into())
            .exec(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))?;
        Ok(result.rows_affected)
    }
}
