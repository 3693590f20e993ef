//! Site message entity (in-app inbox record).
//!
//! Created by the site transport, marked read by the inbox endpoints, never
//! deleted by the MTS.

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// Site message model.
#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "site_message")]
pub struct Model {
    /// Unique identifier.
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: String,

    /// Owning organization.
    pub org_id: String,

    /// Recipient user (profile id).
    pub user_id: String,

    /// Notification type tag.
    #[sea_orm(column_name = "type")]
    pub message_type: String,

    /// Short title shown in the inbox list.
    pub title: String,

    /// Plain-text body.
    #[sea_orm(column_type = "Text", nullable)]
    pub body: Option<String>,

    /// Structured payload mirror of the body.
    #[sea_orm(column_type = "JsonBinary")]
    pub data: Json,

    /// Read flag, mutated by the inbox UI.
    #[sea_orm(default_value = false)]
    pub read: bool,

    /// Creation timestamp.
    pub created_at: DateTimeWithTimeZone,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::organization::Entity",
        from = "Column::OrgId",
        to = "super::organization::Column::Id",
        on_delete = "Cascade"
    )]
    Organization,
}

impl Related<super::organization::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Organization.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
