//! Organization entity.
//!
//! The tenant boundary: recipients, webhook config, and the display name used
//! in rendered messages are all scoped to one organization.

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// Organization model.
#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "organization")]
pub struct Model {
    /// Unique identifier.
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: String,

    /// Display name used in message subjects and bodies.
    pub name: String,

    /// Org-level webhook destination. The webhook transport is skipped when
    /// this is unset.
    #[sea_orm(column_type = "Text", nullable)]
    pub webhook_url: Option<String>,

    /// Secret for signing webhook payloads. Delivery proceeds unsigned when
    /// this is unset.
    #[sea_orm(nullable)]
    pub webhook_secret: Option<String>,

    /// Creation timestamp.
    pub created_at: DateTimeWithTimeZone,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(has_many = "super::profile::Entity")]
    Profile,
    #[sea_orm(has_many = "super::site_message::Entity")]
    SiteMessage,
}

impl Related<super::profile::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Profile.def()
    }
}

impl Related<super::site_message::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::SiteMessage.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
