//! Profile entity.
//!
//! One membership record per user per organization. The resolver fans out to
//! profiles by role.

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// Profile model.
#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "profile")]
pub struct Model {
    /// Unique identifier (also the user id for site messages).
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: String,

    /// Owning organization.
    pub org_id: String,

    /// Contact email. Nullable: a member may have no address on file.
    #[sea_orm(nullable)]
    pub email: Option<String>,

    /// Role within the organization (owner, admin, member, ...).
    pub role: String,

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
