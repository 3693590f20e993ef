//! Create site message table migration.

use sea_orm_migration::prelude::*;

use super::m20250301_000001_create_organization_table::Organization;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(SiteMessage::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(SiteMessage::Id)
                            .string_len(36)
                            .not_null()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(SiteMessage::OrgId).string_len(36).not_null())
                    .col(ColumnDef::new(SiteMessage::UserId).string_len(36).not_null())
                    .col(ColumnDef::new(SiteMessage::Type).string_len(64).not_null())
                    .col(ColumnDef::new(SiteMessage::Title).string_len(512).not_null())
                    .col(ColumnDef::new(SiteMessage::Body).text())
                    .col(ColumnDef::new(SiteMessage::Data).json_binary().not_null())
                    .col(
                        ColumnDef::new(SiteMessage::Read)
                            .boolean()
                            .not_null()
                            .default(false),
                    )
                    .col(
                        ColumnDef::new(SiteMessage::CreatedAt)
                            .timestamp_with_time_zone()
                            .not_null()
                            .default(Expr::current_timestamp()),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_site_message_org")
                            .from(SiteMessage::Table, SiteMessage::OrgId)
                            .to(Organization::Table, Organization::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        // Index: user_id (for inbox listing)
        manager
            .create_index(
                Index::create()
                    .name("idx_site_message_user_id")
                    .table(SiteMessage::Table)
                    .col(SiteMessage::UserId)
                    .to_owned(),
            )
            .await?;

        // Index: (user_id, read) (for unread count)
        manager
            .create_index(
                Index::create()
                    .name("idx_site_message_user_read")
                    .table(SiteMessage::Table)
                    .col(SiteMessage::UserId)
                    .col(SiteMessage::Read)
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(SiteMessage::Table).to_owned())
            .await
    }
}

#[derive(Iden)]
pub enum SiteMessage {
    Table,
    Id,
    OrgId,
    UserId,
    Type,
    Title,
    Body,
    Data,
    Read,
    CreatedAt,
}
