//! Create profile table migration.

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
                    .table(Profile::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(Profile::Id)
                            .string_len(36)
                            .not_null()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(Profile::OrgId).string_len(36).not_null())
                    .col(ColumnDef::new(Profile::Email).string_len(320))
                    .col(ColumnDef::new(Profile::Role).string_len(32).not_null())
                    .col(
                        ColumnDef::new(Profile::CreatedAt)
                            .timestamp_with_time_zone()
                            .not_null()
                            .default(Expr::current_timestamp()),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_profile_org")
                            .from(Profile::Table, Profile::OrgId)
                            .to(Organization::Table, Organization::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        // Index: (org_id, role) for role fan-out queries
        manager
            .create_index(
                Index::create()
                    .name("idx_profile_org_role")
                    .table(Profile::Table)
                    .col(Profile::OrgId)
                    .col(Profile::Role)
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(Profile::Table).to_owned())
            .await
    }
}

#[derive(Iden)]
pub enum Profile {
    Table,
    Id,
    OrgId,
    Email,
    Role,
    CreatedAt,
}
