//! Create `support_ticket` table with optional FK to `user`.
use sea_orm_migration::{prelude::*, schema::*};

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(SupportTicket::Table)
                    .if_not_exists()
                    .col(uuid(SupportTicket::Id).primary_key())
                    .col(ColumnDef::new(SupportTicket::UserId).uuid().null())
                    .col(string_len(SupportTicket::Email, 255).not_null())
                    .col(string_len(SupportTicket::Subject, 200).not_null())
                    .col(text(SupportTicket::Body).not_null())
                    .col(string_len(SupportTicket::Status, 32).not_null())
                    .col(
                        ColumnDef::new(SupportTicket::ResolvedAt)
                            .timestamp_with_time_zone()
                            .null(),
                    )
                    .col(timestamp_with_time_zone(SupportTicket::CreatedAt).not_null())
                    .col(timestamp_with_time_zone(SupportTicket::UpdatedAt).not_null())
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_ticket_user")
                            .from(SupportTicket::Table, SupportTicket::UserId)
                            .to(User::Table, User::Id)
                            .on_delete(ForeignKeyAction::SetNull)
                            .on_update(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager.drop_table(Table::drop().table(SupportTicket::Table).to_owned()).await
    }
}

#[derive(DeriveIden)]
enum SupportTicket { Table, Id, UserId, Email, Subject, Body, Status, ResolvedAt, CreatedAt, UpdatedAt }

#[derive(DeriveIden)]
enum User { Table, Id }
