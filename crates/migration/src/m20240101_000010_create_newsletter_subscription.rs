//! Create `newsletter_subscription` table.
//!
//! `token` is the opaque unsubscribe handle sent to subscribers.
use sea_orm_migration::{prelude::*, schema::*};

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(NewsletterSubscription::Table)
                    .if_not_exists()
                    .col(uuid(NewsletterSubscription::Id).primary_key())
                    .col(string_len(NewsletterSubscription::Email, 255).unique_key().not_null())
                    .col(string_len(NewsletterSubscription::Token, 64).unique_key().not_null())
                    .col(boolean(NewsletterSubscription::Subscribed).not_null().default(true))
                    .col(timestamp_with_time_zone(NewsletterSubscription::CreatedAt).not_null())
                    .col(timestamp_with_time_zone(NewsletterSubscription::UpdatedAt).not_null())
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager.drop_table(Table::drop().table(NewsletterSubscription::Table).to_owned()).await
    }
}

#[derive(DeriveIden)]
enum NewsletterSubscription { Table, Id, Email, Token, Subscribed, CreatedAt, UpdatedAt }
