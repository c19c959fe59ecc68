//! Create `provider` table.
//!
//! `average_rating` and `review_count` are denormalized aggregates kept in
//! sync by the review lifecycle hook.
use sea_orm_migration::{prelude::*, schema::*};

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(Provider::Table)
                    .if_not_exists()
                    .col(uuid(Provider::Id).primary_key())
                    .col(string_len(Provider::Name, 160).not_null())
                    .col(string_len(Provider::Slug, 192).unique_key().not_null())
                    .col(text_null(Provider::Description))
                    .col(string_len(Provider::Email, 255).not_null())
                    .col(string_len_null(Provider::Phone, 32))
                    .col(string_len_null(Provider::City, 96))
                    .col(string_len_null(Provider::Website, 255))
                    .col(boolean(Provider::Verified).not_null().default(false))
                    .col(double(Provider::AverageRating).not_null().default(0.0))
                    .col(integer(Provider::ReviewCount).not_null().default(0))
                    .col(timestamp_with_time_zone(Provider::CreatedAt).not_null())
                    .col(timestamp_with_time_zone(Provider::UpdatedAt).not_null())
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager.drop_table(Table::drop().table(Provider::Table).to_owned()).await
    }
}

#[derive(DeriveIden)]
enum Provider {
    Table, Id, Name, Slug, Description, Email, Phone, City, Website,
    Verified, AverageRating, ReviewCount, CreatedAt, UpdatedAt,
}
