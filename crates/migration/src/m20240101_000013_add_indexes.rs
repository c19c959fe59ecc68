use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        // Category: parent lookups
        manager
            .create_index(
                Index::create()
                    .name("idx_category_parent")
                    .table(Category::Table)
                    .col(Category::ParentId)
                    .to_owned(),
            )
            .await?;

        // Provider: city filter
        manager
            .create_index(
                Index::create()
                    .name("idx_provider_city")
                    .table(Provider::Table)
                    .col(Provider::City)
                    .to_owned(),
            )
            .await?;

        // Review: per-provider listing and the aggregation query
        manager
            .create_index(
                Index::create()
                    .name("idx_review_provider")
                    .table(Review::Table)
                    .col(Review::ProviderId)
                    .to_owned(),
            )
            .await?;

        // SupportTicket: status filter
        manager
            .create_index(
                Index::create()
                    .name("idx_ticket_status")
                    .table(SupportTicket::Table)
                    .col(SupportTicket::Status)
                    .to_owned(),
            )
            .await?;

        // FeaturedProvider: active window lookup
        manager
            .create_index(
                Index::create()
                    .name("idx_featured_active")
                    .table(FeaturedProvider::Table)
                    .col(FeaturedProvider::Active)
                    .col(FeaturedProvider::StartsAt)
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_index(Index::drop().name("idx_category_parent").table(Category::Table).to_owned())
            .await?;
        manager
            .drop_index(Index::drop().name("idx_provider_city").table(Provider::Table).to_owned())
            .await?;
        manager
            .drop_index(Index::drop().name("idx_review_provider").table(Review::Table).to_owned())
            .await?;
        manager
            .drop_index(Index::drop().name("idx_ticket_status").table(SupportTicket::Table).to_owned())
            .await?;
        manager
            .drop_index(Index::drop().name("idx_featured_active").table(FeaturedProvider::Table).to_owned())
            .await
    }
}

#[derive(DeriveIden)]
enum Category { Table, ParentId }

#[derive(DeriveIden)]
enum Provider { Table, City }

#[derive(DeriveIden)]
enum Review { Table, ProviderId }

#[derive(DeriveIden)]
enum SupportTicket { Table, Status }

#[derive(DeriveIden)]
enum FeaturedProvider { Table, Active, StartsAt }
