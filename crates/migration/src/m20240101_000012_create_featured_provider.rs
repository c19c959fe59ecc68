//! Create `featured_provider` table (homepage placements).
use sea_orm_migration::{prelude::*, schema::*};

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(FeaturedProvider::Table)
                    .if_not_exists()
                    .col(uuid(FeaturedProvider::Id).primary_key())
                    .col(uuid(FeaturedProvider::ProviderId).not_null())
                    .col(integer(FeaturedProvider::Position).not_null().default(0))
                    .col(boolean(FeaturedProvider::Active).not_null().default(true))
                    .col(timestamp_with_time_zone(FeaturedProvider::StartsAt).not_null())
                    .col(
                        ColumnDef::new(FeaturedProvider::EndsAt)
                            .timestamp_with_time_zone()
                            .null(),
                    )
                    .col(timestamp_with_time_zone(FeaturedProvider::CreatedAt).not_null())
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_featured_provider")
                            .from(FeaturedProvider::Table, FeaturedProvider::ProviderId)
                            .to(Provider::Table, Provider::Id)
                            .on_delete(ForeignKeyAction::Cascade)
                            .on_update(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager.drop_table(Table::drop().table(FeaturedProvider::Table).to_owned()).await
    }
}

#[derive(DeriveIden)]
enum FeaturedProvider { Table, Id, ProviderId, Position, Active, StartsAt, EndsAt, CreatedAt }

#[derive(DeriveIden)]
enum Provider { Table, Id }
