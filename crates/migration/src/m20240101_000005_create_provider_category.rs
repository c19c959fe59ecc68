//! Create `provider_category` join table (many-to-many).
use sea_orm_migration::{prelude::*, schema::*};

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(ProviderCategory::Table)
                    .if_not_exists()
                    .col(uuid(ProviderCategory::ProviderId).not_null())
                    .col(uuid(ProviderCategory::CategoryId).not_null())
                    .primary_key(
                        Index::create()
                            .col(ProviderCategory::ProviderId)
                            .col(ProviderCategory::CategoryId),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_provider_category_provider")
                            .from(ProviderCategory::Table, ProviderCategory::ProviderId)
                            .to(Provider::Table, Provider::Id)
                            .on_delete(ForeignKeyAction::Cascade)
                            .on_update(ForeignKeyAction::Cascade),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_provider_category_category")
                            .from(ProviderCategory::Table, ProviderCategory::CategoryId)
                            .to(Category::Table, Category::Id)
                            .on_delete(ForeignKeyAction::Cascade)
                            .on_update(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager.drop_table(Table::drop().table(ProviderCategory::Table).to_owned()).await
    }
}

#[derive(DeriveIden)]
enum ProviderCategory { Table, ProviderId, CategoryId }

#[derive(DeriveIden)]
enum Provider { Table, Id }

#[derive(DeriveIden)]
enum Category { Table, Id }
