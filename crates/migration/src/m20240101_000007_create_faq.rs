//! Create `faq` table.
//!
//! Keywords are stored as a JSON array; `view_count` is the popularity
//! counter used by search scoring.
use sea_orm_migration::{prelude::*, schema::*};

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(Faq::Table)
                    .if_not_exists()
                    .col(uuid(Faq::Id).primary_key())
                    .col(text(Faq::Question).not_null())
                    .col(text(Faq::Answer).not_null())
                    .col(json_binary(Faq::Keywords).not_null())
                    .col(integer(Faq::ViewCount).not_null().default(0))
                    .col(boolean(Faq::Published).not_null().default(true))
                    .col(timestamp_with_time_zone(Faq::CreatedAt).not_null())
                    .col(timestamp_with_time_zone(Faq::UpdatedAt).not_null())
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager.drop_table(Table::drop().table(Faq::Table).to_owned()).await
    }
}

#[derive(DeriveIden)]
enum Faq { Table, Id, Question, Answer, Keywords, ViewCount, Published, CreatedAt, UpdatedAt }
