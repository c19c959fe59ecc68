//! Create `contact_form` table.
use sea_orm_migration::{prelude::*, schema::*};

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(ContactForm::Table)
                    .if_not_exists()
                    .col(uuid(ContactForm::Id).primary_key())
                    .col(string_len(ContactForm::Name, 128).not_null())
                    .col(string_len(ContactForm::Email, 255).not_null())
                    .col(string_len(ContactForm::Subject, 200).not_null())
                    .col(text(ContactForm::Message).not_null())
                    .col(timestamp_with_time_zone(ContactForm::CreatedAt).not_null())
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager.drop_table(Table::drop().table(ContactForm::Table).to_owned()).await
    }
}

#[derive(DeriveIden)]
enum ContactForm { Table, Id, Name, Email, Subject, Message, CreatedAt }
