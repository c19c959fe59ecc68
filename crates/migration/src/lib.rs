//! Migrator registering entity-specific migrations in dependency order.
//! Indexes and seed data are applied last.
pub use sea_orm_migration::prelude::*;

mod m20240101_000001_create_user;
mod m20240101_000002_create_user_credentials;
mod m20240101_000003_create_category;
mod m20240101_000004_create_provider;
mod m20240101_000005_create_provider_category;
mod m20240101_000006_create_review;
mod m20240101_000007_create_faq;
mod m20240101_000008_create_contact_form;
mod m20240101_000009_create_support_ticket;
mod m20240101_000010_create_newsletter_subscription;
mod m20240101_000011_create_favorite;
mod m20240101_000012_create_featured_provider;
mod m20240101_000013_add_indexes;
mod m20240101_000014_seed_categories;

pub struct Migrator;

#[async_trait::async_trait]
impl MigratorTrait for Migrator {
    fn migrations() -> Vec<Box<dyn MigrationTrait>> {
        vec![
            Box::new(m20240101_000001_create_user::Migration),
            Box::new(m20240101_000002_create_user_credentials::Migration),
            Box::new(m20240101_000003_create_category::Migration),
            Box::new(m20240101_000004_create_provider::Migration),
            Box::new(m20240101_000005_create_provider_category::Migration),
            Box::new(m20240101_000006_create_review::Migration),
            Box::new(m20240101_000007_create_faq::Migration),
            Box::new(m20240101_000008_create_contact_form::Migration),
            Box::new(m20240101_000009_create_support_ticket::Migration),
            Box::new(m20240101_000010_create_newsletter_subscription::Migration),
            Box::new(m20240101_000011_create_favorite::Migration),
            Box::new(m20240101_000012_create_featured_provider::Migration),
            // Indexes should always be applied after the tables they cover
            Box::new(m20240101_000013_add_indexes::Migration),
            Box::new(m20240101_000014_seed_categories::Migration),
        ]
    }
}
