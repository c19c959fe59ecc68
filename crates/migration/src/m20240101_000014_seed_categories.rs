//! Seed the default top-level service categories.
//!
//! Runs inside a single transaction so a partial seed never persists.
use sea_orm_migration::prelude::*;
use sea_orm_migration::sea_orm::{ConnectionTrait, TransactionTrait};
use uuid::Uuid;

#[derive(DeriveMigrationName)]
pub struct Migration;

const DEFAULT_CATEGORIES: &[(&str, &str)] = &[
    ("Plumbing", "plumbing"),
    ("Electrical", "electrical"),
    ("Cleaning", "cleaning"),
    ("Gardening", "gardening"),
    ("Painting", "painting"),
    ("Moving", "moving"),
];

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        let db = manager.get_connection();
        let txn = db.begin().await?;
        let backend = txn.get_database_backend();

        for (name, slug) in DEFAULT_CATEGORIES {
            let insert = Query::insert()
                .into_table(Category::Table)
                .columns([
                    Category::Id,
                    Category::Name,
                    Category::Slug,
                    Category::CreatedAt,
                    Category::UpdatedAt,
                ])
                .values_panic([
                    Uuid::new_v4().into(),
                    (*name).into(),
                    (*slug).into(),
                    Expr::current_timestamp().into(),
                    Expr::current_timestamp().into(),
                ])
                .to_owned();
            txn.execute(backend.build(&insert)).await?;
        }

        txn.commit().await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        let db = manager.get_connection();
        let slugs: Vec<&str> = DEFAULT_CATEGORIES.iter().map(|(_, s)| *s).collect();
        let delete = Query::delete()
            .from_table(Category::Table)
            .and_where(Expr::col(Category::Slug).is_in(slugs))
            .to_owned();
        db.execute(db.get_database_backend().build(&delete)).await?;
        Ok(())
    }
}

#[derive(DeriveIden)]
enum Category { Table, Id, Name, Slug, CreatedAt, UpdatedAt }
