use sea_orm::{DatabaseConnection, EntityTrait, PaginatorTrait, QueryOrder};
use tracing::info;
use uuid::Uuid;

use common::types::PaginationMeta;
use models::contact_form;
use crate::{errors::ServiceError, pagination::Pagination};

pub async fn submit_contact_form(
    db: &DatabaseConnection,
    name: &str,
    email: &str,
    subject: &str,
    message: &str,
) -> Result<contact_form::Model, ServiceError> {
    let created = contact_form::create(db, name, email, subject, message).await?;
    info!(contact_form_id = %created.id, "contact_form_submitted");
    Ok(created)
}

pub async fn get_contact_form(db: &DatabaseConnection, id: Uuid) -> Result<Option<contact_form::Model>, ServiceError> {
    contact_form::Entity::find_by_id(id)
        .one(db)
        .await
        .map_err(|e| ServiceError::Db(e.to_string()))
}

pub async fn list_contact_forms(
    db: &DatabaseConnection,
    opts: Pagination,
) -> Result<(Vec<contact_form::Model>, PaginationMeta), ServiceError> {
    let query = contact_form::Entity::find().order_by_desc(contact_form::Column::CreatedAt);
    let (page_idx, per_page) = opts.normalize();
    let paginator = query.paginate(db, per_page);
    let total = paginator.num_items().await.map_err(|e| ServiceError::Db(e.to_string()))?;
    let items = paginator.fetch_page(page_idx).await.map_err(|e| ServiceError::Db(e.to_string()))?;
    Ok((items, opts.meta(total)))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::get_db;

    #[tokio::test]
    async fn submitted_form_is_normalized() -> Result<(), anyhow::Error> {
        if std::env::var("SKIP_DB_TESTS").is_ok() || std::env::var("DATABASE_URL").is_err() {
            return Ok(());
        }
        let db = get_db().await?;
        let created = submit_contact_form(
            &db,
            "  Maria   Lopez ",
            "Maria@Example.COM",
            "  Quote   request ",
            "  Need a quote for fence repair.  ",
        )
        .await?;
        assert_eq!(created.name, "Maria Lopez");
        assert_eq!(created.email, "maria@example.com");
        assert_eq!(created.subject, "Quote request");
        assert_eq!(created.message, "Need a quote for fence repair.");
        contact_form::Entity::delete_by_id(created.id).exec(&db).await?;
        Ok(())
    }

    #[tokio::test]
    async fn blank_subject_rejected() -> Result<(), anyhow::Error> {
        if std::env::var("SKIP_DB_TESTS").is_ok() || std::env::var("DATABASE_URL").is_err() {
            return Ok(());
        }
        let db = get_db().await?;
        let err = submit_contact_form(&db, "A", "a@b.com", "   ", "hello").await.unwrap_err();
        assert!(matches!(err, ServiceError::Model(_)));
        Ok(())
    }
}
