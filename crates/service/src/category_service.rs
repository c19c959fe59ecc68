use sea_orm::{ActiveModelTrait, ColumnTrait, DatabaseConnection, EntityTrait, PaginatorTrait, QueryFilter, QueryOrder, Set};
use uuid::Uuid;

use common::types::PaginationMeta;
use models::category;
use crate::{errors::ServiceError, pagination::Pagination};

/// List categories, optionally scoped to one parent (`None` filter returns all).
pub async fn list_categories(
    db: &DatabaseConnection,
    parent_id: Option<Uuid>,
    opts: Pagination,
) -> Result<(Vec<category::Model>, PaginationMeta), ServiceError> {
    let mut query = category::Entity::find().order_by_asc(category::Column::Name);
    if let Some(pid) = parent_id {
        query = query.filter(category::Column::ParentId.eq(pid));
    }
    let (page_idx, per_page) = opts.normalize();
    let paginator = query.paginate(db, per_page);
    let total = paginator.num_items().await.map_err(|e| ServiceError::Db(e.to_string()))?;
    let items = paginator.fetch_page(page_idx).await.map_err(|e| ServiceError::Db(e.to_string()))?;
    Ok((items, opts.meta(total)))
}

pub async fn get_category(db: &DatabaseConnection, id: Uuid) -> Result<Option<category::Model>, ServiceError> {
    category::Entity::find_by_id(id)
        .one(db)
        .await
        .map_err(|e| ServiceError::Db(e.to_string()))
}

/// Create with policy: a parent, when given, must exist.
pub async fn create_category(
    db: &DatabaseConnection,
    name: &str,
    description: Option<String>,
    icon: Option<String>,
    parent_id: Option<Uuid>,
) -> Result<category::Model, ServiceError> {
    if let Some(pid) = parent_id {
        let parent = get_category(db, pid).await?;
        if parent.is_none() {
            return Err(ServiceError::not_found("parent category"));
        }
    }
    let created = category::create(db, name, description, icon, parent_id).await?;
    Ok(created)
}

pub async fn update_category(
    db: &DatabaseConnection,
    id: Uuid,
    name: Option<&str>,
    description: Option<String>,
    icon: Option<String>,
    parent_id: Option<Option<Uuid>>,
) -> Result<category::Model, ServiceError> {
    let mut am: category::ActiveModel = category::Entity::find_by_id(id)
        .one(db)
        .await
        .map_err(|e| ServiceError::Db(e.to_string()))?
        .ok_or_else(|| ServiceError::not_found("category"))?
        .into();
    if let Some(name) = name {
        let name = models::normalize::collapse_whitespace(name);
        if name.is_empty() {
            return Err(ServiceError::Validation("name required".into()));
        }
        let slug = category::slugify(&name);
        am.name = Set(name);
        am.slug = Set(slug);
    }
    if let Some(desc) = description {
        am.description = Set(Some(desc));
    }
    if let Some(icon) = icon {
        am.icon = Set(Some(icon));
    }
    if let Some(pid) = parent_id {
        if pid == Some(id) {
            return Err(ServiceError::Validation("category cannot be its own parent".into()));
        }
        am.parent_id = Set(pid);
    }
    am.updated_at = Set(chrono::Utc::now().into());
    am.update(db).await.map_err(|e| ServiceError::Db(e.to_string()))
}

pub async fn delete_category(db: &DatabaseConnection, id: Uuid) -> Result<bool, ServiceError> {
    let res = category::Entity::delete_by_id(id)
        .exec(db)
        .await
        .map_err(|e| ServiceError::Db(e.to_string()))?;
    Ok(res.rows_affected > 0)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::get_db;

    #[tokio::test]
    async fn category_crud_service() -> Result<(), anyhow::Error> {
        if std::env::var("SKIP_DB_TESTS").is_ok() || std::env::var("DATABASE_URL").is_err() {
            return Ok(());
        }
        let db = get_db().await?;

        let name = format!("Roofing {}", Uuid::new_v4());
        let created = create_category(&db, &name, Some("roof work".into()), None, None).await?;
        assert_eq!(created.name, name);

        let child = create_category(&db, &format!("Gutters {}", Uuid::new_v4()), None, None, Some(created.id)).await?;
        assert_eq!(child.parent_id, Some(created.id));

        let (children, meta) = list_categories(&db, Some(created.id), Pagination::default()).await?;
        assert_eq!(children.len(), 1);
        assert_eq!(meta.total, 1);

        assert!(delete_category(&db, child.id).await?);
        assert!(delete_category(&db, created.id).await?);
        Ok(())
    }

    #[tokio::test]
    async fn create_with_missing_parent_fails() -> Result<(), anyhow::Error> {
        if std::env::var("SKIP_DB_TESTS").is_ok() || std::env::var("DATABASE_URL").is_err() {
            return Ok(());
        }
        let db = get_db().await?;
        let err = create_category(&db, "Orphan", None, None, Some(Uuid::new_v4())).await.unwrap_err();
        assert!(matches!(err, ServiceError::NotFound(_)));
        Ok(())
    }
}
